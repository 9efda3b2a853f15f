pub mod action;
pub mod checkin;
pub mod detail;
pub mod log;
pub mod notifications;
pub mod resolver;
pub mod window;
