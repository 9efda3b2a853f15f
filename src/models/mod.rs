pub mod activity;
pub mod application;
pub mod checkin;
pub mod role;
pub mod status;
