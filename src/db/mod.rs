pub mod initialize;
pub mod log;
pub mod notifications;
pub mod pool;
