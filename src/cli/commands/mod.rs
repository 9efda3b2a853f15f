pub mod applicants;
pub mod apply;
pub mod cancel;
pub mod checkin;
pub mod code;
pub mod config;
pub mod export;
pub mod init;
pub mod log;
pub mod notifications;
pub mod review;
pub mod show;
pub mod watch;

use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::role::Role;
use crate::utils::time::Clock;
use chrono::{DateTime, Utc};

/// What every backend-facing command needs besides the API itself.
pub struct Context {
    pub cfg: Config,
    pub clock: Clock,
}

impl Context {
    pub fn new(cfg: Config, clock: Clock) -> Self {
        Self { cfg, clock }
    }

    pub fn role(&self) -> Role {
        self.cfg.role
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Operation-log database.
    pub fn open_log(&self) -> AppResult<DbPool> {
        DbPool::new(&self.cfg.database)
    }
}
