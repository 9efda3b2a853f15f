use crate::errors::AppResult;
use chrono::Local;
use rusqlite::Connection;
use rusqlite::params;
use tracing::warn;

/// Write an operation line into the `log` table.
pub fn oplog(conn: &Connection, operation: &str, target: &str, message: &str) -> AppResult<()> {
    let now = Local::now().to_rfc3339();

    let mut stmt = conn.prepare_cached(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, ?2, ?3, ?4)",
    )?;

    stmt.execute(params![now, operation, target, message])?;

    Ok(())
}

/// Like [`oplog`], but a failure is only reported as a warning.
pub fn oplog_quiet(conn: &Connection, operation: &str, target: &str, message: &str) {
    if let Err(e) = oplog(conn, operation, target, message) {
        warn!(%e, operation, "failed to write internal log");
    }
}
