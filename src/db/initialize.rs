use crate::errors::AppResult;
use rusqlite::Connection;

/// Ensure the operation-log and notification-read schema exists. Idempotent.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS notification_read (
            id      TEXT PRIMARY KEY,
            read_at TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}
