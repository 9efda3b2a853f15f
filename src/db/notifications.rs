use crate::errors::AppResult;
use chrono::Local;
use rusqlite::{Connection, params};
use std::collections::HashSet;

/// Ids of the notifications already marked as read.
pub fn read_ids(conn: &Connection) -> AppResult<HashSet<String>> {
    let mut stmt = conn.prepare_cached("SELECT id FROM notification_read")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut ids = HashSet::new();
    for r in rows {
        ids.insert(r?);
    }
    Ok(ids)
}

/// Mark `ids` as read. Returns how many were not read before.
pub fn mark_read(conn: &Connection, ids: &[String]) -> AppResult<usize> {
    let now = Local::now().to_rfc3339();
    let mut stmt =
        conn.prepare_cached("INSERT OR IGNORE INTO notification_read (id, read_at) VALUES (?1, ?2)")?;

    let mut inserted = 0;
    for id in ids {
        inserted += stmt.execute(params![id, now])?;
    }
    Ok(inserted)
}
