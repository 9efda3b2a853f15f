// src/export/logic.rs

use crate::api::ActivityApi;
use crate::db::log::oplog_quiet;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::export::csv_writer::export_csv;
use crate::export::fs_utils::ensure_writable;
use crate::export::model::build_rows;
use crate::ui::messages::warning;
use crate::utils::path::expand_tilde;
use chrono::{DateTime, Utc};
use tracing::debug;

/// High-level attendance export.
pub struct ExportLogic;

impl ExportLogic {
    /// Export the attendance of `activity_id` as CSV to `file`, which must
    /// be an absolute path. Returns the number of data rows written.
    pub async fn export<A: ActivityApi>(
        api: &A,
        pool: &DbPool,
        activity_id: i64,
        file: &str,
        force: bool,
        now: DateTime<Utc>,
    ) -> AppResult<usize> {
        let path = expand_tilde(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "output file path must be absolute: {file}"
            )));
        }

        ensure_writable(&path, force)?;

        let activity = api.activity(activity_id).await?;
        let applications = api.activity_applications(activity_id).await?;
        let checkins = api.checkin_list(activity_id).await?;
        debug!(
            activity_id,
            applications = applications.len(),
            checkins = checkins.len(),
            "export data fetched"
        );

        let rows = build_rows(&activity, &applications, &checkins, now);
        if rows.is_empty() {
            warning("No approved applications for this activity; writing header only.");
        }

        export_csv(&rows, &path)?;

        oplog_quiet(
            &pool.conn,
            "export",
            &activity_id.to_string(),
            &format!("{} rows to {}", rows.len(), path.display()),
        );

        Ok(rows.len())
    }
}
