// src/export/csv_writer.rs

use crate::errors::AppResult;
use crate::export::AttendanceRow;
use crate::export::notify_export_success;
use crate::ui::messages::info;
use csv::{QuoteStyle, WriterBuilder};
use std::path::Path;

/// Write the attendance sheet, header included via serde, every field quoted.
pub(crate) fn export_csv(rows: &[AttendanceRow], path: &Path) -> AppResult<()> {
    info(format!("Exporting to CSV: {}", path.display()));

    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_path(path)?;

    if rows.is_empty() {
        wtr.write_record([
            "student_id",
            "student_name",
            "student_email",
            "application_status",
            "attendance",
            "checked_in_at",
        ])?;
    }

    for row in rows {
        wtr.serialize(row)?;
    }

    wtr.flush()?;

    notify_export_success("CSV", path, rows.len());
    Ok(())
}
