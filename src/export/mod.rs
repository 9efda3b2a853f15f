// src/export/mod.rs

mod csv_writer;
mod fs_utils;
pub mod logic;
pub mod model;

pub use logic::ExportLogic;
pub use model::{AttendanceRow, build_rows};

use crate::ui::messages::success;
use std::path::Path;

/// Shared completion message for exports.
pub(crate) fn notify_export_success(label: &str, path: &Path, rows: usize) {
    success(format!(
        "{label} export completed: {} ({rows} rows)",
        path.display()
    ));
}
