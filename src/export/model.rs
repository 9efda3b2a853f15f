// src/export/model.rs

use crate::core::resolver;
use crate::models::activity::Activity;
use crate::models::application::Application;
use crate::models::checkin::CheckInRecord;
use crate::utils::time::format_rfc3339;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One line of the attendance sheet.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct AttendanceRow {
    pub student_id: i64,
    pub student_name: String,
    pub student_email: String,
    pub application_status: String,
    pub attendance: String,
    pub checked_in_at: String,
}

/// Rows for every approved application of `activity`, in application order.
/// `attendance` is the badge the student would see at `now`.
pub fn build_rows(
    activity: &Activity,
    applications: &[Application],
    checkins: &[CheckInRecord],
    now: DateTime<Utc>,
) -> Vec<AttendanceRow> {
    applications
        .iter()
        .filter(|a| a.belongs_to(activity.id) && a.status.is_approved())
        .map(|app| {
            let record = checkins
                .iter()
                .find(|c| c.student == app.studentid && c.activity == activity.id);
            let resolved = resolver::resolve(
                app.status,
                record,
                activity.start_at,
                activity.end_at,
                now,
            );

            AttendanceRow {
                student_id: app.studentid,
                student_name: app
                    .student_name
                    .clone()
                    .or_else(|| record.and_then(|r| r.student_name.clone()))
                    .unwrap_or_default(),
                student_email: app
                    .student_email
                    .clone()
                    .or_else(|| record.and_then(|r| r.student_email.clone()))
                    .unwrap_or_default(),
                application_status: app.status.as_str().to_string(),
                attendance: resolved.label().to_string(),
                checked_in_at: format_rfc3339(record.and_then(|r| r.checked_in_at)),
            }
        })
        .collect()
}
