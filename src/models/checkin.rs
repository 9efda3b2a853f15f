use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    #[default]
    Pending,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Pending => "pending",
        }
    }
}

/// Attendance of one student at one activity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckInRecord {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub student: i64,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub student_email: Option<String>,
    #[serde(default)]
    pub activity: i64,
    #[serde(default)]
    pub attendance_status: AttendanceStatus,
    #[serde(default)]
    pub checked_in_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub marked_absent_at: Option<DateTime<Utc>>,
}

impl CheckInRecord {
    pub fn is_present(&self) -> bool {
        self.attendance_status == AttendanceStatus::Present
    }

    /// Absent by an explicit mark, not by inference.
    pub fn is_marked_absent(&self) -> bool {
        self.attendance_status == AttendanceStatus::Absent && self.marked_absent_at.is_some()
    }
}

/// Body returned by a successful check-in submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckInReceipt {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub checked_in_at: Option<DateTime<Utc>>,
}
