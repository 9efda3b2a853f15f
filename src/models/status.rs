use crate::models::application::ApplicationStatus;
use crate::utils::colors::{BLUE, CYAN, GREEN, GREY, RED, YELLOW};
use serde::Serialize;

/// The single status shown for a student's application once attendance
/// has been folded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStatus {
    Pending,
    Approved,
    PleaseCheckIn,
    CheckedIn,
    Absent,
    Rejected,
    Cancelled,
}

impl DisplayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayStatus::Pending => "pending",
            DisplayStatus::Approved => "approved",
            DisplayStatus::PleaseCheckIn => "please_checkin",
            DisplayStatus::CheckedIn => "checked_in",
            DisplayStatus::Absent => "absent",
            DisplayStatus::Rejected => "rejected",
            DisplayStatus::Cancelled => "cancelled",
        }
    }

    /// Badge text.
    pub fn label(&self) -> &'static str {
        match self {
            DisplayStatus::Pending => "Pending Review",
            DisplayStatus::Approved => "Approved",
            DisplayStatus::PleaseCheckIn => "Please Check In",
            DisplayStatus::CheckedIn => "Checked In",
            DisplayStatus::Absent => "Absent",
            DisplayStatus::Rejected => "Rejected",
            DisplayStatus::Cancelled => "Cancelled",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            DisplayStatus::Pending => YELLOW,
            DisplayStatus::Approved => GREEN,
            DisplayStatus::PleaseCheckIn => BLUE,
            DisplayStatus::CheckedIn => CYAN,
            DisplayStatus::Absent => RED,
            DisplayStatus::Rejected => RED,
            DisplayStatus::Cancelled => GREY,
        }
    }
}

impl From<ApplicationStatus> for DisplayStatus {
    fn from(status: ApplicationStatus) -> Self {
        match status {
            ApplicationStatus::Pending => DisplayStatus::Pending,
            ApplicationStatus::Approved => DisplayStatus::Approved,
            ApplicationStatus::Rejected => DisplayStatus::Rejected,
            ApplicationStatus::Cancelled => DisplayStatus::Cancelled,
        }
    }
}
