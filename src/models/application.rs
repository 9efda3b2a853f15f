use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, ApplicationStatus::Approved)
    }
}

/// A student's request to join an activity.
///
/// `activity` becomes `None` once the activity is deleted; `activity_title`
/// keeps the cached title around for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    #[serde(default)]
    pub activity: Option<i64>,
    #[serde(default)]
    pub activity_title: Option<String>,
    #[serde(default)]
    pub studentid: i64,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub student_email: Option<String>,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub decision_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Application {
    pub fn belongs_to(&self, activity_id: i64) -> bool {
        self.activity == Some(activity_id)
    }

    pub fn display_name(&self) -> String {
        self.student_name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .or_else(|| self.student_email.clone())
            .unwrap_or_else(|| format!("student #{}", self.studentid))
    }
}

/// Organizer decision on an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewAction {
    Approve,
    Reject,
}

impl ReviewAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewAction::Approve => "approve",
            ReviewAction::Reject => "reject",
        }
    }
}
