use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of an activity as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    #[default]
    Pending,
    Open,
    Upcoming,
    Full,
    Closed,
    Cancelled,
    Rejected,
    #[serde(other)]
    Other,
}

impl ActivityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityStatus::Pending => "pending",
            ActivityStatus::Open => "open",
            ActivityStatus::Upcoming => "upcoming",
            ActivityStatus::Full => "full",
            ActivityStatus::Closed => "closed",
            ActivityStatus::Cancelled => "cancelled",
            ActivityStatus::Rejected => "rejected",
            ActivityStatus::Other => "other",
        }
    }

    /// Statuses under which students may still submit an application.
    pub fn accepts_applications(&self) -> bool {
        matches!(self, ActivityStatus::Open | ActivityStatus::Upcoming)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Activity {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub start_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub max_participants: Option<u32>,
    #[serde(default)]
    pub current_participants: u32,
    #[serde(default)]
    pub capacity_reached: bool,
    #[serde(default)]
    pub status: ActivityStatus,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub organizer_email: String,
    #[serde(default)]
    pub organizer_name: String,
    #[serde(default)]
    pub hours_awarded: Option<f64>,
}

impl Activity {
    /// True while seats are left: the backend flag is clear and, when a
    /// maximum is set, the head count is still below it.
    pub fn capacity_available(&self) -> bool {
        if self.capacity_reached {
            return false;
        }
        match self.max_participants {
            Some(max) => self.current_participants < max,
            None => true,
        }
    }

    pub fn seats_label(&self) -> String {
        match self.max_participants {
            Some(max) => format!("{}/{}", self.current_participants, max),
            None => format!("{}/-", self.current_participants),
        }
    }
}
