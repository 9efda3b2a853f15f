//! Picks the single control offered on an activity page.

use crate::core::window::{self, TimeStatus};
use crate::models::activity::Activity;
use crate::models::application::ApplicationStatus;
use crate::models::role::Role;
use crate::models::status::DisplayStatus;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Which check-in modal a control opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckInMode {
    /// Organizer shows the day's code to the room.
    ShowCode,
    /// Student types the code in.
    EnterCode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "action")]
pub enum Action {
    Apply { enabled: bool },
    CancelApplication,
    CheckIn { mode: CheckInMode },
    ApprovedBanner,
    CheckedIn,
    EventEnded,
    EditEvent,
    Rejected,
    Cancelled,
    ViewOnly,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::Apply { .. } => "Apply Now",
            Action::CancelApplication => "Cancel Application",
            Action::CheckIn { .. } => "Check In",
            Action::ApprovedBanner => "You're Approved!",
            Action::CheckedIn => "Checked In",
            Action::EventEnded => "Event Ended",
            Action::EditEvent => "Edit Event",
            Action::Rejected => "Application Rejected",
            Action::Cancelled => "Cancelled",
            Action::ViewOnly => "View Only",
        }
    }

    pub fn is_enabled(&self) -> bool {
        match self {
            Action::Apply { enabled } => *enabled,
            Action::CancelApplication | Action::CheckIn { .. } | Action::EditEvent => true,
            Action::ApprovedBanner
            | Action::CheckedIn
            | Action::EventEnded
            | Action::Rejected
            | Action::Cancelled
            | Action::ViewOnly => false,
        }
    }

    /// CLI invocation that performs the control, if it does anything.
    pub fn command_hint(&self, activity_id: i64) -> Option<String> {
        match self {
            Action::Apply { enabled: true } => Some(format!("rvolunteer apply {activity_id}")),
            Action::CancelApplication => Some(format!("rvolunteer cancel {activity_id}")),
            Action::CheckIn {
                mode: CheckInMode::EnterCode,
            } => Some(format!("rvolunteer checkin {activity_id} <CODE>")),
            Action::CheckIn {
                mode: CheckInMode::ShowCode,
            } => Some(format!("rvolunteer code {activity_id}")),
            Action::ApprovedBanner => Some("Check \"My Events\" for details".to_string()),
            _ => None,
        }
    }
}

/// Everything the decision depends on.
#[derive(Debug, Clone, Copy)]
pub struct ActionInput<'a> {
    pub role: Role,
    pub application: Option<ApplicationStatus>,
    pub resolved: Option<DisplayStatus>,
    pub activity: &'a Activity,
    pub now: DateTime<Utc>,
}

pub fn decide(input: ActionInput<'_>) -> Action {
    let activity = input.activity;
    let time = window::classify(activity.start_at, activity.end_at, input.now);

    match input.role {
        Role::Organizer => {
            if window::is_within_date_range(activity.start_at, activity.end_at, input.now) {
                Action::CheckIn {
                    mode: CheckInMode::ShowCode,
                }
            } else if window::is_ended(activity.end_at, input.now) {
                Action::EventEnded
            } else {
                Action::EditEvent
            }
        }
        Role::Admin => Action::ViewOnly,
        Role::Student => match input.application {
            None => Action::Apply {
                enabled: activity.capacity_available() && activity.status.accepts_applications(),
            },
            Some(ApplicationStatus::Pending) => Action::CancelApplication,
            Some(ApplicationStatus::Approved) => {
                if input.resolved == Some(DisplayStatus::CheckedIn) {
                    return Action::CheckedIn;
                }
                match time {
                    TimeStatus::Ongoing => Action::CheckIn {
                        mode: CheckInMode::EnterCode,
                    },
                    TimeStatus::Ended => Action::EventEnded,
                    TimeStatus::NotStarted => Action::ApprovedBanner,
                }
            }
            Some(ApplicationStatus::Rejected) => Action::Rejected,
            Some(ApplicationStatus::Cancelled) => Action::Cancelled,
        },
    }
}
