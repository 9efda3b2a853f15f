//! Notifications derived from the caller's own applications: decisions
//! taken on them and activities removed after an approval.
//!
//! Nothing is stored server side. A notification is identified by a stable
//! id built from its kind and the application id, and the set of ids already
//! read lives in the local database.

use crate::api::ActivityApi;
use crate::errors::AppResult;
use crate::models::application::{Application, ApplicationStatus};
use crate::models::role::Role;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

/// Decisions younger than this count as new.
pub const NEW_WITHIN_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    ApplicationApproved,
    ApplicationRejected,
    ActivityDeleted,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::ApplicationApproved => "app-approved",
            NotificationKind::ApplicationRejected => "app-rejected",
            NotificationKind::ActivityDeleted => "activity-deleted",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            NotificationKind::ApplicationApproved => "Application Approved",
            NotificationKind::ApplicationRejected => "Application Rejected",
            NotificationKind::ActivityDeleted => "Activity Deleted",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    pub message: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub activity_id: Option<i64>,
    pub application_id: i64,
    pub is_new: bool,
    pub read: bool,
}

/// What the poller publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NotificationCount {
    pub unread: usize,
    pub new: usize,
}

impl NotificationCount {
    pub fn of(notifications: &[Notification]) -> Self {
        Self {
            unread: notifications.iter().filter(|n| !n.read).count(),
            new: notifications.iter().filter(|n| n.is_new).count(),
        }
    }
}

fn notification(
    kind: NotificationKind,
    app: &Application,
    message: String,
    is_new: bool,
    read: &HashSet<String>,
) -> Notification {
    let id = format!("{}-{}", kind.as_str(), app.id);
    Notification {
        read: read.contains(&id),
        id,
        kind,
        message,
        timestamp: app.decision_at.or(app.submitted_at),
        activity_id: app.activity,
        application_id: app.id,
        is_new,
    }
}

/// Build a student's notifications, newest first. An approved application
/// whose activity reference is gone also yields an `ActivityDeleted`
/// notification, which always counts as new.
pub fn student_notifications(
    applications: &[Application],
    read: &HashSet<String>,
    now: DateTime<Utc>,
) -> Vec<Notification> {
    let since = now - Duration::hours(NEW_WITHIN_HOURS);
    let decided_recently = |app: &Application| app.decision_at.is_some_and(|d| d > since);

    let mut out = Vec::new();
    for app in applications {
        match app.status {
            ApplicationStatus::Approved => {
                let title = app.activity_title.as_deref().unwrap_or("activity");
                out.push(notification(
                    NotificationKind::ApplicationApproved,
                    app,
                    format!("Your application for \"{title}\" has been approved!"),
                    decided_recently(app),
                    read,
                ));

                if app.activity.is_none() {
                    let title = app.activity_title.as_deref().unwrap_or("Unknown");
                    out.push(notification(
                        NotificationKind::ActivityDeleted,
                        app,
                        format!(
                            "The activity \"{title}\" you were participating in has been deleted."
                        ),
                        true,
                        read,
                    ));
                }
            }
            ApplicationStatus::Rejected => {
                let title = app.activity_title.as_deref().unwrap_or("activity");
                let mut message = format!("Your application for \"{title}\" was rejected.");
                if let Some(reason) = app.notes.as_deref().filter(|r| !r.trim().is_empty()) {
                    message.push_str(&format!("\nReason: {reason}"));
                }
                out.push(notification(
                    NotificationKind::ApplicationRejected,
                    app,
                    message,
                    decided_recently(app),
                    read,
                ));
            }
            ApplicationStatus::Pending | ApplicationStatus::Cancelled => {}
        }
    }

    // None sorts below every timestamp, so undated entries go last
    out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    out
}

/// Notifications for `role`. Only students receive any.
pub async fn fetch<A: ActivityApi>(
    api: &A,
    role: Role,
    read: &HashSet<String>,
    now: DateTime<Utc>,
) -> AppResult<Vec<Notification>> {
    if !role.is_student() {
        return Ok(Vec::new());
    }
    let applications = api.my_applications().await?;
    Ok(student_notifications(&applications, read, now))
}
