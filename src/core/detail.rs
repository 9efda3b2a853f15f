//! Everything an activity page shows, computed in one pass:
//! time window → resolved status → control.

use crate::api::{ActivityApi, find_my_application};
use crate::core::action::{self, Action, ActionInput};
use crate::core::resolver;
use crate::core::window::{self, TimeStatus};
use crate::errors::AppResult;
use crate::models::activity::Activity;
use crate::models::application::Application;
use crate::models::checkin::CheckInRecord;
use crate::models::role::Role;
use crate::models::status::DisplayStatus;
use chrono::{DateTime, Utc};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct EventDetail {
    pub activity: Activity,
    pub application: Option<Application>,
    pub checkin: Option<CheckInRecord>,
    pub time_status: TimeStatus,
    pub resolved: Option<DisplayStatus>,
    pub action: Action,
    pub now: DateTime<Utc>,
}

impl EventDetail {
    pub fn build(
        role: Role,
        activity: Activity,
        application: Option<Application>,
        checkin: Option<CheckInRecord>,
        now: DateTime<Utc>,
    ) -> Self {
        let time_status = window::classify(activity.start_at, activity.end_at, now);
        let app_status = application.as_ref().map(|a| a.status);
        let resolved = resolver::resolve_optional(
            app_status,
            checkin.as_ref(),
            activity.start_at,
            activity.end_at,
            now,
        );
        let action = action::decide(ActionInput {
            role,
            application: app_status,
            resolved,
            activity: &activity,
            now,
        });

        Self {
            activity,
            application,
            checkin,
            time_status,
            resolved,
            action,
            now,
        }
    }

    pub fn window_label(&self) -> String {
        window::format_window(self.activity.start_at, self.activity.end_at)
    }
}

/// The caller's application for the activity and, once approved, their
/// check-in record. Other statuses never have a record worth fetching.
pub async fn fetch_student_state<A: ActivityApi>(
    api: &A,
    activity_id: i64,
) -> AppResult<(Option<Application>, Option<CheckInRecord>)> {
    let application = find_my_application(api, activity_id).await?;

    let checkin = match &application {
        Some(app) if app.status.is_approved() => api.checkin_status(activity_id).await?,
        _ => None,
    };

    debug!(
        activity_id,
        application = ?application.as_ref().map(|a| a.status),
        has_checkin = checkin.is_some(),
        "student state fetched"
    );
    Ok((application, checkin))
}

/// Fetch and assemble the full page for `role`.
pub async fn load<A: ActivityApi>(
    api: &A,
    role: Role,
    activity_id: i64,
    now: DateTime<Utc>,
) -> AppResult<EventDetail> {
    let activity = api.activity(activity_id).await?;
    let (application, checkin) = if role.is_student() {
        fetch_student_state(api, activity_id).await?
    } else {
        (None, None)
    };
    Ok(EventDetail::build(role, activity, application, checkin, now))
}
