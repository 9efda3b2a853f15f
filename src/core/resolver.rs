//! Folds an application, its optional check-in record and the activity
//! window into the one status a student sees.

use crate::core::window::{self, TimeStatus};
use crate::models::application::ApplicationStatus;
use crate::models::checkin::CheckInRecord;
use crate::models::status::DisplayStatus;
use chrono::{DateTime, Utc};

/// First matching rule wins:
///
/// 1. a `present` record → checked in (authoritative, never overridden);
/// 2. an `absent` record carrying `marked_absent_at` → absent;
/// 3. the window has ended → absent;
/// 4. any non-approved application status passes through;
/// 5. approved → "please check in" while ongoing, approved otherwise.
pub fn resolve(
    application: ApplicationStatus,
    checkin: Option<&CheckInRecord>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> DisplayStatus {
    if checkin.is_some_and(CheckInRecord::is_present) {
        return DisplayStatus::CheckedIn;
    }

    if checkin.is_some_and(CheckInRecord::is_marked_absent) {
        return DisplayStatus::Absent;
    }

    if window::is_ended(end, now) {
        return DisplayStatus::Absent;
    }

    if !application.is_approved() {
        return application.into();
    }

    match window::classify(start, end, now) {
        TimeStatus::Ongoing => DisplayStatus::PleaseCheckIn,
        _ => DisplayStatus::Approved,
    }
}

/// `None` when the student never applied.
pub fn resolve_optional(
    application: Option<ApplicationStatus>,
    checkin: Option<&CheckInRecord>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DisplayStatus> {
    application.map(|status| resolve(status, checkin, start, end, now))
}
