//! File-backed [`ActivityApi`]: a JSON snapshot of backend state that
//! applies the same acceptance rules the server does. Mutations are written
//! back to the file, so a sequence of commands behaves like a session
//! against the live service.

use super::{ActivityApi, Session};
use crate::core::checkin::sanitize_code;
use crate::core::window;
use crate::errors::{AppError, AppResult};
use crate::models::activity::Activity;
use crate::models::application::{Application, ApplicationStatus, ReviewAction};
use crate::models::checkin::{AttendanceStatus, CheckInReceipt, CheckInRecord};
use crate::utils::time::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentInfo {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// On-disk layout of a snapshot file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub student: Option<StudentInfo>,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub applications: Vec<Application>,
    #[serde(default)]
    pub checkins: Vec<CheckInRecord>,
    /// Today's check-in code per activity id.
    #[serde(default)]
    pub checkin_codes: BTreeMap<i64, String>,
}

pub struct SnapshotApi {
    path: PathBuf,
    session: Session,
    clock: Clock,
    state: Mutex<Snapshot>,
}

fn rejected(status: u16, message: &str) -> AppError {
    AppError::Api {
        status,
        message: message.to_string(),
    }
}

impl Snapshot {
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    fn activity(&self, id: i64) -> AppResult<&Activity> {
        self.activities
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| rejected(404, "Not found."))
    }

    fn next_application_id(&self) -> i64 {
        self.applications.iter().map(|a| a.id).max().unwrap_or(0) + 1
    }

    fn next_checkin_id(&self) -> i64 {
        self.checkins.iter().map(|c| c.id).max().unwrap_or(0) + 1
    }
}

impl SnapshotApi {
    pub fn open(path: &Path, session: Session, clock: Clock) -> AppResult<Self> {
        let snapshot = Snapshot::load(path)?;
        debug!(
            path = %path.display(),
            activities = snapshot.activities.len(),
            applications = snapshot.applications.len(),
            "snapshot loaded"
        );
        Ok(Self {
            path: path.to_path_buf(),
            session,
            clock,
            state: Mutex::new(snapshot),
        })
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, Snapshot>> {
        self.state
            .lock()
            .map_err(|_| AppError::Other("snapshot state poisoned".to_string()))
    }

    /// Student id of the caller: the session's, else the snapshot's own.
    fn student_id(&self, snapshot: &Snapshot) -> AppResult<i64> {
        self.session
            .student_id
            .or_else(|| snapshot.student.as_ref().map(|s| s.id))
            .ok_or_else(|| rejected(401, "Authentication credentials were not provided."))
    }

    fn require_organizer(&self) -> AppResult<()> {
        if self.session.role.is_organizer() {
            Ok(())
        } else {
            Err(rejected(
                403,
                "You do not have permission to perform this action.",
            ))
        }
    }

    fn require_student(&self) -> AppResult<()> {
        if self.session.role.is_student() {
            Ok(())
        } else {
            Err(rejected(403, "Only students can perform this action."))
        }
    }

    fn persist(&self, snapshot: &Snapshot) -> AppResult<()> {
        snapshot.save(&self.path)?;
        debug!(path = %self.path.display(), "snapshot saved");
        Ok(())
    }
}

impl ActivityApi for SnapshotApi {
    async fn activity(&self, id: i64) -> AppResult<Activity> {
        let state = self.lock()?;
        state.activity(id).cloned()
    }

    async fn my_applications(&self) -> AppResult<Vec<Application>> {
        let state = self.lock()?;
        let me = self.student_id(&state)?;
        Ok(state
            .applications
            .iter()
            .filter(|a| a.studentid == me)
            .cloned()
            .collect())
    }

    async fn apply(&self, activity_id: i64) -> AppResult<Application> {
        self.require_student()?;
        let mut state = self.lock()?;
        let me = self.student_id(&state)?;
        let activity = state.activity(activity_id)?.clone();

        let already = state.applications.iter().any(|a| {
            a.studentid == me
                && a.belongs_to(activity_id)
                && a.status != ApplicationStatus::Cancelled
        });
        if already {
            return Err(rejected(400, "You have already applied to this activity."));
        }
        if !activity.status.accepts_applications() {
            return Err(rejected(400, "This activity is not open for applications."));
        }
        if !activity.capacity_available() {
            return Err(rejected(400, "This activity is full."));
        }

        let student = state.student.clone().unwrap_or_default();
        let application = Application {
            id: state.next_application_id(),
            activity: Some(activity_id),
            activity_title: Some(activity.title.clone()),
            studentid: me,
            student_name: student.name,
            student_email: student.email,
            status: ApplicationStatus::Pending,
            submitted_at: Some(self.clock.now()),
            decision_at: None,
            notes: None,
        };
        state.applications.push(application.clone());
        self.persist(&state)?;
        Ok(application)
    }

    async fn cancel_application(&self, application_id: i64) -> AppResult<()> {
        let mut state = self.lock()?;
        let me = self.student_id(&state)?;
        let app = state
            .applications
            .iter_mut()
            .find(|a| a.id == application_id && a.studentid == me)
            .ok_or_else(|| rejected(404, "Not found."))?;

        match app.status {
            ApplicationStatus::Pending | ApplicationStatus::Approved => {
                app.status = ApplicationStatus::Cancelled;
            }
            _ => {
                return Err(rejected(
                    400,
                    "Only pending or approved applications can be cancelled.",
                ));
            }
        }
        self.persist(&state)
    }

    async fn activity_applications(&self, activity_id: i64) -> AppResult<Vec<Application>> {
        self.require_organizer()?;
        let state = self.lock()?;
        state.activity(activity_id)?;
        Ok(state
            .applications
            .iter()
            .filter(|a| a.belongs_to(activity_id))
            .cloned()
            .collect())
    }

    async fn review_application(
        &self,
        application_id: i64,
        action: ReviewAction,
        reason: Option<String>,
    ) -> AppResult<Application> {
        self.require_organizer()?;
        let now = self.clock.now();
        let mut state = self.lock()?;
        let app = state
            .applications
            .iter_mut()
            .find(|a| a.id == application_id)
            .ok_or_else(|| rejected(404, "Not found."))?;

        if app.status != ApplicationStatus::Pending {
            return Err(rejected(400, "Only pending applications can be reviewed."));
        }

        app.status = match action {
            ReviewAction::Approve => ApplicationStatus::Approved,
            ReviewAction::Reject => ApplicationStatus::Rejected,
        };
        app.decision_at = Some(now);
        app.notes = reason;
        let reviewed = app.clone();

        if action == ReviewAction::Approve
            && let Some(activity_id) = reviewed.activity
            && let Some(activity) = state.activities.iter_mut().find(|a| a.id == activity_id)
        {
            activity.current_participants += 1;
            activity.capacity_reached = !activity.capacity_available();
        }

        self.persist(&state)?;
        Ok(reviewed)
    }

    async fn checkin_status(&self, activity_id: i64) -> AppResult<Option<CheckInRecord>> {
        let state = self.lock()?;
        let me = self.student_id(&state)?;
        Ok(state
            .checkins
            .iter()
            .find(|c| c.activity == activity_id && c.student == me)
            .cloned())
    }

    async fn checkin_list(&self, activity_id: i64) -> AppResult<Vec<CheckInRecord>> {
        self.require_organizer()?;
        let state = self.lock()?;
        state.activity(activity_id)?;
        Ok(state
            .checkins
            .iter()
            .filter(|c| c.activity == activity_id)
            .cloned()
            .collect())
    }

    async fn checkin(&self, activity_id: i64, code: &str) -> AppResult<CheckInReceipt> {
        self.require_student()?;
        let now = self.clock.now();
        let mut state = self.lock()?;
        let me = self.student_id(&state)?;
        let activity = state.activity(activity_id)?.clone();

        let approved = state
            .applications
            .iter()
            .any(|a| a.studentid == me && a.belongs_to(activity_id) && a.status.is_approved());
        if !approved {
            return Err(rejected(
                403,
                "You must have an approved application to check in.",
            ));
        }

        if window::is_not_started(activity.start_at, now) {
            return Err(rejected(400, "This activity has not started yet."));
        }
        if window::is_ended(activity.end_at, now) {
            return Err(rejected(400, "This activity has already ended."));
        }

        if state
            .checkins
            .iter()
            .any(|c| c.activity == activity_id && c.student == me && c.is_present())
        {
            return Err(rejected(400, "You have already checked in to this activity."));
        }

        let expected = state.checkin_codes.get(&activity_id).map(|c| sanitize_code(c));
        if expected.as_deref() != Some(sanitize_code(code).as_str()) {
            return Err(rejected(400, "Invalid check-in code."));
        }

        let student = state.student.clone().unwrap_or_default();
        let id = state.next_checkin_id();
        state
            .checkins
            .retain(|c| !(c.activity == activity_id && c.student == me));
        state.checkins.push(CheckInRecord {
            id,
            student: me,
            student_name: student.name,
            student_email: student.email,
            activity: activity_id,
            attendance_status: AttendanceStatus::Present,
            checked_in_at: Some(now),
            marked_absent_at: None,
        });
        self.persist(&state)?;

        Ok(CheckInReceipt {
            message: Some("Check-in successful.".to_string()),
            checked_in_at: Some(now),
        })
    }

    async fn checkin_code(&self, activity_id: i64) -> AppResult<String> {
        self.require_organizer()?;
        let state = self.lock()?;
        state.activity(activity_id)?;
        state
            .checkin_codes
            .get(&activity_id)
            .cloned()
            .ok_or_else(|| rejected(404, "No check-in code has been issued for today."))
    }
}
