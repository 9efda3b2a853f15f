//! Boundary to the activities backend.
//!
//! Everything the core needs from the server goes through [`ActivityApi`].
//! [`http::HttpApi`] talks to the real REST service; [`snapshot::SnapshotApi`]
//! serves the same calls from a JSON file.

pub mod envelope;
pub mod http;
pub mod session;
pub mod snapshot;

use crate::errors::AppResult;
use crate::models::activity::Activity;
use crate::models::application::{Application, ReviewAction};
use crate::models::checkin::{CheckInReceipt, CheckInRecord};
use std::future::Future;

pub use session::Session;

pub trait ActivityApi: Send + Sync {
    /// `GET /api/activities/{id}/`
    fn activity(&self, id: i64) -> impl Future<Output = AppResult<Activity>> + Send;

    /// `GET /api/activities/applications/` (the caller's own applications)
    fn my_applications(&self) -> impl Future<Output = AppResult<Vec<Application>>> + Send;

    /// `POST /api/activities/applications/`
    fn apply(&self, activity_id: i64) -> impl Future<Output = AppResult<Application>> + Send;

    /// `POST /api/activities/applications/{id}/cancel/`
    fn cancel_application(&self, application_id: i64) -> impl Future<Output = AppResult<()>> + Send;

    /// `GET /api/activities/{id}/applications/`
    fn activity_applications(
        &self,
        activity_id: i64,
    ) -> impl Future<Output = AppResult<Vec<Application>>> + Send;

    /// `POST /api/activities/applications/{id}/review/`
    fn review_application(
        &self,
        application_id: i64,
        action: ReviewAction,
        reason: Option<String>,
    ) -> impl Future<Output = AppResult<Application>> + Send;

    /// `GET /api/activities/{id}/checkin-status/`; `None` when the caller
    /// has no record yet.
    fn checkin_status(
        &self,
        activity_id: i64,
    ) -> impl Future<Output = AppResult<Option<CheckInRecord>>> + Send;

    /// `GET /api/activities/{id}/checkin-list/`
    fn checkin_list(
        &self,
        activity_id: i64,
    ) -> impl Future<Output = AppResult<Vec<CheckInRecord>>> + Send;

    /// `POST /api/activities/{id}/checkin/` with `{code}`
    fn checkin(
        &self,
        activity_id: i64,
        code: &str,
    ) -> impl Future<Output = AppResult<CheckInReceipt>> + Send;

    /// `GET /api/activities/{id}/checkin-code/`
    fn checkin_code(&self, activity_id: i64) -> impl Future<Output = AppResult<String>> + Send;
}

/// The caller's application for one activity, if any.
pub async fn find_my_application<A: ActivityApi>(
    api: &A,
    activity_id: i64,
) -> AppResult<Option<Application>> {
    let apps = api.my_applications().await?;
    Ok(apps.into_iter().find(|a| a.belongs_to(activity_id)))
}
