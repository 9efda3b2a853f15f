use crate::api::{ActivityApi, find_my_application};
use crate::cli::commands::Context;
use crate::db::log::oplog_quiet;
use crate::errors::{AppError, AppResult};
use crate::models::application::ApplicationStatus;
use crate::ui::messages::modal;
use tracing::info;

pub async fn handle<A: ActivityApi>(api: &A, ctx: &Context, id: i64) -> AppResult<()> {
    let application = find_my_application(api, id)
        .await?
        .filter(|a| a.status != ApplicationStatus::Cancelled)
        .ok_or_else(|| AppError::NotFound(format!("no active application for activity {id}")))?;

    if let Err(e) = api.cancel_application(application.id).await {
        modal(false, "Cancellation Failed", &e);
        return Err(e);
    }
    info!(activity_id = id, application_id = application.id, "application cancelled");

    let title = application
        .activity_title
        .clone()
        .unwrap_or_else(|| format!("activity {id}"));

    let pool = ctx.open_log()?;
    oplog_quiet(
        &pool.conn,
        "cancel",
        &id.to_string(),
        &format!("Cancelled application {} to '{title}'", application.id),
    );

    modal(
        true,
        "Application Cancelled",
        format!("Your application to '{title}' has been cancelled."),
    );
    Ok(())
}
