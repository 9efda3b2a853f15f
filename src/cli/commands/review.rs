use crate::api::ActivityApi;
use crate::cli::commands::Context;
use crate::db::log::oplog_quiet;
use crate::errors::{AppError, AppResult};
use crate::models::application::ReviewAction;
use crate::models::status::DisplayStatus;
use crate::ui::messages::{badge, modal};
use tracing::info;

pub async fn handle<A: ActivityApi>(
    api: &A,
    ctx: &Context,
    application_id: i64,
    approve: bool,
    reason: Option<&str>,
) -> AppResult<()> {
    let action = if approve {
        ReviewAction::Approve
    } else {
        ReviewAction::Reject
    };
    let reason = reason.map(str::trim).filter(|r| !r.is_empty());

    if action == ReviewAction::Reject && reason.is_none() {
        return Err(AppError::InvalidInput(
            "a reason is required when rejecting an application".to_string(),
        ));
    }

    let reviewed = match api
        .review_application(application_id, action, reason.map(str::to_string))
        .await
    {
        Ok(app) => app,
        Err(e) => {
            modal(false, "Review Failed", &e);
            return Err(e);
        }
    };
    info!(application_id, action = action.as_str(), "application reviewed");

    let pool = ctx.open_log()?;
    oplog_quiet(
        &pool.conn,
        "review",
        &application_id.to_string(),
        &format!("{} {}", action.as_str(), reviewed.display_name()),
    );

    modal(
        true,
        "Application Reviewed",
        format!(
            "{} is now {}",
            reviewed.display_name(),
            badge(DisplayStatus::from(reviewed.status))
        ),
    );
    Ok(())
}
