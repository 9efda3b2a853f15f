use crate::api::ActivityApi;
use crate::cli::commands::Context;
use crate::core::action::Action;
use crate::core::detail;
use crate::db::log::oplog_quiet;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{badge, modal};
use crate::models::status::DisplayStatus;
use tracing::info;

pub async fn handle<A: ActivityApi>(api: &A, ctx: &Context, id: i64) -> AppResult<()> {
    let detail = detail::load(api, ctx.role(), id, ctx.now()).await?;

    if detail.action != (Action::Apply { enabled: true }) {
        return Err(AppError::InvalidInput(format!(
            "Cannot apply to '{}': {}",
            detail.activity.title,
            detail.action.label()
        )));
    }

    let application = match api.apply(id).await {
        Ok(app) => app,
        Err(e) => {
            modal(false, "Application Failed", &e);
            return Err(e);
        }
    };
    info!(activity_id = id, application_id = application.id, "application submitted");

    let pool = ctx.open_log()?;
    oplog_quiet(
        &pool.conn,
        "apply",
        &id.to_string(),
        &format!("Applied to '{}' (application {})", detail.activity.title, application.id),
    );

    modal(
        true,
        "Application Submitted",
        format!(
            "Your application to '{}' is {}",
            detail.activity.title,
            badge(DisplayStatus::from(application.status))
        ),
    );
    Ok(())
}
