use crate::api::ActivityApi;
use crate::cli::commands::Context;
use crate::core::checkin::{failure_from_error, is_activity_status_error, validate_code};
use crate::db::log::oplog_quiet;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, modal};
use crate::utils::time::format_optional;
use tracing::warn;

pub async fn handle<A: ActivityApi>(
    api: &A,
    ctx: &Context,
    id: i64,
    raw_code: &str,
) -> AppResult<()> {
    let code = match validate_code(raw_code) {
        Ok(code) => code,
        Err(e) => {
            modal(false, "Check-in Failed", &e);
            return Err(e);
        }
    };

    match api.checkin(id, code.as_str()).await {
        Ok(receipt) => {
            tracing::info!(activity_id = id, "checked in");

            let pool = ctx.open_log()?;
            oplog_quiet(&pool.conn, "checkin", &id.to_string(), "Checked in");

            let at = receipt.checked_in_at.unwrap_or_else(|| ctx.now());
            let message = receipt
                .message
                .unwrap_or_else(|| "You are checked in.".to_string());
            modal(
                true,
                "Check-in Successful",
                format!("{message}\nChecked in at {}", format_optional(Some(at))),
            );
            Ok(())
        }
        Err(e) => {
            let failure = failure_from_error(&e);
            warn!(activity_id = id, %e, ?failure, "check-in rejected");
            let message = failure.user_message();
            modal(false, "Check-in Failed", &message);
            if is_activity_status_error(&message) {
                info(format!("Run `rvolunteer show {id}` to see the schedule."));
            }

            Err(match e {
                AppError::Api { status, .. } => AppError::Api { status, message },
                other => other,
            })
        }
    }
}
