use crate::api::ActivityApi;
use crate::cli::commands::Context;
use crate::core::window;
use crate::errors::AppResult;
use crate::ui::messages::{header, warning};
use crate::utils::formatting::bold;

pub async fn handle<A: ActivityApi>(api: &A, ctx: &Context, id: i64) -> AppResult<()> {
    let activity = api.activity(id).await?;
    let code = api.checkin_code(id).await?;

    header(format!("Check-in code: {}", activity.title));
    println!("        {}\n", bold(&spaced(&code)));
    println!("  {}", window::format_window(activity.start_at, activity.end_at));

    if !window::is_within_date_range(activity.start_at, activity.end_at, ctx.now()) {
        warning("Check-in is only open on the days of the activity.");
    }
    Ok(())
}

/// `AB1234` → `A B 1 2 3 4`, easier to read off a projector.
fn spaced(code: &str) -> String {
    code.chars()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
