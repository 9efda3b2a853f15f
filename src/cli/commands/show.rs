use crate::api::ActivityApi;
use crate::cli::commands::Context;
use crate::core::action::Action;
use crate::core::detail::{self, EventDetail};
use crate::errors::AppResult;
use crate::ui::messages::badge;
use crate::utils::colors::{color_for_enabled, colorize_optional, paint};
use crate::utils::formatting::{bold, button, wrap_indented};
use crate::utils::time::format_optional;

const WRAP_WIDTH: usize = 72;

pub async fn handle<A: ActivityApi>(api: &A, ctx: &Context, id: i64) -> AppResult<()> {
    let detail = detail::load(api, ctx.role(), id, ctx.now()).await?;
    render(&detail);
    Ok(())
}

pub fn render(detail: &EventDetail) {
    let activity = &detail.activity;

    println!("{}", bold(&activity.title));
    println!("  When      : {}", detail.window_label());
    println!("  Where     : {}", colorize_optional(&activity.location));
    println!(
        "  Seats     : {}{}",
        activity.seats_label(),
        if activity.capacity_available() {
            ""
        } else {
            " (full)"
        }
    );
    println!("  Activity  : {}", activity.status.as_str());
    println!("  Timing    : {}", detail.time_status.label());
    if !activity.organizer_name.is_empty() || !activity.organizer_email.is_empty() {
        println!(
            "  Organizer : {} {}",
            activity.organizer_name,
            colorize_optional(&activity.organizer_email)
        );
    }
    if let Some(hours) = activity.hours_awarded {
        println!("  Hours     : {hours}");
    }
    if !activity.categories.is_empty() {
        println!("  Tags      : {}", activity.categories.join(", "));
    }

    if !activity.description.trim().is_empty() {
        println!();
        println!("{}", wrap_indented(&activity.description, WRAP_WIDTH, 2));
    }

    println!();
    if let Some(status) = detail.resolved {
        println!("  Your status : {}", badge(status));
    }
    if let Some(app) = &detail.application
        && let Some(notes) = app.notes.as_deref().filter(|n| !n.trim().is_empty())
    {
        println!("  Note        : {notes}");
    }
    if let Some(record) = &detail.checkin
        && record.checked_in_at.is_some()
    {
        println!("  Checked in  : {}", format_optional(record.checked_in_at));
    }

    print_action(&detail.action, activity.id);
}

pub fn print_action(action: &Action, activity_id: i64) {
    let control = paint(&button(action.label()), color_for_enabled(action.is_enabled()));
    match action.command_hint(activity_id) {
        Some(hint) => println!("  {control}  {hint}"),
        None => println!("  {control}"),
    }
}
