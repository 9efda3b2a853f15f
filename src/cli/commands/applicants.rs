use crate::api::ActivityApi;
use crate::cli::commands::Context;
use crate::core::resolver;
use crate::errors::AppResult;
use crate::models::activity::Activity;
use crate::models::application::Application;
use crate::models::checkin::CheckInRecord;
use crate::ui::messages::info;
use crate::utils::colors::paint;
use crate::utils::formatting::bold;
use crate::utils::table::{Column, Table};
use crate::utils::time::format_optional;
use chrono::{DateTime, Utc};

pub async fn handle<A: ActivityApi>(api: &A, ctx: &Context, id: i64) -> AppResult<()> {
    let activity = api.activity(id).await?;
    let applications = api.activity_applications(id).await?;
    let checkins = api.checkin_list(id).await?;
    let now = ctx.now();

    println!("{} ({})\n", bold(&activity.title), activity.seats_label());

    if applications.is_empty() {
        info("No applications yet.");
        return Ok(());
    }

    let table = applicants_table(&activity, &applications, &checkins, now);
    print!("{}", table.render());
    Ok(())
}

/// One row per application; only the status cell is coloured.
pub fn applicants_table(
    activity: &Activity,
    applications: &[Application],
    checkins: &[CheckInRecord],
    now: DateTime<Utc>,
) -> Table {
    let mut table = Table::new(vec![
        Column::new("ID", 4),
        Column::new("Student", 12),
        Column::new("Email", 12),
        Column::new("Status", 14),
        Column::new("Checked in", 16),
    ]);

    for app in applications {
        let record = checkins.iter().find(|c| c.student == app.studentid);
        let status = resolver::resolve(app.status, record, activity.start_at, activity.end_at, now);

        table.add_row(vec![
            app.id.to_string(),
            app.display_name(),
            app.student_email.clone().unwrap_or_else(|| "-".to_string()),
            paint(status.label(), status.color()),
            format_optional(record.and_then(|r| r.checked_in_at)),
        ]);
    }

    table
}
