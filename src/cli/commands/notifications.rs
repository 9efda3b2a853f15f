use crate::api::ActivityApi;
use crate::cli::commands::Context;
use crate::cli::commands::watch::forward_terminal_events;
use crate::core::notifications::{self, Notification, NotificationCount};
use crate::db::log::oplog_quiet;
use crate::db::notifications::{mark_read, read_ids};
use crate::errors::AppResult;
use crate::sync::NotificationPoller;
use crate::ui::messages::{info, success};
use crate::utils::colors::{BLUE, GREY, paint};
use crate::utils::formatting::bold;
use crate::utils::time::format_optional;
use std::sync::Arc;
use std::time::Duration;

/// Print the caller's notifications, optionally marking them read.
pub async fn list<A: ActivityApi>(api: &A, ctx: &Context, mark: bool) -> AppResult<()> {
    let pool = ctx.open_log()?;
    let read = read_ids(&pool.conn)?;
    let list = notifications::fetch(api, ctx.role(), &read, ctx.now()).await?;

    if list.is_empty() {
        info("No notifications.");
        return Ok(());
    }

    for n in &list {
        print_notification(n);
    }
    println!("{}", summary(NotificationCount::of(&list)));

    if mark {
        let ids: Vec<String> = list.iter().map(|n| n.id.clone()).collect();
        let marked = mark_read(&pool.conn, &ids)?;
        oplog_quiet(
            &pool.conn,
            "notifications",
            "",
            &format!("{marked} notification(s) marked as read"),
        );
        success(format!("{marked} notification(s) marked as read"));
    }

    Ok(())
}

/// Keep the counts up to date and print each change.
pub async fn watch<A: ActivityApi + 'static>(
    api: Arc<A>,
    ctx: &Context,
    interval: Option<u64>,
    once: bool,
) -> AppResult<()> {
    let read = read_ids(&ctx.open_log()?.conn)?;
    let every = Duration::from_secs(interval.unwrap_or(ctx.cfg.notification_poll_secs).max(1));

    let handle = NotificationPoller::new(api, ctx.role(), read, ctx.clock, every).spawn();
    let mut updates = handle.subscribe();

    let input_tasks = if once {
        Vec::new()
    } else {
        info("Watching notifications. Press Enter to refresh, Ctrl-C to stop.");
        forward_terminal_events(handle.trigger_sender())
    };

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let Some(count) = *updates.borrow_and_update() else {
                    continue;
                };
                println!("[{}] {}", ctx.now().format("%H:%M:%S"), summary(count));
                if once {
                    break;
                }
            }
            _ = &mut ctrl_c => break,
        }
    }

    for task in input_tasks {
        task.abort();
    }
    handle.shutdown().await;
    Ok(())
}

fn summary(count: NotificationCount) -> String {
    format!("🔔 {} unread, {} new", count.unread, count.new)
}

fn print_notification(n: &Notification) {
    let marker = if n.read {
        paint("○", GREY)
    } else {
        paint("●", BLUE)
    };
    let new = if n.is_new { " (new)" } else { "" };

    println!("{marker} {}{new}  {}", bold(n.kind.title()), format_optional(n.timestamp));
    for line in n.message.lines() {
        println!("    {line}");
    }
    println!();
}
