use crate::api::ActivityApi;
use crate::cli::commands::Context;
use crate::errors::AppResult;
use crate::sync::{Observed, Poller, PollerConfig, Trigger};
use crate::ui::messages::{badge, info};
use crate::utils::formatting::bold;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Terminal input that asks a watcher for a fresh fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalEvent {
    EnterPressed,
    /// The terminal was resized, so the window is on screen.
    Resized,
}

impl From<TerminalEvent> for Trigger {
    fn from(event: TerminalEvent) -> Self {
        match event {
            TerminalEvent::EnterPressed => Trigger::Focus,
            TerminalEvent::Resized => Trigger::Visible,
        }
    }
}

/// Forward Enter presses and, on unix, terminal resizes to `triggers`.
/// Abort the returned tasks when watching stops.
pub(crate) fn forward_terminal_events(triggers: mpsc::Sender<Trigger>) -> Vec<JoinHandle<()>> {
    let focus = triggers.clone();
    let mut tasks = vec![tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(_)) = lines.next_line().await {
            if focus.send(TerminalEvent::EnterPressed.into()).await.is_err() {
                break;
            }
        }
    })];

    #[cfg(unix)]
    tasks.push(tokio::spawn(forward_resizes(triggers)));
    #[cfg(not(unix))]
    drop(triggers);

    tasks
}

#[cfg(unix)]
async fn forward_resizes(triggers: mpsc::Sender<Trigger>) {
    use tokio::signal::unix::{SignalKind, signal};
    use tracing::debug;

    let mut resized = match signal(SignalKind::window_change()) {
        Ok(stream) => stream,
        Err(e) => {
            debug!(%e, "terminal resize events unavailable");
            return;
        }
    };
    while resized.recv().await.is_some() {
        if triggers.send(TerminalEvent::Resized.into()).await.is_err() {
            break;
        }
    }
}

pub async fn handle<A: ActivityApi + 'static>(
    api: Arc<A>,
    ctx: &Context,
    id: i64,
    interval: Option<u64>,
    once: bool,
) -> AppResult<()> {
    let activity = api.activity(id).await?;

    let config = match interval {
        Some(secs) => PollerConfig::fixed(Duration::from_secs(secs.max(1))),
        None => PollerConfig {
            checkin_every: Duration::from_secs(ctx.cfg.checkin_poll_secs),
            application_every: Duration::from_secs(ctx.cfg.application_poll_secs),
        },
    };

    let poller = Poller::new(
        Arc::clone(&api),
        id,
        activity.start_at,
        activity.end_at,
        ctx.clock,
        config,
    );
    let handle = poller.spawn();
    let mut updates = handle.subscribe();

    println!("{}", bold(&activity.title));

    let input_tasks = if once {
        Vec::new()
    } else {
        info("Watching for changes. Press Enter to refresh, Ctrl-C to stop.");
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
                let observed = *updates.borrow_and_update();
                print_observed(ctx, observed);
                if once && observed != Observed::Unknown {
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

fn print_observed(ctx: &Context, observed: Observed) {
    let stamp = ctx.now().format("%H:%M:%S");
    match observed {
        Observed::Unknown => {}
        Observed::NoApplication => println!("[{stamp}] no application"),
        Observed::Status(status) => println!("[{stamp}] {}", badge(status)),
    }
}
