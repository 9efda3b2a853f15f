//! Periodic refresh of the caller's notification counts.
//!
//! Same loop shape as the status poller: generation-tagged fetches on their
//! own tasks, a [`StatusCell`] that drops stale answers, and a watch channel
//! that only wakes on changes.

use super::poller::{Offer, PollerHandle, StatusCell, Trigger, launch, ticker};
use crate::api::ActivityApi;
use crate::core::notifications::{self, NotificationCount};
use crate::errors::AppResult;
use crate::models::role::Role;
use crate::utils::time::Clock;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, info, warn};

pub struct NotificationPoller<A> {
    api: Arc<A>,
    role: Role,
    read: Arc<HashSet<String>>,
    clock: Clock,
    every: Duration,
}

impl<A: ActivityApi + 'static> NotificationPoller<A> {
    /// `read` is the set of ids already marked read when polling starts.
    pub fn new(
        api: Arc<A>,
        role: Role,
        read: HashSet<String>,
        clock: Clock,
        every: Duration,
    ) -> Self {
        Self {
            api,
            role,
            read: Arc::new(read),
            clock,
            every,
        }
    }

    /// Start the loop on the current runtime. The first fetch runs at once;
    /// the published value stays `None` until one succeeds.
    pub fn spawn(self) -> PollerHandle<Option<NotificationCount>> {
        launch(|triggers, updates, shutdown| self.run(triggers, updates, shutdown))
    }

    fn start_fetch(
        &self,
        generation: u64,
        trigger: Trigger,
        done: &mpsc::Sender<(u64, AppResult<NotificationCount>)>,
    ) {
        debug!(generation, ?trigger, "notification fetch started");

        let api = Arc::clone(&self.api);
        let read = Arc::clone(&self.read);
        let done = done.clone();
        let role = self.role;
        let now = self.clock.now();

        tokio::spawn(async move {
            let result = notifications::fetch(api.as_ref(), role, &read, now)
                .await
                .map(|list| NotificationCount::of(&list));
            let _ = done.send((generation, result)).await;
        });
    }

    async fn run(
        self,
        mut triggers: mpsc::Receiver<Trigger>,
        updates: watch::Sender<Option<NotificationCount>>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let (done_tx, mut done_rx) = mpsc::channel::<(u64, AppResult<NotificationCount>)>(16);
        let mut cell: StatusCell<Option<NotificationCount>> = StatusCell::new();
        let mut next_generation: u64 = 0;
        let mut interval = ticker(self.every, Instant::now());

        loop {
            tokio::select! {
                biased;

                _ = shutdown.changed() => break,

                Some((generation, result)) = done_rx.recv() => match result {
                    Ok(count) => match cell.offer(generation, Some(count)) {
                        Offer::Stale => {
                            debug!(generation, applied = cell.generation(), "stale count dropped");
                        }
                        Offer::Unchanged => {}
                        Offer::Changed => {
                            info!(unread = count.unread, new = count.new, "notification count changed");
                            updates.send_replace(Some(count));
                        }
                    },
                    Err(e) => {
                        warn!(generation, %e, "notification refresh failed, keeping last count");
                    }
                },

                Some(trigger) = triggers.recv() => {
                    next_generation += 1;
                    self.start_fetch(next_generation, trigger, &done_tx);
                }

                _ = interval.tick() => {
                    next_generation += 1;
                    self.start_fetch(next_generation, Trigger::Tick, &done_tx);
                }
            }
        }

        debug!("notification poller stopped");
    }
}
