//! Periodic and on-demand refresh of one activity's resolved status.
//!
//! Every fetch gets a generation number when it starts. Fetches run as
//! separate tasks and may finish out of order; [`StatusCell`] applies a
//! result only if it is newer than the last one applied, so a slow early
//! response can never overwrite a fresher one.

use crate::api::ActivityApi;
use crate::core::detail::fetch_student_state;
use crate::core::resolver;
use crate::errors::AppResult;
use crate::models::application::ApplicationStatus;
use crate::models::status::DisplayStatus;
use crate::utils::time::Clock;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// What the last applied fetch saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Observed {
    /// Nothing fetched yet.
    #[default]
    Unknown,
    NoApplication,
    Status(DisplayStatus),
}

impl Observed {
    pub fn status(&self) -> Option<DisplayStatus> {
        match self {
            Observed::Status(s) => Some(*s),
            _ => None,
        }
    }
}

/// Why a fetch was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Tick,
    /// The view became visible again.
    Visible,
    /// The view regained focus.
    Focus,
}

/// Outcome of offering a fetch result to a [`StatusCell`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    /// An equal or newer generation was already applied.
    Stale,
    Unchanged,
    Changed,
}

/// Last applied observation and the generation it came from.
#[derive(Debug, Default)]
pub struct StatusCell<T = Observed> {
    generation: u64,
    value: T,
}

impl<T: Copy + PartialEq + Default> StatusCell<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offer(&mut self, generation: u64, value: T) -> Offer {
        if generation <= self.generation {
            return Offer::Stale;
        }
        self.generation = generation;
        if self.value == value {
            return Offer::Unchanged;
        }
        self.value = value;
        Offer::Changed
    }

    pub fn value(&self) -> T {
        self.value
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PollerConfig {
    /// Period while the student is approved and check-in matters.
    pub checkin_every: Duration,
    /// Period otherwise: only the application decision can change.
    pub application_every: Duration,
}

impl PollerConfig {
    pub fn fixed(every: Duration) -> Self {
        Self {
            checkin_every: every,
            application_every: every,
        }
    }

    fn period_for(&self, observed: Observed) -> Duration {
        match observed {
            Observed::Status(DisplayStatus::Approved | DisplayStatus::PleaseCheckIn) => {
                self.checkin_every
            }
            _ => self.application_every,
        }
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            checkin_every: Duration::from_secs(10),
            application_every: Duration::from_secs(30),
        }
    }
}

pub struct Poller<A> {
    api: Arc<A>,
    activity_id: i64,
    start_at: Option<DateTime<Utc>>,
    end_at: Option<DateTime<Utc>>,
    clock: Clock,
    config: PollerConfig,
}

pub struct PollerHandle<T = Observed> {
    triggers: mpsc::Sender<Trigger>,
    updates: watch::Receiver<T>,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl<T: Copy> PollerHandle<T> {
    /// Request an immediate refresh. False once the poller has stopped.
    pub async fn trigger(&self, trigger: Trigger) -> bool {
        self.triggers.send(trigger).await.is_ok()
    }

    pub fn trigger_sender(&self) -> mpsc::Sender<Trigger> {
        self.triggers.clone()
    }

    /// Receiver that wakes on every change of the observed value.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.updates.clone()
    }

    pub fn current(&self) -> T {
        *self.updates.borrow()
    }

    /// Stop polling and wait for the loop to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            warn!(%e, "poller task did not exit cleanly");
        }
    }
}

/// Create the trigger, update and shutdown channels around a polling loop
/// and start it. Updates begin at `T::default()`.
pub(crate) fn launch<T, F, Fut>(run: F) -> PollerHandle<T>
where
    T: Default + Send + Sync + 'static,
    F: FnOnce(mpsc::Receiver<Trigger>, watch::Sender<T>, watch::Receiver<bool>) -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    let (trigger_tx, trigger_rx) = mpsc::channel(8);
    let (update_tx, update_rx) = watch::channel(T::default());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(run(trigger_rx, update_tx, shutdown_rx));

    PollerHandle {
        triggers: trigger_tx,
        updates: update_rx,
        shutdown: shutdown_tx,
        task,
    }
}

/// Fetch the student's records and fold them into one observation.
async fn observe<A: ActivityApi>(
    api: &A,
    activity_id: i64,
    start_at: Option<DateTime<Utc>>,
    end_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> AppResult<Observed> {
    let (application, checkin) = fetch_student_state(api, activity_id).await?;
    let status: Option<ApplicationStatus> = application.map(|a| a.status);
    Ok(
        match resolver::resolve_optional(status, checkin.as_ref(), start_at, end_at, now) {
            Some(resolved) => Observed::Status(resolved),
            None => Observed::NoApplication,
        },
    )
}

pub(crate) fn ticker(period: Duration, first: Instant) -> Interval {
    let mut ticker = time::interval_at(first, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

impl<A: ActivityApi + 'static> Poller<A> {
    pub fn new(
        api: Arc<A>,
        activity_id: i64,
        start_at: Option<DateTime<Utc>>,
        end_at: Option<DateTime<Utc>>,
        clock: Clock,
        config: PollerConfig,
    ) -> Self {
        Self {
            api,
            activity_id,
            start_at,
            end_at,
            clock,
            config,
        }
    }

    /// Start the loop on the current runtime. The first fetch runs at once.
    pub fn spawn(self) -> PollerHandle {
        launch(|triggers, updates, shutdown| self.run(triggers, updates, shutdown))
    }

    fn start_fetch(
        &self,
        generation: u64,
        trigger: Trigger,
        done: &mpsc::Sender<(u64, AppResult<Observed>)>,
    ) {
        debug!(activity_id = self.activity_id, generation, ?trigger, "fetch started");

        let api = Arc::clone(&self.api);
        let done = done.clone();
        let (activity_id, start_at, end_at) = (self.activity_id, self.start_at, self.end_at);
        let now = self.clock.now();

        tokio::spawn(async move {
            let result = observe(api.as_ref(), activity_id, start_at, end_at, now).await;
            // receiver gone means the poller shut down
            let _ = done.send((generation, result)).await;
        });
    }

    async fn run(
        self,
        mut triggers: mpsc::Receiver<Trigger>,
        updates: watch::Sender<Observed>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let (done_tx, mut done_rx) = mpsc::channel::<(u64, AppResult<Observed>)>(16);
        let mut cell: StatusCell = StatusCell::new();
        let mut next_generation: u64 = 0;
        let mut period = self.config.period_for(cell.value());
        let mut interval = ticker(period, Instant::now());

        loop {
            tokio::select! {
                biased;

                _ = shutdown.changed() => break,

                Some((generation, result)) = done_rx.recv() => match result {
                    Ok(observed) => match cell.offer(generation, observed) {
                        Offer::Stale => {
                            debug!(generation, applied = cell.generation(), "stale result dropped");
                        }
                        Offer::Unchanged => {}
                        Offer::Changed => {
                            info!(activity_id = self.activity_id, ?observed, "status changed");
                            updates.send_replace(observed);

                            let wanted = self.config.period_for(observed);
                            if wanted != period {
                                period = wanted;
                                interval = ticker(period, Instant::now() + period);
                            }
                        }
                    },
                    Err(e) => {
                        warn!(activity_id = self.activity_id, generation, %e, "refresh failed, keeping last status");
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

        debug!(activity_id = self.activity_id, "poller stopped");
    }
}
