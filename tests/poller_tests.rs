use rvolunteer::api::ActivityApi;
use rvolunteer::errors::{AppError, AppResult};
use rvolunteer::models::activity::Activity;
use rvolunteer::models::application::{Application, ApplicationStatus, ReviewAction};
use rvolunteer::models::checkin::{CheckInReceipt, CheckInRecord};
use rvolunteer::models::status::DisplayStatus;
use rvolunteer::sync::{Observed, Offer, Poller, PollerConfig, StatusCell, Trigger};
use rvolunteer::utils::time::{Clock, parse_timestamp};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One scripted answer to `my_applications`: after `delay`, either the
/// given status or a transport failure.
struct Step {
    delay: Duration,
    status: Option<ApplicationStatus>,
}

/// Serves scripted application statuses; other endpoints are not used by
/// the poller for non-approved applications.
struct ScriptedApi {
    steps: Mutex<VecDeque<Step>>,
    fallback: ApplicationStatus,
    calls: AtomicUsize,
}

impl ScriptedApi {
    fn new(steps: Vec<Step>, fallback: ApplicationStatus) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            fallback,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn application(status: ApplicationStatus) -> Application {
    Application {
        id: 1,
        activity: Some(1),
        studentid: 7,
        status,
        ..Default::default()
    }
}

impl ActivityApi for ScriptedApi {
    async fn activity(&self, _id: i64) -> AppResult<Activity> {
        Err(AppError::Other("not scripted".to_string()))
    }

    async fn my_applications(&self) -> AppResult<Vec<Application>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(step) => {
                tokio::time::sleep(step.delay).await;
                match step.status {
                    Some(status) => Ok(vec![application(status)]),
                    None => Err(AppError::Timeout(15)),
                }
            }
            None => Ok(vec![application(self.fallback)]),
        }
    }

    async fn apply(&self, _activity_id: i64) -> AppResult<Application> {
        Err(AppError::Other("not scripted".to_string()))
    }

    async fn cancel_application(&self, _application_id: i64) -> AppResult<()> {
        Err(AppError::Other("not scripted".to_string()))
    }

    async fn activity_applications(&self, _activity_id: i64) -> AppResult<Vec<Application>> {
        Ok(Vec::new())
    }

    async fn review_application(
        &self,
        _application_id: i64,
        _action: ReviewAction,
        _reason: Option<String>,
    ) -> AppResult<Application> {
        Err(AppError::Other("not scripted".to_string()))
    }

    async fn checkin_status(&self, _activity_id: i64) -> AppResult<Option<CheckInRecord>> {
        Ok(None)
    }

    async fn checkin_list(&self, _activity_id: i64) -> AppResult<Vec<CheckInRecord>> {
        Ok(Vec::new())
    }

    async fn checkin(&self, _activity_id: i64, _code: &str) -> AppResult<CheckInReceipt> {
        Err(AppError::Other("not scripted".to_string()))
    }

    async fn checkin_code(&self, _activity_id: i64) -> AppResult<String> {
        Err(AppError::Other("not scripted".to_string()))
    }
}

fn poller(api: Arc<ScriptedApi>, config: PollerConfig) -> Poller<ScriptedApi> {
    // before the window opens, so approved resolves to Approved
    let clock = Clock::Fixed(parse_timestamp("2025-03-01T08:00:00Z").unwrap());
    Poller::new(
        api,
        1,
        Some(parse_timestamp("2025-03-01T09:00:00Z").unwrap()),
        Some(parse_timestamp("2025-03-01T12:00:00Z").unwrap()),
        clock,
        config,
    )
}

#[test]
fn test_status_cell_drops_older_generations() {
    let mut cell = StatusCell::new();
    let approved = Observed::Status(DisplayStatus::Approved);
    let pending = Observed::Status(DisplayStatus::Pending);

    assert_eq!(cell.offer(2, approved), Offer::Changed);
    assert_eq!(cell.offer(1, pending), Offer::Stale);
    assert_eq!(cell.offer(2, pending), Offer::Stale);
    assert_eq!(cell.value(), approved);
    assert_eq!(cell.offer(3, approved), Offer::Unchanged);
    assert_eq!(cell.generation(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_slow_early_fetch_does_not_overwrite_newer_result() {
    let api = Arc::new(ScriptedApi::new(
        vec![
            Step {
                delay: Duration::from_secs(5),
                status: Some(ApplicationStatus::Pending),
            },
            Step {
                delay: Duration::from_millis(10),
                status: Some(ApplicationStatus::Approved),
            },
        ],
        ApplicationStatus::Approved,
    ));

    let handle = poller(Arc::clone(&api), PollerConfig::fixed(Duration::from_secs(600))).spawn();
    let mut updates = handle.subscribe();

    // the immediate tick and the focus trigger start two overlapping fetches
    assert!(handle.trigger(Trigger::Focus).await);

    updates.changed().await.unwrap();
    assert_eq!(
        *updates.borrow_and_update(),
        Observed::Status(DisplayStatus::Approved)
    );

    // let the slow first answer arrive; it must be ignored
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(!updates.has_changed().unwrap());
    assert_eq!(handle.current(), Observed::Status(DisplayStatus::Approved));
    assert_eq!(api.calls(), 2);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_errors_keep_last_status_and_polling_continues() {
    let api = Arc::new(ScriptedApi::new(
        vec![
            Step {
                delay: Duration::ZERO,
                status: Some(ApplicationStatus::Pending),
            },
            Step {
                delay: Duration::ZERO,
                status: None,
            },
        ],
        ApplicationStatus::Approved,
    ));

    let handle = poller(Arc::clone(&api), PollerConfig::fixed(Duration::from_secs(10))).spawn();
    let mut updates = handle.subscribe();

    updates.changed().await.unwrap();
    assert_eq!(
        *updates.borrow_and_update(),
        Observed::Status(DisplayStatus::Pending)
    );

    // second tick fails; status is kept
    tokio::time::sleep(Duration::from_secs(11)).await;
    assert_eq!(handle.current(), Observed::Status(DisplayStatus::Pending));

    // third tick brings the approval
    updates.changed().await.unwrap();
    assert_eq!(
        *updates.borrow_and_update(),
        Observed::Status(DisplayStatus::Approved)
    );
    assert!(api.calls() >= 3);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_stops_polling() {
    let api = Arc::new(ScriptedApi::new(Vec::new(), ApplicationStatus::Pending));

    let handle = poller(Arc::clone(&api), PollerConfig::fixed(Duration::from_secs(10))).spawn();
    let mut updates = handle.subscribe();
    updates.changed().await.unwrap();

    let triggers = handle.trigger_sender();
    handle.shutdown().await;
    let calls = api.calls();

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(api.calls(), calls);
    assert!(triggers.send(Trigger::Visible).await.is_err());
}

fn split_periods() -> PollerConfig {
    PollerConfig {
        checkin_every: Duration::from_secs(10),
        application_every: Duration::from_secs(30),
    }
}

#[tokio::test(start_paused = true)]
async fn test_approved_status_polls_at_checkin_period() {
    let api = Arc::new(ScriptedApi::new(Vec::new(), ApplicationStatus::Approved));
    let handle = poller(Arc::clone(&api), split_periods()).spawn();

    // first fetch at once, then every 10s
    tokio::time::sleep(Duration::from_secs(25)).await;
    assert_eq!(handle.current(), Observed::Status(DisplayStatus::Approved));
    assert_eq!(api.calls(), 3);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_pending_status_polls_at_application_period() {
    let api = Arc::new(ScriptedApi::new(Vec::new(), ApplicationStatus::Pending));
    let handle = poller(Arc::clone(&api), split_periods()).spawn();

    tokio::time::sleep(Duration::from_secs(25)).await;
    assert_eq!(handle.current(), Observed::Status(DisplayStatus::Pending));
    assert_eq!(api.calls(), 1);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(api.calls(), 2);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_period_shortens_once_application_is_approved() {
    let api = Arc::new(ScriptedApi::new(
        vec![Step {
            delay: Duration::ZERO,
            status: Some(ApplicationStatus::Pending),
        }],
        ApplicationStatus::Approved,
    ));
    let handle = poller(Arc::clone(&api), split_periods()).spawn();

    // pending at 0s, approved at the 30s tick, then 40s and 50s
    tokio::time::sleep(Duration::from_secs(55)).await;
    assert_eq!(handle.current(), Observed::Status(DisplayStatus::Approved));
    assert_eq!(api.calls(), 4);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_resize_triggers_visible_refresh() {
    use rvolunteer::cli::commands::watch::TerminalEvent;

    assert_eq!(Trigger::from(TerminalEvent::Resized), Trigger::Visible);
    assert_eq!(Trigger::from(TerminalEvent::EnterPressed), Trigger::Focus);

    let api = Arc::new(ScriptedApi::new(Vec::new(), ApplicationStatus::Pending));
    let handle = poller(Arc::clone(&api), PollerConfig::fixed(Duration::from_secs(600))).spawn();
    let mut updates = handle.subscribe();
    updates.changed().await.unwrap();
    assert_eq!(api.calls(), 1);

    assert!(handle.trigger(TerminalEvent::Resized.into()).await);
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(api.calls(), 2);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_notification_counts_poll_every_minute() {
    use rvolunteer::core::notifications::NotificationCount;
    use rvolunteer::models::role::Role;
    use rvolunteer::sync::NotificationPoller;
    use std::collections::HashSet;

    let api = Arc::new(ScriptedApi::new(
        vec![Step {
            delay: Duration::ZERO,
            status: Some(ApplicationStatus::Pending),
        }],
        ApplicationStatus::Approved,
    ));
    let handle = NotificationPoller::new(
        Arc::clone(&api),
        Role::Student,
        HashSet::new(),
        Clock::Fixed(parse_timestamp("2025-03-01T08:00:00Z").unwrap()),
        Duration::from_secs(60),
    )
    .spawn();
    let mut updates = handle.subscribe();

    // pending applications produce nothing to notify
    updates.changed().await.unwrap();
    assert_eq!(
        *updates.borrow_and_update(),
        Some(NotificationCount { unread: 0, new: 0 })
    );

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(api.calls(), 1);

    // the approval shows up on the next minute tick
    updates.changed().await.unwrap();
    assert_eq!(
        *updates.borrow_and_update(),
        Some(NotificationCount { unread: 1, new: 0 })
    );
    assert_eq!(api.calls(), 2);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_notification_poller_is_silent_for_organizers() {
    use rvolunteer::models::role::Role;
    use rvolunteer::sync::NotificationPoller;
    use std::collections::HashSet;

    let api = Arc::new(ScriptedApi::new(Vec::new(), ApplicationStatus::Approved));
    let handle = NotificationPoller::new(
        Arc::clone(&api),
        Role::Organizer,
        HashSet::new(),
        Clock::Fixed(parse_timestamp("2025-03-01T08:00:00Z").unwrap()),
        Duration::from_secs(60),
    )
    .spawn();

    let mut updates = handle.subscribe();
    updates.changed().await.unwrap();
    assert_eq!(handle.current().map(|c| c.unread), Some(0));
    assert_eq!(api.calls(), 0);

    handle.shutdown().await;
}
