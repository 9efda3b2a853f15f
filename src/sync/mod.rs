//! Background refresh of a student's attendance status and notifications.

pub mod notifier;
pub mod poller;

pub use notifier::NotificationPoller;
pub use poller::{Observed, Offer, Poller, PollerConfig, PollerHandle, StatusCell, Trigger};
