pub mod logging;

pub mod api;
pub mod config;
pub mod database;
pub mod date_utils;
pub mod errors;
pub mod models;
pub mod notifications;
pub mod revision_scheduler;
pub mod tracker_service;

pub use config::Config;
pub use database::Database;
pub use errors::*;
pub use models::*;
pub use notifications::{BroadcastNotifier, NoopNotifier, Notification, NotificationKind, Notifier, SharedNotifier};
pub use revision_scheduler::{RevisionScheduler, RevisionSource, SchedulerError, REVISION_INTERVALS};
pub use tracker_service::{TrackerError, TrackerService};
