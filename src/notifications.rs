//! User-facing notifications for tracker mutations.
//!
//! Services receive a `Notifier` at construction time instead of reaching for
//! a global dispatcher; whoever builds the service decides where events go.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    /// Display duration in milliseconds; 0 means sticky.
    pub duration_ms: u64,
}

impl Notification {
    pub fn created(entity: &str, details: Option<&str>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: format!("{} Created", entity),
            message: details
                .map(str::to_string)
                .unwrap_or_else(|| format!("{} has been successfully created.", entity)),
            duration_ms: 4000,
        }
    }

    pub fn updated(entity: &str, details: Option<&str>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: format!("{} Updated", entity),
            message: details
                .map(str::to_string)
                .unwrap_or_else(|| format!("{} has been successfully updated.", entity)),
            duration_ms: 4000,
        }
    }

    pub fn deleted(entity: &str, details: Option<&str>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: format!("{} Deleted", entity),
            message: details
                .map(str::to_string)
                .unwrap_or_else(|| format!("{} has been successfully deleted.", entity)),
            duration_ms: 4000,
        }
    }

    pub fn failed(action: &str, entity: &str, error: &str) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: format!("Failed to {} {}", action, entity),
            message: error.to_string(),
            duration_ms: 0,
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Drops every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _notification: Notification) {}
}

/// Fans notifications out to any number of subscribers.
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    sender: broadcast::Sender<Notification>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }
}

impl Notifier for BroadcastNotifier {
    fn notify(&self, notification: Notification) {
        // No subscribers is not an error.
        if self.sender.send(notification).is_err() {
            tracing::trace!("Notification dropped: no subscribers");
        }
    }
}

pub type SharedNotifier = Arc<dyn Notifier>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_messages() {
        let n = Notification::created("Problem", None);
        assert_eq!(n.kind, NotificationKind::Success);
        assert_eq!(n.title, "Problem Created");
        assert_eq!(n.message, "Problem has been successfully created.");

        let n = Notification::updated("Learning Item", Some("Progress saved"));
        assert_eq!(n.message, "Progress saved");

        let n = Notification::failed("Complete", "Revision", "already in progress");
        assert_eq!(n.kind, NotificationKind::Error);
        assert_eq!(n.title, "Failed to Complete Revision");
        assert_eq!(n.duration_ms, 0);
    }

    #[tokio::test]
    async fn test_broadcast_reaches_subscribers() {
        let notifier = BroadcastNotifier::new(8);
        let mut first = notifier.subscribe();
        let mut second = notifier.subscribe();

        notifier.notify(Notification::deleted("Roadmap", None));

        assert_eq!(first.recv().await.unwrap().title, "Roadmap Deleted");
        assert_eq!(second.recv().await.unwrap().title, "Roadmap Deleted");
    }

    #[test]
    fn test_broadcast_without_subscribers() {
        let notifier = BroadcastNotifier::new(1);
        notifier.notify(Notification::created("Problem", None));
    }
}
