//! Outbound indexing notifications
//!
//! After the first successful detail fetch of an entity, the owning
//! collection emits one [`IndexingEvent`] so an external indexing system can
//! pick the entity up. Delivery is at-most-once per entity per process and
//! fully decoupled from the read path: a full or closed channel is logged
//! and forgotten, never retried, and never affects the caller's result.

use crate::data::ResourceKind;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Default capacity of the event channel
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Notification that an entity has been fully fetched for the first time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexingEvent {
    /// Canonical resource identifier
    pub id: String,
    /// Resolved browsing path at emit time
    pub path: String,
    /// Resource kind
    pub kind: ResourceKind,
}

/// At-most-once emitter for [`IndexingEvent`]s
#[derive(Clone)]
pub struct IndexingNotifier {
    tx: mpsc::Sender<IndexingEvent>,
    seen: Arc<Mutex<HashSet<String>>>,
}

impl IndexingNotifier {
    /// Creates a notifier and the receiving end of its channel
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<IndexingEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (
            Self {
                tx,
                seen: Arc::new(Mutex::new(HashSet::new())),
            },
            rx,
        )
    }

    /// Emits an event unless one was already emitted for this id
    ///
    /// Uses `try_send`: a full or closed channel drops the event with a
    /// `warn!`, and the id still counts as emitted so it is never retried.
    pub fn notify(&self, event: IndexingEvent) {
        {
            let mut seen = self.seen.lock().unwrap();
            if !seen.insert(event.id.clone()) {
                return;
            }
        }

        debug!(id = %event.id, kind = %event.kind, "Emitting indexing event");
        if let Err(e) = self.tx.try_send(event) {
            warn!("Failed to deliver indexing event: {}", e);
        }
    }
}

impl std::fmt::Debug for IndexingNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexingNotifier").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str) -> IndexingEvent {
        IndexingEvent {
            id: id.to_string(),
            path: format!("/persons/{}", id),
            kind: ResourceKind::Person,
        }
    }

    #[tokio::test]
    async fn test_event_is_emitted_once_per_id() {
        let (notifier, mut rx) = IndexingNotifier::channel(8);

        notifier.notify(event("pid-976"));
        notifier.notify(event("pid-976"));
        notifier.notify(event("pid-72102"));

        assert_eq!(rx.recv().await.unwrap().id, "pid-976");
        assert_eq!(rx.recv().await.unwrap().id, "pid-72102");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_closed_channel_does_not_panic() {
        let (notifier, rx) = IndexingNotifier::channel(1);
        drop(rx);

        // Logged and dropped, the caller never observes a failure
        notifier.notify(event("pid-1"));
    }
}
