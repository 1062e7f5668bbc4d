//! # Subscriber Registry
//!
//! Observer registry for published snapshots.
//!
//! Every callback runs inside its own error boundary: an `Err` return or a
//! panic is logged and counted, and the remaining subscribers are still
//! notified.
//!
//! Callbacks run on the refreshing task while the view is locked. They must
//! be short and must not call the scheduler's lifecycle methods.
//!
//! # Examples
//!
//! ```
//! use mm_monitor::application::subscribers::SubscriberRegistry;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let registry = SubscriberRegistry::new();
//! let seen = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&seen);
//! let id = registry.subscribe(Arc::new(move |_snapshot| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//!     Ok(())
//! }));
//!
//! assert_eq!(registry.len(), 1);
//! assert!(registry.unsubscribe(id));
//! assert!(registry.is_empty());
//! ```

use crate::application::views::ViewSnapshot;
use crate::domain::value_objects::ids::SubscriptionId;
use parking_lot::RwLock;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use thiserror::Error;

/// Error returned by a subscriber callback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscriberError {
    /// The subscriber's downstream is gone.
    #[error("subscriber closed")]
    Closed,

    /// The subscriber refused the snapshot.
    #[error("subscriber rejected snapshot: {0}")]
    Rejected(String),
}

impl SubscriberError {
    /// Creates a rejected error.
    #[must_use]
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }
}

/// Callback invoked with every published snapshot.
pub type SnapshotCallback =
    Arc<dyn Fn(&Arc<ViewSnapshot>) -> Result<(), SubscriberError> + Send + Sync>;

/// Delivery counts of one notification round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotifyReport {
    /// Callbacks that returned `Ok`.
    pub delivered: usize,
    /// Callbacks that returned `Err` or panicked.
    pub failed: usize,
}

/// Registry of snapshot subscribers.
#[derive(Default)]
pub struct SubscriberRegistry {
    entries: RwLock<Vec<(SubscriptionId, SnapshotCallback)>>,
}

impl fmt::Debug for SubscriberRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberRegistry")
            .field("subscribers", &self.len())
            .finish()
    }
}

impl SubscriberRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback and returns its handle.
    pub fn subscribe(&self, callback: SnapshotCallback) -> SubscriptionId {
        let id = SubscriptionId::new_v4();
        self.entries.write().push((id, callback));
        tracing::debug!(subscriber_id = %id, "subscriber registered");
        id
    }

    /// Removes a callback. Returns false if the handle is unknown.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        let removed = entries.len() != before;
        if removed {
            tracing::debug!(subscriber_id = %id, "subscriber removed");
        }
        removed
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nobody is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Delivers `snapshot` to every subscriber registered at call time.
    pub fn notify(&self, snapshot: &Arc<ViewSnapshot>) -> NotifyReport {
        // Callbacks may subscribe or unsubscribe; never hold the lock across them.
        let entries: Vec<(SubscriptionId, SnapshotCallback)> = self.entries.read().clone();
        let mut report = NotifyReport::default();

        for (id, callback) in entries {
            match catch_unwind(AssertUnwindSafe(|| callback(snapshot))) {
                Ok(Ok(())) => report.delivered += 1,
                Ok(Err(e)) => {
                    report.failed += 1;
                    tracing::warn!(
                        subscriber_id = %id,
                        view = %snapshot.view(),
                        generation = snapshot.generation(),
                        error = %e,
                        "subscriber callback failed"
                    );
                }
                Err(_) => {
                    report.failed += 1;
                    tracing::warn!(
                        subscriber_id = %id,
                        view = %snapshot.view(),
                        generation = snapshot.generation(),
                        "subscriber callback panicked"
                    );
                }
            }
        }

        report
    }
}
