//! # Broadcast Sink
//!
//! Bridges the scheduler's subscriber registry to a
//! `tokio::sync::broadcast` channel so any number of network clients can
//! follow published snapshots.
//!
//! Sending never blocks the refresh. Slow receivers lag and skip snapshots
//! instead of holding the scheduler back.
//!
//! # Examples
//!
//! ```
//! use mm_monitor::infrastructure::broadcast_sink::BroadcastSink;
//!
//! let sink = BroadcastSink::new(16);
//! let _rx = sink.subscribe();
//! assert_eq!(sink.receiver_count(), 1);
//! ```

use crate::application::scheduler::UpdateScheduler;
use crate::application::views::ViewSnapshot;
use crate::domain::value_objects::ids::SubscriptionId;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

/// Default channel capacity.
pub const DEFAULT_CAPACITY: usize = 256;

/// Fan-out of published snapshots.
#[derive(Debug, Clone)]
pub struct BroadcastSink {
    tx: broadcast::Sender<Arc<ViewSnapshot>>,
}

impl Default for BroadcastSink {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl BroadcastSink {
    /// Creates a sink buffering up to `capacity` snapshots per receiver.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Registers the sink with `scheduler`.
    pub fn attach(&self, scheduler: &UpdateScheduler) -> SubscriptionId {
        let tx = self.tx.clone();
        scheduler.subscribe(Arc::new(move |snapshot| {
            // No receivers is not a failure.
            if let Ok(receivers) = tx.send(Arc::clone(snapshot)) {
                tracing::trace!(view = %snapshot.view(), receivers, "snapshot broadcast");
            }
            Ok(())
        }))
    }

    /// New receiver for snapshots published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<ViewSnapshot>> {
        self.tx.subscribe()
    }

    /// New receiver wrapped as a `Stream`.
    #[must_use]
    pub fn stream(&self) -> BroadcastStream<Arc<ViewSnapshot>> {
        BroadcastStream::new(self.tx.subscribe())
    }

    /// Number of live receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
