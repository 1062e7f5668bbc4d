//! # Application Layer
//!
//! Orchestration around the pure rating services: view builders, the alert
//! book, the subscriber registry and the [`UpdateScheduler`](scheduler::UpdateScheduler)
//! that drives them on independent timers.

pub mod alert_book;
pub mod error;
pub mod scheduler;
pub mod subscribers;
pub mod views;

pub use error::{ApplicationError, ApplicationResult};
pub use scheduler::{SchedulerSettings, SchedulerStatus, UpdateScheduler};
pub use subscribers::{SnapshotCallback, SubscriberError, SubscriberRegistry};
