//! # Infrastructure Layer
//!
//! Adapters at the edges of the core: the metrics data-source port with its
//! simulated roster implementation, and the broadcast sink feeding network
//! clients.

pub mod broadcast_sink;
pub mod data_source;
pub mod roster;

pub use broadcast_sink::BroadcastSink;
pub use data_source::{MetricsSource, SourceError, SourceResult};
pub use roster::{SimulatedMetricsSource, base_roster};
