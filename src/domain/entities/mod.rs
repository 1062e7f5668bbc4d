//! # Domain Entities
//!
//! - [`market_maker`]: baselines, profiles, metrics and per-tick ratings
//! - [`alert`]: red-flag and system alerts

pub mod alert;
pub mod market_maker;

pub use alert::Alert;
pub use market_maker::{
    ActivityHistory, MakerMetrics, MakerProfile, MarketMakerBaseline, RatedMarketMaker,
};
