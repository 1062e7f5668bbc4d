//! # Value Objects
//!
//! Immutable types with domain semantics.
//!
//! ## Identity Types
//!
//! - [`AlertId`], [`SubscriptionId`]: UUID-based identifiers
//!
//! ## Domain Enums
//!
//! - [`MakerStatus`]: operational status of a market maker
//! - [`Grade`]: letter grade
//! - [`Pillar`]: scoring dimension
//! - [`AlertLevel`]: alert severity or generic level
//!
//! ## Rating Values
//!
//! - [`PillarScores`]: six clamped pillar scores
//! - [`RedFlag`]: hard-failure condition

pub mod enums;
pub mod ids;
pub mod pillar_scores;
pub mod red_flag;
pub mod timestamp;

pub use enums::{AlertLevel, Grade, MakerStatus, ParseEnumError, Pillar};
pub use ids::{AlertId, SubscriptionId};
pub use pillar_scores::PillarScores;
pub use red_flag::RedFlag;
pub use timestamp::Timestamp;
