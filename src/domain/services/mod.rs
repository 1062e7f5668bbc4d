//! # Domain Services
//!
//! Stateless rating logic. Only [`rating_engine::RatingEngine`] holds state,
//! and only its random source.
//!
//! ## Services
//!
//! - [`metric_generator::MetricGenerator`]: per-tick variation around baselines
//! - [`pillar_scoring::PillarScorer`]: six pillar scores
//! - [`red_flags::RedFlagDetector`]: hard-failure conditions
//! - [`grade_classifier::GradeClassifier`]: composite score and letter grade
//! - [`rating_engine::RatingEngine`]: one full rating pass
//! - [`trade_activity::TradeSimulator`]: simulated trade-tape totals

pub mod grade_classifier;
pub mod metric_generator;
pub mod pillar_scoring;
pub mod rating_engine;
pub mod red_flags;
pub mod trade_activity;

pub use grade_classifier::{GradeClassifier, Rating};
pub use metric_generator::{
    MetricGenerator, MetricKind, RandomSource, SequenceRandom, StdRandomSource, VariationShape,
};
pub use pillar_scoring::{PillarScorer, ScoringInput};
pub use rating_engine::{RatingEngine, TickSample};
pub use red_flags::RedFlagDetector;
pub use trade_activity::{TradeActivity, TradeSimulator};
