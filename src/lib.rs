//! # mm-monitor
//!
//! Market maker monitoring backend.
//!
//! The crate rates a roster of market makers with a six-pillar scoring
//! framework (Reputation, Balance Sheet, Communication, Pricing, Technology,
//! DeFi Integration), overrides the composite grade with red-flag rules, and
//! republishes the derived views on independent timers to any number of
//! subscribers.
//!
//! # Layers
//!
//! - [`domain`]: value objects, entities and the pure rating services
//! - [`application`]: view builders, alert book, subscriber registry and the
//!   [`UpdateScheduler`](application::scheduler::UpdateScheduler)
//! - [`infrastructure`]: data-source port, simulated roster source and the
//!   broadcast sink used by the WebSocket stream
//! - [`api`]: thin REST/WebSocket surface over the scheduler
//!
//! # Data Flow
//!
//! ```text
//! MetricsSource -> MetricGenerator -> PillarScorer + RedFlagDetector
//!               -> GradeClassifier -> RatedMarketMaker -> view builders
//!               -> UpdateScheduler -> SubscriberRegistry -> sinks
//! ```
//!
//! # Examples
//!
//! ```
//! use mm_monitor::domain::services::grade_classifier::GradeClassifier;
//! use mm_monitor::domain::services::pillar_scoring::PillarScores;
//! use mm_monitor::domain::value_objects::enums::Grade;
//!
//! let scores = PillarScores::new(0.96, 0.92, 0.85, 0.82, 0.93, 0.81);
//! let rating = GradeClassifier::classify(&scores, &[]);
//!
//! assert_eq!(rating.composite_score(), 88);
//! assert_eq!(rating.grade(), Grade::B);
//! ```

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod telemetry;
