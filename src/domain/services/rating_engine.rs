//! # Rating Engine
//!
//! Composes the domain services into one rating pass:
//!
//! ```text
//! baseline -> MetricGenerator -> TickSample
//!          -> PillarScorer + RedFlagDetector -> GradeClassifier -> RatedMarketMaker
//! ```
//!
//! Generation is the only step that consumes randomness. Everything after
//! [`RatingEngine::sample`] is a pure function of the sample, which
//! [`RatingEngine::assess`] exposes directly.
//!
//! # Examples
//!
//! ```
//! use mm_monitor::domain::services::metric_generator::SequenceRandom;
//! use mm_monitor::domain::services::rating_engine::RatingEngine;
//! use mm_monitor::infrastructure::roster::base_roster;
//!
//! let mut engine = RatingEngine::new(2025, Box::new(SequenceRandom::constant(0.5)));
//! let rated = engine.rate_all(&base_roster());
//!
//! assert_eq!(rated.len(), 15);
//! assert!(rated.iter().all(|m| m.composite_score() <= 100));
//! ```

use crate::domain::entities::market_maker::{
    ACTIVITY_SLOTS, ActivityHistory, MakerMetrics, MarketMakerBaseline, RatedMarketMaker,
};
use crate::domain::services::grade_classifier::GradeClassifier;
use crate::domain::services::metric_generator::{
    MetricGenerator, MetricKind, RandomSource, round_to,
};
use crate::domain::services::pillar_scoring::{PillarScorer, ScoringInput};
use crate::domain::services::red_flags::RedFlagDetector;
use crate::domain::services::trade_activity::{TradeActivity, TradeSimulator, market_intensity};
use crate::domain::value_objects::enums::MakerStatus;
use crate::domain::value_objects::timestamp::Timestamp;

/// Volatility of the best-spread-today draw.
pub const BEST_SPREAD_VOLATILITY: f64 = 0.02;
/// Probability that an activity slot is active.
pub const ACTIVITY_PROBABILITY: f64 = 0.7;
/// Probability of a status flip per tick.
pub const STATUS_FLIP_PROBABILITY: f64 = 0.02;
/// Range of the last-trade age in seconds.
pub const LAST_TRADE_SECS: (u32, u32) = (1, 10);

/// Per-tick generated values for one market maker, before scoring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSample {
    /// Generated metrics, rounded to display precision.
    pub metrics: MakerMetrics,
    /// Best spread seen today.
    pub best_spread_today: f64,
    /// Seconds since last trade.
    pub last_trade_secs: u32,
    /// Activity history.
    pub activity: ActivityHistory,
    /// Status for this tick.
    pub status: MakerStatus,
}

/// Rating engine.
///
/// Owns the random source so consecutive passes draw fresh variation.
#[derive(Debug)]
pub struct RatingEngine {
    scorer: PillarScorer,
    rng: Box<dyn RandomSource>,
}

impl RatingEngine {
    /// Creates an engine measuring tenure against `reference_year`.
    #[must_use]
    pub fn new(reference_year: i32, rng: Box<dyn RandomSource>) -> Self {
        Self {
            scorer: PillarScorer::new(reference_year),
            rng,
        }
    }

    /// Rates every baseline, preserving order.
    #[must_use]
    pub fn rate_all(&mut self, baselines: &[MarketMakerBaseline]) -> Vec<RatedMarketMaker> {
        let now = Timestamp::now();
        baselines
            .iter()
            .map(|baseline| {
                let sample = self.sample(baseline);
                self.assess(baseline, &sample, now)
            })
            .collect()
    }

    /// Draws one tick of trade totals, scaled by the activity of `makers`.
    #[must_use]
    pub fn simulate_trades(&mut self, makers: &[RatedMarketMaker]) -> TradeActivity {
        TradeSimulator::simulate(market_intensity(makers), self.rng.as_mut())
    }

    /// Draws one tick of generated values around `baseline`.
    pub fn sample(&mut self, baseline: &MarketMakerBaseline) -> TickSample {
        let base = baseline.metrics();
        let rng = self.rng.as_mut();
        let mut gen_at = |value: f64, kind: MetricKind, decimals: i32| {
            round_to(MetricGenerator::generate_default(value, kind, rng), decimals)
        };

        let pairs = gen_at(f64::from(base.pairs), MetricKind::Pairs, 0);
        let metrics = MakerMetrics {
            pairs: pairs.max(0.0) as u32,
            spread: gen_at(base.spread, MetricKind::Spread, 1),
            volume_m: gen_at(base.volume_m, MetricKind::Volume, 2),
            inventory_m: gen_at(base.inventory_m, MetricKind::Inventory, 1),
            pnl_k: gen_at(base.pnl_k, MetricKind::Pnl, 1),
            uptime_pct: gen_at(base.uptime_pct, MetricKind::Uptime, 1),
            latency_ms: gen_at(base.latency_ms, MetricKind::Latency, 1),
            execution_speed_s: gen_at(base.execution_speed_s, MetricKind::ExecutionSpeed, 1),
            success_rate_pct: gen_at(base.success_rate_pct, MetricKind::SuccessRate, 1),
            volume_capacity_m: gen_at(base.volume_capacity_m, MetricKind::VolumeCapacity, 1),
        };
        let best_spread_today = round_to(
            MetricGenerator::generate(base.spread, MetricKind::Spread, BEST_SPREAD_VOLATILITY, rng),
            1,
        );

        let mut slots = [false; ACTIVITY_SLOTS];
        for slot in &mut slots {
            *slot = rng.chance(ACTIVITY_PROBABILITY);
        }
        let last_trade_secs = rng.int_inclusive(LAST_TRADE_SECS.0, LAST_TRADE_SECS.1);
        let status = if rng.chance(STATUS_FLIP_PROBABILITY) {
            baseline.status().flipped()
        } else {
            baseline.status()
        };

        TickSample {
            metrics,
            best_spread_today,
            last_trade_secs,
            activity: ActivityHistory::new(slots),
            status,
        }
    }

    /// Scores, flags and classifies a sample. Pure.
    #[must_use]
    pub fn assess(
        &self,
        baseline: &MarketMakerBaseline,
        sample: &TickSample,
        rated_at: Timestamp,
    ) -> RatedMarketMaker {
        let input = ScoringInput::new(
            baseline.profile(),
            &sample.metrics,
            sample.status,
            &sample.activity,
        );
        let pillar_scores = self.scorer.score(&input);
        let red_flags = RedFlagDetector::detect(&sample.metrics);
        let rating = GradeClassifier::classify(&pillar_scores, &red_flags);

        RatedMarketMaker {
            name: baseline.name().to_string(),
            profile: baseline.profile().clone(),
            metrics: sample.metrics,
            best_spread_today: sample.best_spread_today,
            last_trade_secs: sample.last_trade_secs,
            activity: sample.activity,
            status: sample.status,
            pillar_scores,
            red_flags,
            composite_score: rating.composite_score(),
            grade: rating.grade(),
            rated_at,
        }
    }
}
