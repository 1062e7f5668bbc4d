//! # Trade Activity
//!
//! Simulated trade-tape totals for the trades view.
//!
//! Each figure varies around a fixed base count. The bases are scaled by the
//! market intensity, which is read off the rated roster's recent activity:
//! a roster with every activity slot set trades more than an idle one.
//!
//! | Figure | Base | Volatility |
//! |--------|------|------------|
//! | total trades | 1556 | 0.10 |
//! | bids | 2652 | 0.08 |
//! | asks | 3649 | 0.08 |
//! | volume | 33433 | 0.05 |
//!
//! # Examples
//!
//! ```
//! use mm_monitor::domain::services::metric_generator::SequenceRandom;
//! use mm_monitor::domain::services::trade_activity::TradeSimulator;
//!
//! let mut rng = SequenceRandom::constant(0.5);
//! let activity = TradeSimulator::simulate(1.0, &mut rng);
//! assert_eq!(activity.total_trades, 1556);
//! assert_eq!(activity.volume, 33433);
//! ```

use crate::domain::entities::market_maker::{ACTIVITY_SLOTS, RatedMarketMaker};
use crate::domain::services::metric_generator::{MetricGenerator, MetricKind, RandomSource};
use serde::{Deserialize, Serialize};

/// Base trade count.
pub const BASE_TOTAL_TRADES: f64 = 1556.0;
/// Base bid count.
pub const BASE_BIDS: f64 = 2652.0;
/// Base ask count.
pub const BASE_ASKS: f64 = 3649.0;
/// Base traded volume.
pub const BASE_VOLUME: f64 = 33433.0;

/// Share of the intensity deviation passed on to the trade figures.
const INTENSITY_DAMPING: f64 = 0.3;

/// Trade totals for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeActivity {
    /// Trades executed.
    pub total_trades: u64,
    /// Bid-side orders.
    pub bids: u64,
    /// Ask-side orders.
    pub asks: u64,
    /// Traded volume.
    pub volume: u64,
}

/// Market intensity in `[0.5, 1.5]`: `0.5` plus the share of set activity
/// slots across the roster. An empty roster is neutral (`1.0`).
#[must_use]
pub fn market_intensity(makers: &[RatedMarketMaker]) -> f64 {
    let slots = makers.len() * ACTIVITY_SLOTS;
    if slots == 0 {
        return 1.0;
    }
    let active: usize = makers.iter().map(|m| m.activity().active_count()).sum();
    0.5 + active as f64 / slots as f64
}

/// Stateless trade-tape simulator.
#[derive(Debug, Clone, Copy, Default)]
pub struct TradeSimulator;

impl TradeSimulator {
    /// Draws one tick of trade totals at `intensity`.
    #[must_use]
    pub fn simulate(intensity: f64, rng: &mut dyn RandomSource) -> TradeActivity {
        let multiplier = 1.0 + (intensity - 1.0) * INTENSITY_DAMPING;
        let mut draw = |base: f64, volatility: f64| {
            let value = MetricGenerator::generate(base * multiplier, MetricKind::Trades, volatility, rng);
            value.round().max(0.0) as u64
        };
        TradeActivity {
            total_trades: draw(BASE_TOTAL_TRADES, 0.1),
            bids: draw(BASE_BIDS, 0.08),
            asks: draw(BASE_ASKS, 0.08),
            volume: draw(BASE_VOLUME, 0.05),
        }
    }
}
