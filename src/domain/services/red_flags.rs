//! # Red-Flag Detection
//!
//! Evaluates hard-failure conditions on a market maker's metrics. Every check
//! runs; a match never short-circuits the remaining checks.

use crate::domain::entities::market_maker::MakerMetrics;

pub use crate::domain::value_objects::red_flag::RedFlag;

/// PnL below this raises [`RedFlag::BalanceSheetInsolvency`].
pub const INSOLVENCY_PNL_K: f64 = 0.0;
/// Uptime below this raises [`RedFlag::CommunicationBlackout`].
pub const BLACKOUT_UPTIME_PCT: f64 = 95.0;
/// Execution speed above this raises [`RedFlag::TechnologyFailure`].
pub const FAILURE_EXECUTION_SPEED_S: f64 = 5.0;
/// Success rate below this raises [`RedFlag::PoorPerformance`].
pub const POOR_SUCCESS_RATE_PCT: f64 = 90.0;

/// Red-flag detector.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedFlagDetector;

impl RedFlagDetector {
    /// Returns every flag whose condition holds, in [`RedFlag::ALL`] order.
    ///
    /// # Examples
    ///
    /// ```
    /// use mm_monitor::domain::entities::market_maker::MakerMetrics;
    /// use mm_monitor::domain::services::red_flags::{RedFlag, RedFlagDetector};
    ///
    /// let metrics = MakerMetrics {
    ///     pairs: 100,
    ///     spread: 15.0,
    ///     volume_m: 4.0,
    ///     inventory_m: 2.0,
    ///     pnl_k: -5.0,
    ///     uptime_pct: 99.9,
    ///     latency_ms: 1.0,
    ///     execution_speed_s: 0.5,
    ///     success_rate_pct: 99.0,
    ///     volume_capacity_m: 10.0,
    /// };
    /// assert_eq!(RedFlagDetector::detect(&metrics), vec![RedFlag::BalanceSheetInsolvency]);
    /// ```
    #[must_use]
    pub fn detect(metrics: &MakerMetrics) -> Vec<RedFlag> {
        RedFlag::ALL
            .into_iter()
            .filter(|flag| Self::holds(*flag, metrics))
            .collect()
    }

    /// Returns true if the condition for `flag` holds.
    #[must_use]
    pub fn holds(flag: RedFlag, metrics: &MakerMetrics) -> bool {
        match flag {
            RedFlag::BalanceSheetInsolvency => metrics.pnl_k < INSOLVENCY_PNL_K,
            RedFlag::CommunicationBlackout => metrics.uptime_pct < BLACKOUT_UPTIME_PCT,
            RedFlag::TechnologyFailure => metrics.execution_speed_s > FAILURE_EXECUTION_SPEED_S,
            RedFlag::PoorPerformance => metrics.success_rate_pct < POOR_SUCCESS_RATE_PCT,
        }
    }
}
