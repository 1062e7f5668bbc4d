//! # Market Maker Entity
//!
//! Baseline records and the rated per-tick materialization of a market maker.
//!
//! A [`MarketMakerBaseline`] is defined once per process from the roster and
//! never changes. Each tick the rating engine derives a fresh
//! [`RatedMarketMaker`] from it.
//!
//! # Examples
//!
//! ```
//! use mm_monitor::domain::entities::market_maker::{MakerMetrics, MakerProfile, MarketMakerBaseline};
//! use mm_monitor::domain::value_objects::enums::MakerStatus;
//!
//! let baseline = MarketMakerBaseline::new(
//!     "Astro",
//!     MakerMetrics {
//!         pairs: 76,
//!         spread: 20.5,
//!         volume_m: 3.21,
//!         inventory_m: 2.8,
//!         pnl_k: 67.3,
//!         uptime_pct: 99.9,
//!         latency_ms: 1.5,
//!         execution_speed_s: 0.7,
//!         success_rate_pct: 99.2,
//!         volume_capacity_m: 4.2,
//!     },
//!     MakerStatus::Active,
//!     MakerProfile::new("San Francisco", 2021, 20, ["AI Trading", "Machine Learning"]),
//! );
//! assert!(baseline.validate().is_ok());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::enums::{Grade, MakerStatus};
use crate::domain::value_objects::pillar_scores::PillarScores;
use crate::domain::value_objects::red_flag::RedFlag;
use crate::domain::value_objects::timestamp::Timestamp;
use serde::{Deserialize, Serialize};

/// Number of periods tracked in the activity history.
pub const ACTIVITY_SLOTS: usize = 10;

/// Static profile of a market maker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MakerProfile {
    location: String,
    established: i32,
    team_size: u32,
    specialties: Vec<String>,
    description: String,
}

impl MakerProfile {
    /// Creates a profile with an empty description.
    #[must_use]
    pub fn new<S, I>(location: impl Into<String>, established: i32, team_size: u32, specialties: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        Self {
            location: location.into(),
            established,
            team_size,
            specialties: specialties.into_iter().map(Into::into).collect(),
            description: String::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Domicile city.
    #[inline]
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Founding year.
    #[inline]
    #[must_use]
    pub const fn established(&self) -> i32 {
        self.established
    }

    /// Head count.
    #[inline]
    #[must_use]
    pub const fn team_size(&self) -> u32 {
        self.team_size
    }

    /// Specialty tags.
    #[inline]
    #[must_use]
    pub fn specialties(&self) -> &[String] {
        &self.specialties
    }

    /// Free-form description.
    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns true if any specialty tag equals `tag` exactly.
    #[must_use]
    pub fn has_specialty(&self, tag: &str) -> bool {
        self.specialties.iter().any(|s| s == tag)
    }
}

/// Raw metrics of a market maker.
///
/// Units: spread in basis points, volume, inventory and capacity in millions,
/// pnl in thousands, uptime and success rate in percent, latency in
/// milliseconds and execution speed in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MakerMetrics {
    /// Number of quoted pairs.
    pub pairs: u32,
    /// Average spread.
    pub spread: f64,
    /// Traded volume.
    pub volume_m: f64,
    /// Inventory held.
    pub inventory_m: f64,
    /// Profit and loss.
    pub pnl_k: f64,
    /// Uptime percentage.
    pub uptime_pct: f64,
    /// Quote latency.
    pub latency_ms: f64,
    /// Execution speed.
    pub execution_speed_s: f64,
    /// Success rate percentage.
    pub success_rate_pct: f64,
    /// Volume capacity.
    pub volume_capacity_m: f64,
}

/// Immutable reference record of one market maker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketMakerBaseline {
    name: String,
    metrics: MakerMetrics,
    status: MakerStatus,
    profile: MakerProfile,
}

impl MarketMakerBaseline {
    /// Creates a baseline.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        metrics: MakerMetrics,
        status: MakerStatus,
        profile: MakerProfile,
    ) -> Self {
        Self {
            name: name.into(),
            metrics,
            status,
            profile,
        }
    }

    /// Checks that the record is usable for rating.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidBaseline`] for an empty name, a
    /// non-finite metric, or a percentage outside `[0, 100]`.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::invalid_baseline(&self.name, "name is empty"));
        }
        let m = &self.metrics;
        let values = [
            ("spread", m.spread),
            ("volume", m.volume_m),
            ("inventory", m.inventory_m),
            ("pnl", m.pnl_k),
            ("uptime", m.uptime_pct),
            ("latency", m.latency_ms),
            ("execution speed", m.execution_speed_s),
            ("success rate", m.success_rate_pct),
            ("volume capacity", m.volume_capacity_m),
        ];
        if let Some((field, _)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(DomainError::invalid_baseline(
                &self.name,
                format!("{field} is not finite"),
            ));
        }
        for (field, value) in [("uptime", m.uptime_pct), ("success rate", m.success_rate_pct)] {
            if !(0.0..=100.0).contains(&value) {
                return Err(DomainError::invalid_baseline(
                    &self.name,
                    format!("{field} {value} outside 0..=100"),
                ));
            }
        }
        Ok(())
    }

    /// Unique name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Baseline metrics.
    #[inline]
    #[must_use]
    pub const fn metrics(&self) -> &MakerMetrics {
        &self.metrics
    }

    /// Baseline status.
    #[inline]
    #[must_use]
    pub const fn status(&self) -> MakerStatus {
        self.status
    }

    /// Profile.
    #[inline]
    #[must_use]
    pub const fn profile(&self) -> &MakerProfile {
        &self.profile
    }
}

/// Fixed-length record of whether the maker was active in recent periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityHistory([bool; ACTIVITY_SLOTS]);

impl ActivityHistory {
    /// Creates a history from slots, oldest first.
    #[must_use]
    pub const fn new(slots: [bool; ACTIVITY_SLOTS]) -> Self {
        Self(slots)
    }

    /// Number of active periods.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.0.iter().filter(|active| **active).count()
    }

    /// The slots, oldest first.
    #[inline]
    #[must_use]
    pub const fn slots(&self) -> &[bool; ACTIVITY_SLOTS] {
        &self.0
    }
}

/// One rating pass over a market maker.
///
/// Every derived attribute is recomputed per tick. The struct is immutable
/// once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatedMarketMaker {
    pub(crate) name: String,
    pub(crate) profile: MakerProfile,
    pub(crate) metrics: MakerMetrics,
    pub(crate) best_spread_today: f64,
    pub(crate) last_trade_secs: u32,
    pub(crate) activity: ActivityHistory,
    pub(crate) status: MakerStatus,
    pub(crate) pillar_scores: PillarScores,
    pub(crate) red_flags: Vec<RedFlag>,
    pub(crate) composite_score: u8,
    pub(crate) grade: Grade,
    pub(crate) rated_at: Timestamp,
}

impl RatedMarketMaker {
    /// Name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Profile.
    #[inline]
    #[must_use]
    pub const fn profile(&self) -> &MakerProfile {
        &self.profile
    }

    /// Metrics generated for this tick.
    #[inline]
    #[must_use]
    pub const fn metrics(&self) -> &MakerMetrics {
        &self.metrics
    }

    /// Best spread seen today.
    #[inline]
    #[must_use]
    pub const fn best_spread_today(&self) -> f64 {
        self.best_spread_today
    }

    /// Seconds since the last trade.
    #[inline]
    #[must_use]
    pub const fn last_trade_secs(&self) -> u32 {
        self.last_trade_secs
    }

    /// Activity history.
    #[inline]
    #[must_use]
    pub const fn activity(&self) -> &ActivityHistory {
        &self.activity
    }

    /// Operational status for this tick.
    #[inline]
    #[must_use]
    pub const fn status(&self) -> MakerStatus {
        self.status
    }

    /// Pillar scores.
    #[inline]
    #[must_use]
    pub const fn pillar_scores(&self) -> &PillarScores {
        &self.pillar_scores
    }

    /// Red flags in evaluation order, possibly empty.
    #[inline]
    #[must_use]
    pub fn red_flags(&self) -> &[RedFlag] {
        &self.red_flags
    }

    /// Composite score in `0..=100`.
    #[inline]
    #[must_use]
    pub const fn composite_score(&self) -> u8 {
        self.composite_score
    }

    /// Letter grade.
    #[inline]
    #[must_use]
    pub const fn grade(&self) -> Grade {
        self.grade
    }

    /// When the rating was computed.
    #[inline]
    #[must_use]
    pub const fn rated_at(&self) -> Timestamp {
        self.rated_at
    }

    /// First specialty tag, if any.
    #[must_use]
    pub fn primary_specialty(&self) -> Option<&str> {
        self.profile.specialties().first().map(String::as_str)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn metrics() -> MakerMetrics {
        MakerMetrics {
            pairs: 100,
            spread: 20.0,
            volume_m: 2.0,
            inventory_m: 1.0,
            pnl_k: 30.0,
            uptime_pct: 99.0,
            latency_ms: 2.0,
            execution_speed_s: 1.0,
            success_rate_pct: 98.0,
            volume_capacity_m: 4.0,
        }
    }

    fn profile() -> MakerProfile {
        MakerProfile::new("London", 2019, 32, ["Institutional Trading", "Compliance"])
    }

    mod baseline {
        use super::*;

        #[test]
        fn valid_baseline_passes() {
            let b = MarketMakerBaseline::new("Arken", metrics(), MakerStatus::Warning, profile());
            assert!(b.validate().is_ok());
        }

        #[test]
        fn empty_name_rejected() {
            let b = MarketMakerBaseline::new("  ", metrics(), MakerStatus::Active, profile());
            assert!(matches!(b.validate(), Err(DomainError::InvalidBaseline { .. })));
        }

        #[test]
        fn non_finite_metric_rejected() {
            let mut m = metrics();
            m.pnl_k = f64::NAN;
            let b = MarketMakerBaseline::new("Arken", m, MakerStatus::Active, profile());
            let err = b.validate().unwrap_err();
            assert!(err.to_string().contains("pnl"));
        }

        #[test]
        fn uptime_above_hundred_rejected() {
            let mut m = metrics();
            m.uptime_pct = 100.5;
            let b = MarketMakerBaseline::new("Arken", m, MakerStatus::Active, profile());
            assert!(b.validate().is_err());
        }
    }

    mod profile {
        use super::*;

        #[test]
        fn specialty_match_is_exact() {
            let p = MakerProfile::new("Berlin", 2020, 26, ["Digital Assets", "Web3"]);
            assert!(p.has_specialty("Web3"));
            assert!(!p.has_specialty("Web"));
            assert!(!p.has_specialty("DeFi"));
        }
    }

    mod activity {
        use super::*;

        #[test]
        fn counts_active_slots() {
            let history = ActivityHistory::new([
                true, false, true, true, false, true, true, true, false, true,
            ]);
            assert_eq!(history.active_count(), 7);
            assert_eq!(ActivityHistory::default().active_count(), 0);
        }
    }
}
