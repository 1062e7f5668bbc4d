//! # Views
//!
//! The logical views the scheduler materializes, and the immutable snapshot
//! type it publishes.
//!
//! A [`ViewSnapshot`] is replaced wholesale on every refresh of its view and
//! never mutated afterwards. Readers may observe snapshots of different views
//! at different generations.

pub mod builders;

pub use builders::{
    AlertsView, ChartView, DistributionPoint, GradeCount, MetricsSummary, PillarDetail,
    PillarEntry, RankingEntry,
};

use crate::domain::entities::market_maker::RatedMarketMaker;
use crate::domain::services::trade_activity::TradeActivity;
use crate::domain::value_objects::enums::ParseEnumError;
use crate::domain::value_objects::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// One logical view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ViewKind {
    /// The full rated roster.
    MarketMakers = 0,
    /// Aggregate summary.
    Metrics = 1,
    /// Grade distribution with rolling history.
    Chart = 2,
    /// Top makers by composite score.
    Rankings = 3,
    /// Rotating single-maker pillar breakdown.
    PillarDetail = 4,
    /// Alert book.
    Alerts = 5,
    /// Simulated trade-tape totals.
    Trades = 6,
}

impl ViewKind {
    /// All views.
    pub const ALL: [Self; 7] = [
        Self::MarketMakers,
        Self::Metrics,
        Self::Chart,
        Self::Rankings,
        Self::PillarDetail,
        Self::Alerts,
        Self::Trades,
    ];

    /// Position in [`ViewKind::ALL`].
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MarketMakers => "market_makers",
            Self::Metrics => "metrics",
            Self::Chart => "chart",
            Self::Rankings => "rankings",
            Self::PillarDetail => "pillar_detail",
            Self::Alerts => "alerts",
            Self::Trades => "trades",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "market_makers" => Ok(Self::MarketMakers),
            "metrics" => Ok(Self::Metrics),
            "chart" => Ok(Self::Chart),
            "rankings" => Ok(Self::Rankings),
            "pillar_detail" => Ok(Self::PillarDetail),
            "alerts" => Ok(Self::Alerts),
            "trades" => Ok(Self::Trades),
            _ => Err(ParseEnumError::InvalidValue("ViewKind", s.to_string())),
        }
    }
}

/// Typed content of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ViewPayload {
    /// Rated roster.
    MarketMakers(Vec<RatedMarketMaker>),
    /// Summary.
    Metrics(MetricsSummary),
    /// Grade distribution.
    Chart(ChartView),
    /// Rankings.
    Rankings(Vec<RankingEntry>),
    /// Pillar detail.
    PillarDetail(PillarDetail),
    /// Alerts.
    Alerts(AlertsView),
    /// Trade totals.
    Trades(TradeActivity),
}

impl ViewPayload {
    /// The view this payload belongs to.
    #[must_use]
    pub const fn view(&self) -> ViewKind {
        match self {
            Self::MarketMakers(_) => ViewKind::MarketMakers,
            Self::Metrics(_) => ViewKind::Metrics,
            Self::Chart(_) => ViewKind::Chart,
            Self::Rankings(_) => ViewKind::Rankings,
            Self::PillarDetail(_) => ViewKind::PillarDetail,
            Self::Alerts(_) => ViewKind::Alerts,
            Self::Trades(_) => ViewKind::Trades,
        }
    }
}

/// Immutable point-in-time materialization of one view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSnapshot {
    view: ViewKind,
    generation: u64,
    generated_at: Timestamp,
    payload: ViewPayload,
}

impl ViewSnapshot {
    /// Creates a snapshot.
    #[must_use]
    pub fn new(generation: u64, generated_at: Timestamp, payload: ViewPayload) -> Self {
        Self {
            view: payload.view(),
            generation,
            generated_at,
            payload,
        }
    }

    /// View.
    #[inline]
    #[must_use]
    pub const fn view(&self) -> ViewKind {
        self.view
    }

    /// Per-view refresh counter, starting at 1.
    #[inline]
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Generation time.
    #[inline]
    #[must_use]
    pub const fn generated_at(&self) -> Timestamp {
        self.generated_at
    }

    /// Payload.
    #[inline]
    #[must_use]
    pub const fn payload(&self) -> &ViewPayload {
        &self.payload
    }
}

/// Result of reading a view.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotState {
    /// The latest snapshot.
    Available(Arc<ViewSnapshot>),
    /// The view has never been populated.
    Unavailable,
}

impl SnapshotState {
    /// Returns the snapshot, if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<&Arc<ViewSnapshot>> {
        match self {
            Self::Available(snapshot) => Some(snapshot),
            Self::Unavailable => None,
        }
    }

    /// Returns true if a snapshot exists.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}
