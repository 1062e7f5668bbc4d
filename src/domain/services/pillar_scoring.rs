//! # Pillar Scoring
//!
//! Six independent scoring functions, one per [`Pillar`]. Each starts from a
//! pillar-specific base score, adds fixed increments for qualifying
//! conditions, and is capped at `1.0`.
//!
//! No pillar reads another pillar's output, so evaluation order is irrelevant.
//!
//! # Examples
//!
//! ```
//! use mm_monitor::domain::entities::market_maker::{ActivityHistory, MakerMetrics, MakerProfile};
//! use mm_monitor::domain::services::pillar_scoring::{PillarScorer, ScoringInput};
//! use mm_monitor::domain::value_objects::enums::MakerStatus;
//!
//! let profile = MakerProfile::new("Singapore", 2021, 25, ["DeFi", "Yield Farming"]);
//! let metrics = MakerMetrics {
//!     pairs: 277,
//!     spread: 19.3,
//!     volume_m: 1.05,
//!     inventory_m: 2.1,
//!     pnl_k: 45.2,
//!     uptime_pct: 99.8,
//!     latency_ms: 2.3,
//!     execution_speed_s: 1.8,
//!     success_rate_pct: 98.7,
//!     volume_capacity_m: 5.2,
//! };
//! let activity = ActivityHistory::new([true; 10]);
//! let input = ScoringInput::new(&profile, &metrics, MakerStatus::Active, &activity);
//!
//! let scores = PillarScorer::new(2025).score(&input);
//! assert!(scores.defi() > 0.99);
//! ```

use crate::domain::entities::market_maker::{ActivityHistory, MakerMetrics, MakerProfile};
use crate::domain::value_objects::enums::{MakerStatus, Pillar};

pub use crate::domain::value_objects::pillar_scores::PillarScores;

/// Jurisdictions that earn the reputation domicile bonus.
pub const TIER_ONE_JURISDICTIONS: [&str; 5] =
    ["Singapore", "New York", "London", "Amsterdam", "Monaco"];

/// Everything a pillar function may read about one market maker.
#[derive(Debug, Clone, Copy)]
pub struct ScoringInput<'a> {
    profile: &'a MakerProfile,
    metrics: &'a MakerMetrics,
    status: MakerStatus,
    activity: &'a ActivityHistory,
}

impl<'a> ScoringInput<'a> {
    /// Creates a scoring input.
    #[must_use]
    pub const fn new(
        profile: &'a MakerProfile,
        metrics: &'a MakerMetrics,
        status: MakerStatus,
        activity: &'a ActivityHistory,
    ) -> Self {
        Self {
            profile,
            metrics,
            status,
            activity,
        }
    }
}

/// Pillar scoring service.
///
/// `reference_year` is the year tenure is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PillarScorer {
    reference_year: i32,
}

impl PillarScorer {
    /// Creates a scorer measuring tenure against `reference_year`.
    #[must_use]
    pub const fn new(reference_year: i32) -> Self {
        Self { reference_year }
    }

    /// Reference year.
    #[inline]
    #[must_use]
    pub const fn reference_year(&self) -> i32 {
        self.reference_year
    }

    /// Scores all six pillars.
    #[must_use]
    pub fn score(&self, input: &ScoringInput<'_>) -> PillarScores {
        PillarScores::from_entries(Pillar::ALL.map(|p| (p, self.score_pillar(p, input))))
    }

    /// Scores one pillar.
    #[must_use]
    pub fn score_pillar(&self, pillar: Pillar, input: &ScoringInput<'_>) -> f64 {
        match pillar {
            Pillar::Reputation => self.reputation(input),
            Pillar::BalanceSheet => balance_sheet(input),
            Pillar::Communication => communication(input),
            Pillar::Pricing => pricing(input),
            Pillar::Technology => technology(input),
            Pillar::Defi => defi(input),
        }
    }

    /// Track record, domicile, volume and status.
    #[must_use]
    pub fn reputation(&self, input: &ScoringInput<'_>) -> f64 {
        let mut score = 0.5;

        let years_active = self.reference_year - input.profile.established();
        if years_active >= 5 {
            score += 0.3;
        } else if years_active >= 3 {
            score += 0.2;
        } else if years_active >= 1 {
            score += 0.1;
        }

        if TIER_ONE_JURISDICTIONS.contains(&input.profile.location()) {
            score += 0.2;
        }
        if input.metrics.volume_m > 3.0 {
            score += 0.1;
        }
        if input.status.is_active() {
            score += 0.1;
        }

        cap(score)
    }
}

/// Capital adequacy, liquidity reserves and risk controls.
#[must_use]
pub fn balance_sheet(input: &ScoringInput<'_>) -> f64 {
    let m = input.metrics;
    let mut score = 0.3;

    score += if m.volume_capacity_m >= 8.0 {
        0.4
    } else if m.volume_capacity_m >= 5.0 {
        0.3
    } else if m.volume_capacity_m >= 3.0 {
        0.2
    } else {
        0.1
    };

    if m.pnl_k > 50.0 && m.uptime_pct > 99.5 {
        score += 0.2;
    } else if m.pnl_k > 30.0 {
        score += 0.1;
    }

    score += success_rate_bonus(m.success_rate_pct);
    cap(score)
}

/// Incident reporting, stakeholder updates and responsiveness.
#[must_use]
pub fn communication(input: &ScoringInput<'_>) -> f64 {
    let m = input.metrics;
    let mut score = 0.4;

    if input.status == MakerStatus::Active && m.uptime_pct > 99.0 {
        score += 0.3;
    } else if input.status == MakerStatus::Warning {
        score += 0.1;
    }

    let active = input.activity.active_count();
    if active >= 8 {
        score += 0.2;
    } else if active >= 6 {
        score += 0.1;
    }

    if m.execution_speed_s <= 1.0 {
        score += 0.1;
    } else if m.execution_speed_s <= 2.0 {
        score += 0.05;
    }

    cap(score)
}

/// Spread fairness and value delivery. Lower spreads score higher.
#[must_use]
pub fn pricing(input: &ScoringInput<'_>) -> f64 {
    let m = input.metrics;
    let mut score = 0.5;

    if m.spread <= 20.0 {
        score += 0.2;
    } else if m.spread <= 25.0 {
        score += 0.1;
    }

    score += if m.spread <= 15.0 {
        0.2
    } else if m.spread <= 20.0 {
        0.15
    } else if m.spread <= 25.0 {
        0.1
    } else {
        0.05
    };

    score += success_rate_bonus(m.success_rate_pct);
    cap(score)
}

/// Uptime, execution speed and security posture.
#[must_use]
pub fn technology(input: &ScoringInput<'_>) -> f64 {
    let m = input.metrics;
    let mut score = 0.3;

    score += if m.uptime_pct >= 99.9 {
        0.4
    } else if m.uptime_pct >= 99.5 {
        0.3
    } else if m.uptime_pct >= 99.0 {
        0.2
    } else {
        0.1
    };

    score += if m.execution_speed_s <= 1.0 {
        0.2
    } else if m.execution_speed_s <= 1.5 {
        0.15
    } else if m.execution_speed_s <= 2.0 {
        0.1
    } else {
        0.05
    };

    if input.status.is_active() {
        score += 0.1;
    }

    cap(score)
}

/// On-chain liquidity, contract security and multi-chain coverage.
#[must_use]
pub fn defi(input: &ScoringInput<'_>) -> f64 {
    let mut score = 0.4;

    let pairs = input.metrics.pairs;
    if pairs >= 200 {
        score += 0.3;
    } else if pairs >= 150 {
        score += 0.2;
    } else if pairs >= 100 {
        score += 0.1;
    }

    let team = input.profile.team_size();
    if team >= 25 {
        score += 0.2;
    } else if team >= 15 {
        score += 0.1;
    }

    if input.profile.has_specialty("DeFi") || input.profile.has_specialty("Web3") {
        score += 0.1;
    }

    cap(score)
}

fn success_rate_bonus(success_rate_pct: f64) -> f64 {
    if success_rate_pct >= 99.0 {
        0.1
    } else if success_rate_pct >= 98.0 {
        0.05
    } else {
        0.0
    }
}

#[inline]
fn cap(score: f64) -> f64 {
    score.min(1.0)
}
