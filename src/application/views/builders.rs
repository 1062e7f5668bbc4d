//! View builders.
//!
//! Pure functions from a rated roster to a view payload, plus the two small
//! pieces of per-view state the scheduler carries between ticks: the chart
//! history and the pillar-detail rotation.

use crate::application::alert_book::AlertStats;
use crate::domain::entities::alert::Alert;
use crate::domain::entities::market_maker::RatedMarketMaker;
use crate::domain::services::metric_generator::round_to;
use crate::domain::value_objects::enums::{Grade, MakerStatus, Pillar};
use crate::domain::value_objects::red_flag::RedFlag;
use crate::domain::value_objects::timestamp::Timestamp;
use serde::Serialize;
use std::collections::VecDeque;

/// Aggregate summary of one rating pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSummary {
    /// Number of rated makers.
    pub total_makers: usize,
    /// Makers with status active.
    pub active: usize,
    /// Makers with status warning.
    pub warning: usize,
    /// Makers with at least one red flag.
    pub flagged: usize,
    /// Sum of traded volume, in millions.
    pub total_volume_m: f64,
    /// Mean spread.
    pub average_spread: f64,
    /// Sum of quoted pairs.
    pub total_pairs: u64,
    /// Mean uptime.
    pub average_uptime_pct: f64,
    /// Mean latency.
    pub average_latency_ms: f64,
    /// Mean composite score.
    pub average_score: f64,
    /// True while the data source is failing and last-known data is served.
    pub degraded: bool,
}

/// Count of makers holding one grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GradeCount {
    /// Grade.
    pub grade: Grade,
    /// Makers at that grade.
    pub count: usize,
}

/// One point of the rolling distribution history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionPoint {
    /// When the point was taken.
    pub at: Timestamp,
    /// Mean composite score at that time.
    pub average_score: f64,
    /// Distribution at that time.
    pub counts: Vec<GradeCount>,
}

/// Grade distribution with history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    /// Current distribution, best grade first.
    pub distribution: Vec<GradeCount>,
    /// Recent points, oldest first.
    pub history: Vec<DistributionPoint>,
}

/// One row of the rankings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingEntry {
    /// 1-based rank.
    pub rank: usize,
    /// Maker name.
    pub name: String,
    /// Grade.
    pub grade: Grade,
    /// Composite score.
    pub composite_score: u8,
    /// Uptime.
    pub uptime_pct: f64,
    /// Spread.
    pub spread: f64,
    /// Volume.
    pub volume_m: f64,
    /// First specialty tag.
    pub specialty: Option<String>,
}

/// One pillar row of a detail view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PillarEntry {
    /// Pillar.
    pub pillar: Pillar,
    /// Human-readable name.
    pub display_name: &'static str,
    /// Score in `[0, 1]`.
    pub score: f64,
}

/// Pillar breakdown of one maker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PillarDetail {
    /// Maker name.
    pub name: String,
    /// Status.
    pub status: MakerStatus,
    /// Grade.
    pub grade: Grade,
    /// Composite score.
    pub composite_score: u8,
    /// Six pillars in canonical order.
    pub pillars: Vec<PillarEntry>,
    /// Red flags.
    pub red_flags: Vec<RedFlag>,
}

/// Alert book contents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertsView {
    /// Alerts, oldest first.
    pub alerts: Vec<Alert>,
    /// Statistics.
    pub stats: AlertStats,
}

/// Summarizes a rating pass.
#[must_use]
pub fn summarize(makers: &[RatedMarketMaker], degraded: bool) -> MetricsSummary {
    let count = makers.len();
    let mean = |f: fn(&RatedMarketMaker) -> f64| {
        if count == 0 {
            0.0
        } else {
            round_to(makers.iter().map(f).sum::<f64>() / count as f64, 2)
        }
    };

    MetricsSummary {
        total_makers: count,
        active: makers
            .iter()
            .filter(|m| m.status() == MakerStatus::Active)
            .count(),
        warning: makers
            .iter()
            .filter(|m| m.status() == MakerStatus::Warning)
            .count(),
        flagged: makers.iter().filter(|m| !m.red_flags().is_empty()).count(),
        total_volume_m: round_to(makers.iter().map(|m| m.metrics().volume_m).sum(), 2),
        average_spread: mean(|m| m.metrics().spread),
        total_pairs: makers.iter().map(|m| u64::from(m.metrics().pairs)).sum(),
        average_uptime_pct: mean(|m| m.metrics().uptime_pct),
        average_latency_ms: mean(|m| m.metrics().latency_ms),
        average_score: mean(|m| f64::from(m.composite_score())),
        degraded,
    }
}

/// Counts makers per grade, best grade first. Every grade is listed.
#[must_use]
pub fn grade_distribution(makers: &[RatedMarketMaker]) -> Vec<GradeCount> {
    Grade::ALL
        .iter()
        .map(|grade| GradeCount {
            grade: *grade,
            count: makers.iter().filter(|m| m.grade() == *grade).count(),
        })
        .collect()
}

/// Top `top_n` makers by composite score; ties broken by name.
#[must_use]
pub fn rank(makers: &[RatedMarketMaker], top_n: usize) -> Vec<RankingEntry> {
    let mut ordered: Vec<&RatedMarketMaker> = makers.iter().collect();
    ordered.sort_by(|a, b| {
        b.composite_score()
            .cmp(&a.composite_score())
            .then_with(|| a.name().cmp(b.name()))
    });
    ordered
        .into_iter()
        .take(top_n)
        .enumerate()
        .map(|(i, m)| RankingEntry {
            rank: i + 1,
            name: m.name().to_string(),
            grade: m.grade(),
            composite_score: m.composite_score(),
            uptime_pct: m.metrics().uptime_pct,
            spread: m.metrics().spread,
            volume_m: m.metrics().volume_m,
            specialty: m.primary_specialty().map(str::to_string),
        })
        .collect()
}

/// Pillar breakdown of one maker.
#[must_use]
pub fn pillar_detail(maker: &RatedMarketMaker) -> PillarDetail {
    PillarDetail {
        name: maker.name().to_string(),
        status: maker.status(),
        grade: maker.grade(),
        composite_score: maker.composite_score(),
        pillars: maker
            .pillar_scores()
            .entries()
            .iter()
            .map(|(pillar, score)| PillarEntry {
                pillar: *pillar,
                display_name: pillar.display_name(),
                score: round_to(*score, 2),
            })
            .collect(),
        red_flags: maker.red_flags().to_vec(),
    }
}

/// Bounded rolling history of distribution points.
#[derive(Debug, Clone)]
pub struct ChartHistory {
    capacity: usize,
    points: VecDeque<DistributionPoint>,
}

impl ChartHistory {
    /// Creates an empty history holding at most `capacity` points.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            points: VecDeque::with_capacity(capacity),
        }
    }

    /// Appends a point for this pass and returns the chart view.
    pub fn record(&mut self, makers: &[RatedMarketMaker], at: Timestamp) -> ChartView {
        let distribution = grade_distribution(makers);
        let average_score = summarize(makers, false).average_score;
        self.points.push_back(DistributionPoint {
            at,
            average_score,
            counts: distribution.clone(),
        });
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
        ChartView {
            distribution,
            history: self.points.iter().cloned().collect(),
        }
    }

    /// Number of retained points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if no point is retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Round-robin selection for the pillar-detail view.
///
/// The same maker is shown for `rotate_every` consecutive ticks.
#[derive(Debug, Clone)]
pub struct PillarRotation {
    rotate_every: u32,
    ticks: u32,
    cursor: usize,
}

impl PillarRotation {
    /// Creates a rotation starting at the first maker.
    #[must_use]
    pub fn new(rotate_every: u32) -> Self {
        Self {
            rotate_every: rotate_every.max(1),
            ticks: 0,
            cursor: 0,
        }
    }

    /// Returns the index to show this tick for a roster of `len` makers.
    pub fn advance(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let index = self.cursor % len;
        self.ticks += 1;
        if self.ticks >= self.rotate_every {
            self.ticks = 0;
            self.cursor = (index + 1) % len;
        }
        Some(index)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::market_maker::{
        ActivityHistory, MakerMetrics, MakerProfile, MarketMakerBaseline,
    };
    use crate::domain::services::metric_generator::SequenceRandom;
    use crate::domain::services::rating_engine::{RatingEngine, TickSample};

    fn rated(name: &str, spread: f64, pnl_k: f64, status: MakerStatus) -> RatedMarketMaker {
        let metrics = MakerMetrics {
            pairs: 150,
            spread,
            volume_m: 2.5,
            inventory_m: 2.0,
            pnl_k,
            uptime_pct: 99.5,
            latency_ms: 2.0,
            execution_speed_s: 1.0,
            success_rate_pct: 98.5,
            volume_capacity_m: 5.0,
        };
        let baseline = MarketMakerBaseline::new(
            name,
            metrics,
            status,
            MakerProfile::new("London", 2019, 20, ["Market Making"]),
        );
        let sample = TickSample {
            metrics,
            best_spread_today: spread,
            last_trade_secs: 2,
            activity: ActivityHistory::new([true; 10]),
            status,
        };
        RatingEngine::new(2025, Box::new(SequenceRandom::constant(0.5))).assess(
            &baseline,
            &sample,
            Timestamp::now(),
        )
    }

    mod summary {
        use super::*;

        #[test]
        fn counts_and_averages() {
            let makers = vec![
                rated("A", 10.0, 40.0, MakerStatus::Active),
                rated("B", 20.0, -1.0, MakerStatus::Warning),
            ];
            let summary = summarize(&makers, true);
            assert_eq!(summary.total_makers, 2);
            assert_eq!(summary.active, 1);
            assert_eq!(summary.warning, 1);
            assert_eq!(summary.flagged, 1);
            assert_eq!(summary.total_volume_m, 5.0);
            assert_eq!(summary.average_spread, 15.0);
            assert_eq!(summary.total_pairs, 300);
            assert!(summary.degraded);
        }

        #[test]
        fn empty_roster() {
            let summary = summarize(&[], false);
            assert_eq!(summary.total_makers, 0);
            assert_eq!(summary.average_spread, 0.0);
        }
    }

    mod distribution {
        use super::*;

        #[test]
        fn lists_every_grade() {
            let makers = vec![
                rated("A", 10.0, 40.0, MakerStatus::Active),
                rated("B", 20.0, -1.0, MakerStatus::Active),
            ];
            let counts = grade_distribution(&makers);
            assert_eq!(counts.len(), 6);
            assert_eq!(counts.iter().map(|c| c.count).sum::<usize>(), 2);
            let f = counts.iter().find(|c| c.grade == Grade::F).unwrap();
            assert!(f.count >= 1);
        }

        #[test]
        fn history_is_bounded() {
            let makers = vec![rated("A", 10.0, 40.0, MakerStatus::Active)];
            let mut history = ChartHistory::new(3);
            for _ in 0..5 {
                history.record(&makers, Timestamp::now());
            }
            assert_eq!(history.len(), 3);
            let view = history.record(&makers, Timestamp::now());
            assert_eq!(view.history.len(), 3);
        }
    }

    mod rankings {
        use super::*;

        #[test]
        fn sorted_by_score_then_name() {
            let makers = vec![
                rated("Zeta", 20.0, 40.0, MakerStatus::Active),
                rated("Alpha", 20.0, 40.0, MakerStatus::Active),
                rated("Flagged", 20.0, -5.0, MakerStatus::Warning),
            ];
            let ranked = rank(&makers, 5);
            assert_eq!(ranked.len(), 3);
            assert_eq!(ranked[0].name, "Alpha");
            assert_eq!(ranked[0].rank, 1);
            assert_eq!(ranked[1].name, "Zeta");
            assert_eq!(ranked[2].name, "Flagged");
            assert_eq!(ranked[0].specialty.as_deref(), Some("Market Making"));
        }

        #[test]
        fn truncates_to_top_n() {
            let makers: Vec<_> = ["A", "B", "C"]
                .iter()
                .map(|n| rated(n, 20.0, 40.0, MakerStatus::Active))
                .collect();
            assert_eq!(rank(&makers, 2).len(), 2);
        }
    }

    mod pillar_detail {
        use super::*;

        #[test]
        fn six_rows_in_order() {
            let detail = super::super::pillar_detail(&rated("A", 10.0, -1.0, MakerStatus::Active));
            assert_eq!(detail.pillars.len(), 6);
            assert_eq!(detail.pillars[0].pillar, Pillar::Reputation);
            assert_eq!(detail.pillars[5].display_name, "DeFi Integration");
            assert_eq!(detail.red_flags, vec![RedFlag::BalanceSheetInsolvency]);
        }

        #[test]
        fn rotation_holds_then_advances() {
            let mut rotation = PillarRotation::new(2);
            let picks: Vec<_> = (0..7).map(|_| rotation.advance(3).unwrap()).collect();
            assert_eq!(picks, vec![0, 0, 1, 1, 2, 2, 0]);
            assert_eq!(rotation.advance(0), None);
        }

        #[test]
        fn rotation_survives_shrinking_roster() {
            let mut rotation = PillarRotation::new(1);
            for _ in 0..4 {
                rotation.advance(5);
            }
            assert_eq!(rotation.advance(2), Some(0));
        }
    }
}
