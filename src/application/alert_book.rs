//! # Alert Book
//!
//! Bounded store of alerts.
//!
//! Red-flag alerts are kept in sync with the latest rating pass: one active
//! alert per `(maker, flag)` while the flag holds, resolved with
//! [`CONDITION_CLEARED`] once it clears. When the book exceeds its capacity
//! the oldest resolved alert is evicted first; an active alert is evicted only
//! when every alert is active. A red-flag sync never evicts an active alert:
//! a flag that finds the book full of active alerts is reported as suppressed
//! and retried on the next sync.
//!
//! # Examples
//!
//! ```
//! use mm_monitor::application::alert_book::AlertBook;
//! use mm_monitor::domain::value_objects::enums::AlertLevel;
//!
//! let mut book = AlertBook::new(20);
//! book.raise_system(AlertLevel::Info, "scheduler started").unwrap();
//! assert_eq!(book.active().len(), 1);
//! ```

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::entities::alert::Alert;
use crate::domain::entities::market_maker::RatedMarketMaker;
use crate::domain::errors::DomainResult;
use crate::domain::value_objects::enums::AlertLevel;
use crate::domain::value_objects::ids::AlertId;
use crate::domain::value_objects::red_flag::RedFlag;
use serde::Serialize;
use std::collections::VecDeque;

/// Resolution reason for red-flag alerts whose condition no longer holds.
pub const CONDITION_CLEARED: &str = "condition cleared";

/// Number of alerts listed in [`AlertStats::recent`].
pub const RECENT_ALERTS: usize = 5;

/// Alert count for one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelCount {
    /// Level.
    pub level: AlertLevel,
    /// Alerts at that level.
    pub count: usize,
}

/// Alert book statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertStats {
    /// Alerts held.
    pub total: usize,
    /// Active alerts.
    pub active: usize,
    /// Resolved alerts.
    pub inactive: usize,
    /// Count per level, every level listed.
    pub by_level: Vec<LevelCount>,
    /// Most recent alerts, newest first.
    pub recent: Vec<Alert>,
}

/// Changes made by one red-flag sync.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Alerts raised.
    pub raised: Vec<AlertId>,
    /// Alerts resolved.
    pub cleared: Vec<AlertId>,
    /// Alerts evicted to stay within capacity.
    pub evicted: Vec<AlertId>,
    /// Flags left without an alert because every held alert is active.
    pub suppressed: Vec<(String, RedFlag)>,
}

/// Bounded alert store, oldest first.
#[derive(Debug, Clone)]
pub struct AlertBook {
    capacity: usize,
    alerts: VecDeque<Alert>,
}

impl AlertBook {
    /// Creates an empty book holding at most `capacity` alerts.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            alerts: VecDeque::with_capacity(capacity + 1),
        }
    }

    /// Capacity.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of alerts held.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    /// Returns true if the book is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    /// Appends an alert, evicting if over capacity. Returns the evicted alert.
    pub fn push(&mut self, alert: Alert) -> Option<Alert> {
        self.alerts.push_back(alert);
        if self.alerts.len() <= self.capacity {
            return None;
        }
        let victim = self
            .alerts
            .iter()
            .position(|a| !a.is_active())
            .unwrap_or(0);
        let evicted = self.alerts.remove(victim);
        if let Some(alert) = &evicted {
            tracing::debug!(alert_id = %alert.id(), active = alert.is_active(), "alert evicted");
        }
        evicted
    }

    /// Raises an unbound system alert.
    ///
    /// # Errors
    ///
    /// Returns a domain error if `level` is a red-flag severity class.
    pub fn raise_system(
        &mut self,
        level: AlertLevel,
        message: impl Into<String>,
    ) -> DomainResult<AlertId> {
        let alert = Alert::system(level, message)?;
        let id = alert.id();
        self.push(alert);
        Ok(id)
    }

    /// Inserts a caller-built alert and returns a copy of it.
    pub fn insert(&mut self, alert: Alert) -> Alert {
        let copy = alert.clone();
        self.push(alert);
        copy
    }

    /// Returns true if pushing would have to evict an active alert.
    fn is_saturated(&self) -> bool {
        self.alerts.len() >= self.capacity && self.alerts.iter().all(Alert::is_active)
    }

    /// Brings red-flag alerts in line with a rating pass.
    pub fn sync_red_flags(&mut self, makers: &[RatedMarketMaker]) -> SyncOutcome {
        let mut outcome = SyncOutcome::default();
        for maker in makers {
            for flag in RedFlag::ALL {
                let raised = maker.red_flags().contains(&flag);
                let existing = self
                    .alerts
                    .iter()
                    .position(|a| a.is_active_for(maker.name(), flag));
                match (raised, existing) {
                    (true, None) if self.is_saturated() => {
                        tracing::warn!(
                            maker = maker.name(),
                            flag = %flag,
                            capacity = self.capacity,
                            "red flag alert suppressed, book full of active alerts"
                        );
                        outcome.suppressed.push((maker.name().to_string(), flag));
                    }
                    (true, None) => {
                        let alert = Alert::for_red_flag(maker.name(), flag);
                        tracing::warn!(maker = maker.name(), flag = %flag, "red flag raised");
                        outcome.raised.push(alert.id());
                        if let Some(evicted) = self.push(alert) {
                            outcome.evicted.push(evicted.id());
                        }
                    }
                    (false, Some(index)) => {
                        if let Some(alert) = self.alerts.get_mut(index)
                            && alert.resolve(CONDITION_CLEARED).is_ok()
                        {
                            tracing::info!(maker = maker.name(), flag = %flag, "red flag cleared");
                            outcome.cleared.push(alert.id());
                        }
                    }
                    _ => {}
                }
            }
        }
        outcome
    }

    /// Resolves an alert.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::NotFound`] for an unknown id, a validation
    /// error for an empty reason, and a domain error if already resolved.
    pub fn resolve(&mut self, id: AlertId, reason: &str) -> ApplicationResult<Alert> {
        if reason.trim().is_empty() {
            return Err(ApplicationError::validation("resolution reason must not be empty"));
        }
        let alert = self
            .alerts
            .iter_mut()
            .find(|a| a.id() == id)
            .ok_or_else(|| ApplicationError::not_found("alert", id.to_string()))?;
        alert.resolve(reason.trim())?;
        Ok(alert.clone())
    }

    /// Looks up an alert.
    #[must_use]
    pub fn get(&self, id: AlertId) -> Option<&Alert> {
        self.alerts.iter().find(|a| a.id() == id)
    }

    /// All alerts, oldest first.
    #[must_use]
    pub fn all(&self) -> Vec<Alert> {
        self.alerts.iter().cloned().collect()
    }

    /// Active alerts, oldest first.
    #[must_use]
    pub fn active(&self) -> Vec<Alert> {
        self.alerts.iter().filter(|a| a.is_active()).cloned().collect()
    }

    /// Alerts at `level`, oldest first.
    #[must_use]
    pub fn by_level(&self, level: AlertLevel) -> Vec<Alert> {
        self.alerts
            .iter()
            .filter(|a| a.level() == level)
            .cloned()
            .collect()
    }

    /// Statistics.
    #[must_use]
    pub fn stats(&self) -> AlertStats {
        let active = self.alerts.iter().filter(|a| a.is_active()).count();
        AlertStats {
            total: self.alerts.len(),
            active,
            inactive: self.alerts.len() - active,
            by_level: AlertLevel::ALL
                .iter()
                .map(|level| LevelCount {
                    level: *level,
                    count: self.alerts.iter().filter(|a| a.level() == *level).count(),
                })
                .collect(),
            recent: self.alerts.iter().rev().take(RECENT_ALERTS).cloned().collect(),
        }
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
    use crate::domain::value_objects::enums::MakerStatus;
    use crate::domain::value_objects::timestamp::Timestamp;

    fn rated(name: &str, pnl_k: f64, uptime_pct: f64) -> RatedMarketMaker {
        let metrics = MakerMetrics {
            pairs: 150,
            spread: 18.0,
            volume_m: 2.5,
            inventory_m: 2.0,
            pnl_k,
            uptime_pct,
            latency_ms: 2.0,
            execution_speed_s: 1.0,
            success_rate_pct: 98.5,
            volume_capacity_m: 5.0,
        };
        let baseline = MarketMakerBaseline::new(
            name,
            metrics,
            MakerStatus::Active,
            MakerProfile::new("London", 2019, 20, ["DeFi"]),
        );
        let sample = TickSample {
            metrics,
            best_spread_today: 18.0,
            last_trade_secs: 2,
            activity: ActivityHistory::default(),
            status: MakerStatus::Active,
        };
        RatingEngine::new(2025, Box::new(SequenceRandom::constant(0.5))).assess(
            &baseline,
            &sample,
            Timestamp::now(),
        )
    }

    mod capacity {
        use super::*;

        #[test]
        fn twenty_first_alert_evicts_oldest() {
            let mut book = AlertBook::new(20);
            let mut ids = Vec::new();
            for i in 0..20 {
                ids.push(book.raise_system(AlertLevel::Info, format!("event {i}")).unwrap());
            }
            assert_eq!(book.len(), 20);

            book.raise_system(AlertLevel::Info, "event 20").unwrap();
            assert_eq!(book.len(), 20);
            assert!(book.get(ids[0]).is_none());
            assert!(book.get(ids[1]).is_some());
        }

        #[test]
        fn resolved_alerts_are_evicted_first() {
            let mut book = AlertBook::new(3);
            let a = book.raise_system(AlertLevel::Info, "a").unwrap();
            let b = book.raise_system(AlertLevel::Info, "b").unwrap();
            let c = book.raise_system(AlertLevel::Info, "c").unwrap();
            book.resolve(b, "done").unwrap();

            book.raise_system(AlertLevel::Info, "d").unwrap();
            assert!(book.get(a).is_some());
            assert!(book.get(b).is_none());
            assert!(book.get(c).is_some());
        }
    }

    mod red_flags {
        use super::*;

        #[test]
        fn raises_once_while_active() {
            let mut book = AlertBook::new(20);
            let flagged = vec![rated("Arken", -3.0, 99.5)];

            let first = book.sync_red_flags(&flagged);
            assert_eq!(first.raised.len(), 1);
            let second = book.sync_red_flags(&flagged);
            assert!(second.raised.is_empty());
            assert_eq!(book.active().len(), 1);
            assert_eq!(book.active()[0].level(), AlertLevel::Critical);
        }

        #[test]
        fn clears_when_condition_goes_away() {
            let mut book = AlertBook::new(20);
            book.sync_red_flags(&[rated("Arken", -3.0, 94.0)]);
            assert_eq!(book.active().len(), 2);

            let outcome = book.sync_red_flags(&[rated("Arken", 10.0, 94.0)]);
            assert_eq!(outcome.cleared.len(), 1);
            let resolved: Vec<_> = book.all().into_iter().filter(|a| !a.is_active()).collect();
            assert_eq!(resolved.len(), 1);
            assert_eq!(resolved[0].resolution(), Some(CONDITION_CLEARED));
            assert_eq!(book.by_level(AlertLevel::High).len(), 1);
        }

        #[test]
        fn full_book_of_active_alerts_is_not_churned() {
            let mut book = AlertBook::new(2);
            let makers = vec![
                rated("Arken", -3.0, 99.5),
                rated("Astro", -3.0, 99.5),
                rated("Hexagon", -3.0, 99.5),
            ];

            let first = book.sync_red_flags(&makers);
            assert_eq!(first.raised.len(), 2);
            assert!(first.evicted.is_empty());
            assert_eq!(first.suppressed, vec![("Hexagon".to_string(), RedFlag::BalanceSheetInsolvency)]);
            let held: Vec<AlertId> = book.active().iter().map(Alert::id).collect();

            let second = book.sync_red_flags(&makers);
            assert!(second.raised.is_empty());
            assert!(second.evicted.is_empty());
            assert_eq!(second.suppressed.len(), 1);
            let still_held: Vec<AlertId> = book.active().iter().map(Alert::id).collect();
            assert_eq!(held, still_held);
        }

        #[test]
        fn suppressed_flag_is_raised_once_space_frees_up() {
            let mut book = AlertBook::new(2);
            let makers = vec![
                rated("Arken", -3.0, 99.5),
                rated("Astro", -3.0, 99.5),
                rated("Hexagon", -3.0, 99.5),
            ];
            book.sync_red_flags(&makers);

            let outcome = book.sync_red_flags(&[
                rated("Arken", 10.0, 99.5),
                rated("Astro", -3.0, 99.5),
                rated("Hexagon", -3.0, 99.5),
            ]);
            assert_eq!(outcome.cleared.len(), 1);
            assert_eq!(outcome.raised.len(), 1);
            assert_eq!(outcome.evicted.len(), 1);
            assert!(outcome.suppressed.is_empty());
            assert!(
                book.active()
                    .iter()
                    .any(|a| a.is_active_for("Hexagon", RedFlag::BalanceSheetInsolvency))
            );
        }

        #[test]
        fn recurrence_raises_a_new_alert() {
            let mut book = AlertBook::new(20);
            book.sync_red_flags(&[rated("Arken", -3.0, 99.5)]);
            book.sync_red_flags(&[rated("Arken", 10.0, 99.5)]);
            book.sync_red_flags(&[rated("Arken", -3.0, 99.5)]);
            assert_eq!(book.len(), 2);
            assert_eq!(book.active().len(), 1);
        }
    }

    mod resolution {
        use super::*;

        #[test]
        fn unknown_id_is_not_found() {
            let mut book = AlertBook::new(5);
            let err = book.resolve(AlertId::new_v4(), "x").unwrap_err();
            assert!(err.is_not_found());
        }

        #[test]
        fn empty_reason_is_rejected() {
            let mut book = AlertBook::new(5);
            let id = book.raise_system(AlertLevel::Warning, "w").unwrap();
            assert!(book.resolve(id, "  ").unwrap_err().is_validation());
        }

        #[test]
        fn double_resolve_fails() {
            let mut book = AlertBook::new(5);
            let id = book.raise_system(AlertLevel::Warning, "w").unwrap();
            book.resolve(id, "ok").unwrap();
            assert!(book.resolve(id, "again").unwrap_err().is_validation());
        }

        #[test]
        fn severity_class_rejected_for_system_alerts() {
            let mut book = AlertBook::new(5);
            assert!(book.raise_system(AlertLevel::Critical, "x").is_err());
            assert!(book.is_empty());
        }
    }

    #[test]
    fn stats_lists_recent_newest_first() {
        let mut book = AlertBook::new(20);
        for i in 0..7 {
            book.raise_system(AlertLevel::Info, format!("event {i}")).unwrap();
        }
        let id = book.raise_system(AlertLevel::Warning, "latest").unwrap();
        book.resolve(id, "handled").unwrap();

        let stats = book.stats();
        assert_eq!(stats.total, 8);
        assert_eq!(stats.active, 7);
        assert_eq!(stats.inactive, 1);
        assert_eq!(stats.recent.len(), RECENT_ALERTS);
        assert_eq!(stats.recent[0].message(), "latest");
        let info = stats.by_level.iter().find(|c| c.level == AlertLevel::Info).unwrap();
        assert_eq!(info.count, 7);
        assert_eq!(stats.by_level.len(), 6);
    }
}
