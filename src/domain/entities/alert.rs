//! # Alert Entity
//!
//! A detected anomaly, either bound to a market maker through a red flag or
//! raised by a system event.
//!
//! An alert is only ever mutated to flip it from active to resolved.
//!
//! # Examples
//!
//! ```
//! use mm_monitor::domain::entities::alert::Alert;
//! use mm_monitor::domain::value_objects::enums::AlertLevel;
//! use mm_monitor::domain::value_objects::red_flag::RedFlag;
//!
//! let mut alert = Alert::for_red_flag("Arken", RedFlag::PoorPerformance);
//! assert_eq!(alert.level(), AlertLevel::High);
//! assert!(alert.is_active());
//!
//! alert.resolve("condition cleared").unwrap();
//! assert!(!alert.is_active());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::enums::AlertLevel;
use crate::domain::value_objects::ids::AlertId;
use crate::domain::value_objects::red_flag::RedFlag;
use crate::domain::value_objects::timestamp::Timestamp;
use serde::{Deserialize, Serialize};

/// An alert in the alert book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    id: AlertId,
    level: AlertLevel,
    message: String,
    market_maker: Option<String>,
    red_flag: Option<RedFlag>,
    condition: Option<String>,
    active: bool,
    created_at: Timestamp,
    resolved_at: Option<Timestamp>,
    resolution: Option<String>,
}

impl Alert {
    /// Creates an active entity-bound alert for a red flag.
    ///
    /// The level is the flag's severity class.
    #[must_use]
    pub fn for_red_flag(market_maker: impl Into<String>, flag: RedFlag) -> Self {
        let market_maker = market_maker.into();
        Self {
            id: AlertId::new_v4(),
            level: flag.severity(),
            message: format!("{}: {} - {}", market_maker, flag.label(), flag.description()),
            market_maker: Some(market_maker),
            red_flag: Some(flag),
            condition: Some(flag.condition().to_string()),
            active: true,
            created_at: Timestamp::now(),
            resolved_at: None,
            resolution: None,
        }
    }

    /// Creates an active system alert with a generic level.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidAlertLevel`] for a severity class, which
    /// is reserved for red flags.
    pub fn system(level: AlertLevel, message: impl Into<String>) -> DomainResult<Self> {
        if level.is_severity_class() {
            return Err(DomainError::invalid_alert_level(format!(
                "'{level}' is reserved for red-flag alerts"
            )));
        }
        Ok(Self {
            id: AlertId::new_v4(),
            level,
            message: message.into(),
            market_maker: None,
            red_flag: None,
            condition: None,
            active: true,
            created_at: Timestamp::now(),
            resolved_at: None,
            resolution: None,
        })
    }

    /// Binds a system alert to a market maker.
    #[must_use]
    pub fn with_market_maker(mut self, market_maker: impl Into<String>) -> Self {
        self.market_maker = Some(market_maker.into());
        self
    }

    /// Marks the alert resolved.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::AlertAlreadyResolved`] if the alert is not active.
    pub fn resolve(&mut self, reason: impl Into<String>) -> DomainResult<()> {
        if !self.active {
            return Err(DomainError::AlertAlreadyResolved(self.id));
        }
        self.active = false;
        self.resolved_at = Some(Timestamp::now());
        self.resolution = Some(reason.into());
        Ok(())
    }

    /// Identifier.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> AlertId {
        self.id
    }

    /// Level.
    #[inline]
    #[must_use]
    pub const fn level(&self) -> AlertLevel {
        self.level
    }

    /// Message.
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Bound market maker, if any.
    #[inline]
    #[must_use]
    pub fn market_maker(&self) -> Option<&str> {
        self.market_maker.as_deref()
    }

    /// Red flag that raised the alert, if any.
    #[inline]
    #[must_use]
    pub const fn red_flag(&self) -> Option<RedFlag> {
        self.red_flag
    }

    /// Triggering rule, if any.
    #[inline]
    #[must_use]
    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }

    /// True until resolved.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Creation time.
    #[inline]
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Resolution time.
    #[inline]
    #[must_use]
    pub const fn resolved_at(&self) -> Option<Timestamp> {
        self.resolved_at
    }

    /// Resolution reason.
    #[inline]
    #[must_use]
    pub fn resolution(&self) -> Option<&str> {
        self.resolution.as_deref()
    }

    /// Returns true if this is the active alert for `(maker, flag)`.
    #[must_use]
    pub fn is_active_for(&self, maker: &str, flag: RedFlag) -> bool {
        self.active && self.red_flag == Some(flag) && self.market_maker.as_deref() == Some(maker)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn red_flag_alert_message() {
        let alert = Alert::for_red_flag("TokenMaster", RedFlag::BalanceSheetInsolvency);
        assert_eq!(
            alert.message(),
            "TokenMaster: Balance Sheet Insolvency - Negative PnL detected"
        );
        assert_eq!(alert.level(), AlertLevel::Critical);
        assert_eq!(alert.condition(), Some("pnl < 0"));
        assert!(alert.is_active_for("TokenMaster", RedFlag::BalanceSheetInsolvency));
        assert!(!alert.is_active_for("TokenMaster", RedFlag::PoorPerformance));
    }

    #[test]
    fn system_alert_rejects_severity_class() {
        assert!(Alert::system(AlertLevel::Critical, "boom").is_err());
        let alert = Alert::system(AlertLevel::Info, "scheduler started").unwrap();
        assert!(alert.market_maker().is_none());
        assert!(alert.red_flag().is_none());
    }

    #[test]
    fn resolve_once() {
        let mut alert = Alert::system(AlertLevel::Warning, "degraded").unwrap();
        alert.resolve("recovered").unwrap();
        assert!(!alert.is_active());
        assert_eq!(alert.resolution(), Some("recovered"));
        assert!(alert.resolved_at().is_some());

        let err = alert.resolve("again").unwrap_err();
        assert_eq!(err, DomainError::AlertAlreadyResolved(alert.id()));
        assert_eq!(alert.resolution(), Some("recovered"));
    }

    #[test]
    fn resolved_alert_is_not_active_for_flag() {
        let mut alert = Alert::for_red_flag("Arken", RedFlag::TechnologyFailure);
        alert.resolve("condition cleared").unwrap();
        assert!(!alert.is_active_for("Arken", RedFlag::TechnologyFailure));
    }
}
