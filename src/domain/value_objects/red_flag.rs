//! # Red Flags
//!
//! Hard-failure conditions that force a grade of `F`.

use crate::domain::value_objects::enums::AlertLevel;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A hard-failure condition detected on a market maker.
///
/// Serializes as its human-readable label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RedFlag {
    /// Negative PnL.
    #[serde(rename = "Balance Sheet Insolvency")]
    BalanceSheetInsolvency,
    /// Uptime below 95%.
    #[serde(rename = "Communication Blackout")]
    CommunicationBlackout,
    /// Execution slower than 5 seconds.
    #[serde(rename = "Technology Failure")]
    TechnologyFailure,
    /// Success rate below 90%.
    #[serde(rename = "Poor Performance")]
    PoorPerformance,
}

impl RedFlag {
    /// All flags in evaluation order.
    pub const ALL: [Self; 4] = [
        Self::BalanceSheetInsolvency,
        Self::CommunicationBlackout,
        Self::TechnologyFailure,
        Self::PoorPerformance,
    ];

    /// Returns the human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BalanceSheetInsolvency => "Balance Sheet Insolvency",
            Self::CommunicationBlackout => "Communication Blackout",
            Self::TechnologyFailure => "Technology Failure",
            Self::PoorPerformance => "Poor Performance",
        }
    }

    /// Returns a short description of the triggering condition.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::BalanceSheetInsolvency => "Negative PnL detected",
            Self::CommunicationBlackout => "Uptime below 95%",
            Self::TechnologyFailure => "Execution speed >5s",
            Self::PoorPerformance => "Success rate <90%",
        }
    }

    /// Returns the triggering rule as an expression.
    #[must_use]
    pub const fn condition(self) -> &'static str {
        match self {
            Self::BalanceSheetInsolvency => "pnl < 0",
            Self::CommunicationBlackout => "uptime < 95%",
            Self::TechnologyFailure => "executionSpeed > 5",
            Self::PoorPerformance => "successRate < 90",
        }
    }

    /// Returns the severity class of alerts raised for this flag.
    #[must_use]
    pub const fn severity(self) -> AlertLevel {
        match self {
            Self::BalanceSheetInsolvency | Self::TechnologyFailure => AlertLevel::Critical,
            Self::CommunicationBlackout | Self::PoorPerformance => AlertLevel::High,
        }
    }
}

impl fmt::Display for RedFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
