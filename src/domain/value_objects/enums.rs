//! # Domain Enums
//!
//! Enumeration types for rating concepts.
//!
//! - [`MakerStatus`] - Operational status of a market maker
//! - [`Grade`] - Letter grade produced by the classifier
//! - [`Pillar`] - One of the six scoring dimensions
//! - [`AlertLevel`] - Severity class or generic level of an alert
//!
//! All enums implement `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`,
//! `Display`, `FromStr`, and Serde traits. The wire form matches the strings
//! the dashboard frontend renders (`"active"`, `"A+"`, `"critical"`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operational status of a market maker.
///
/// # Examples
///
/// ```
/// use mm_monitor::domain::value_objects::enums::MakerStatus;
///
/// let status: MakerStatus = "warning".parse().unwrap();
/// assert_eq!(status, MakerStatus::Warning);
/// assert!(!status.is_active());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum MakerStatus {
    /// Quoting normally.
    Active = 0,
    /// Operational with degraded behaviour.
    Warning = 1,
    /// Reporting errors.
    Error = 2,
    /// Not reachable.
    Offline = 3,
}

impl MakerStatus {
    /// Returns true if the maker is active.
    #[inline]
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    /// Returns the status a rare status flip moves to.
    ///
    /// Active and warning swap; error and offline recover to active.
    #[inline]
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Active => Self::Warning,
            Self::Warning | Self::Error | Self::Offline => Self::Active,
        }
    }
}

impl fmt::Display for MakerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
            Self::Offline => write!(f, "offline"),
        }
    }
}

impl FromStr for MakerStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "offline" => Ok(Self::Offline),
            _ => Err(ParseEnumError::InvalidValue("MakerStatus", s.to_string())),
        }
    }
}

/// Letter grade assigned by the grade classifier.
///
/// Only the six grades the classifier can actually reach are part of the
/// vocabulary. Variants are declared best-first, so the derived ordering
/// sorts `A+` before `F`.
///
/// # Examples
///
/// ```
/// use mm_monitor::domain::value_objects::enums::Grade;
///
/// assert_eq!(Grade::APlus.to_string(), "A+");
/// assert!(Grade::APlus < Grade::F);
/// assert!("B+".parse::<Grade>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Grade {
    /// Exceptional on every pillar.
    #[serde(rename = "A+")]
    APlus = 0,
    /// Strong.
    #[serde(rename = "A")]
    A = 1,
    /// Good.
    #[serde(rename = "B")]
    B = 2,
    /// Adequate.
    #[serde(rename = "C")]
    C = 3,
    /// Weak.
    #[serde(rename = "D")]
    D = 4,
    /// Failing, or forced by a red flag.
    #[serde(rename = "F")]
    F = 5,
}

impl Grade {
    /// All grades, best first.
    pub const ALL: [Self; 6] = [Self::APlus, Self::A, Self::B, Self::C, Self::D, Self::F];

    /// Returns the display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }

    /// Returns true for a failing grade.
    #[inline]
    #[must_use]
    pub const fn is_failing(self) -> bool {
        matches!(self, Self::F)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Grade {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A+" => Ok(Self::APlus),
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "D" => Ok(Self::D),
            "F" => Ok(Self::F),
            _ => Err(ParseEnumError::InvalidValue("Grade", s.to_string())),
        }
    }
}

/// One of the six scoring dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Pillar {
    /// Track record, jurisdiction, endorsements.
    Reputation = 0,
    /// Capital adequacy, liquidity reserves, risk controls.
    BalanceSheet = 1,
    /// Incident reporting, stakeholder updates, responsiveness.
    Communication = 2,
    /// Spread fairness and value delivery.
    Pricing = 3,
    /// Uptime, latency, security posture.
    Technology = 4,
    /// On-chain presence and multi-chain coverage.
    Defi = 5,
}

impl Pillar {
    /// All pillars in canonical order.
    pub const ALL: [Self; 6] = [
        Self::Reputation,
        Self::BalanceSheet,
        Self::Communication,
        Self::Pricing,
        Self::Technology,
        Self::Defi,
    ];

    /// Returns the human-readable pillar name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Reputation => "Reputation",
            Self::BalanceSheet => "Balance Sheet",
            Self::Communication => "Communication",
            Self::Pricing => "Pricing",
            Self::Technology => "Technology",
            Self::Defi => "DeFi Integration",
        }
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Pillar {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace([' ', '-'], "_").as_str() {
            "reputation" => Ok(Self::Reputation),
            "balance_sheet" | "balancesheet" => Ok(Self::BalanceSheet),
            "communication" => Ok(Self::Communication),
            "pricing" => Ok(Self::Pricing),
            "technology" => Ok(Self::Technology),
            "defi" | "defi_integration" => Ok(Self::Defi),
            _ => Err(ParseEnumError::InvalidValue("Pillar", s.to_string())),
        }
    }
}

/// Severity class or generic level of an alert.
///
/// Red-flag alerts carry one of the severity classes (`Critical`, `High`);
/// system events carry one of the generic levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum AlertLevel {
    /// Red flag that threatens solvency or availability.
    Critical = 0,
    /// Red flag that degrades service quality.
    High = 1,
    /// Generic error event.
    Error = 2,
    /// Generic warning event.
    Warning = 3,
    /// Generic success event.
    Success = 4,
    /// Generic informational event.
    Info = 5,
}

impl AlertLevel {
    /// All levels.
    pub const ALL: [Self; 6] = [
        Self::Critical,
        Self::High,
        Self::Error,
        Self::Warning,
        Self::Success,
        Self::Info,
    ];

    /// Returns true for the red-flag severity classes.
    #[inline]
    #[must_use]
    pub const fn is_severity_class(self) -> bool {
        matches!(self, Self::Critical | Self::High)
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Critical => write!(f, "critical"),
            Self::High => write!(f, "high"),
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Success => write!(f, "success"),
            Self::Info => write!(f, "info"),
        }
    }
}

impl FromStr for AlertLevel {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "critical" => Ok(Self::Critical),
            "high" => Ok(Self::High),
            "error" => Ok(Self::Error),
            "warning" => Ok(Self::Warning),
            "success" => Ok(Self::Success),
            "info" => Ok(Self::Info),
            _ => Err(ParseEnumError::InvalidValue("AlertLevel", s.to_string())),
        }
    }
}

/// Error returned when parsing an enum from a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEnumError {
    /// The provided string value is not valid for the enum.
    InvalidValue(&'static str, String),
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue(enum_name, value) => {
                write!(f, "invalid {} value: '{}'", enum_name, value)
            }
        }
    }
}

impl std::error::Error for ParseEnumError {}
