//! # Domain Errors
//!
//! Errors raised by domain types when an input violates a domain rule.

use crate::domain::value_objects::enums::ParseEnumError;
use crate::domain::value_objects::ids::AlertId;
use thiserror::Error;

/// Domain layer error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// An enum string could not be parsed.
    #[error(transparent)]
    InvalidEnum(#[from] ParseEnumError),

    /// A baseline record is malformed.
    #[error("invalid baseline for '{maker}': {reason}")]
    InvalidBaseline {
        /// Market maker name, possibly empty.
        maker: String,
        /// What is wrong with it.
        reason: String,
    },

    /// An alert level is not allowed for the requested operation.
    #[error("invalid alert level: {0}")]
    InvalidAlertLevel(String),

    /// The alert is already resolved.
    #[error("alert already resolved: {0}")]
    AlertAlreadyResolved(AlertId),
}

impl DomainError {
    /// Creates an invalid baseline error.
    #[must_use]
    pub fn invalid_baseline(maker: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidBaseline {
            maker: maker.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid alert level error.
    #[must_use]
    pub fn invalid_alert_level(message: impl Into<String>) -> Self {
        Self::InvalidAlertLevel(message.into())
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
