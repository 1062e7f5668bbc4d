//! # Data Source Port
//!
//! The collaborator the scheduler fetches baselines from before every rating
//! pass. Fetching is the only suspension point of a refresh; scoring and
//! classification never await.
//!
//! A failed fetch is recovered by the caller using the last-known baselines.

use crate::domain::entities::market_maker::MarketMakerBaseline;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for data-source fetches.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The source could not be reached.
    #[error("data source unavailable: {0}")]
    Unavailable(String),

    /// The source answered with unusable data.
    #[error("malformed data: {0}")]
    Malformed(String),

    /// The source answered with no records.
    #[error("data source returned no records")]
    Empty,
}

impl SourceError {
    /// Creates an unavailable error.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Creates a malformed data error.
    #[must_use]
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}

/// Result type for data-source fetches.
pub type SourceResult<T> = Result<T, SourceError>;

/// Supplier of market maker baselines.
#[async_trait]
pub trait MetricsSource: Send + Sync + fmt::Debug {
    /// Fetches the current baseline of every market maker.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] if the records cannot be obtained.
    async fn fetch_entity_metrics(&self) -> SourceResult<Vec<MarketMakerBaseline>>;

    /// Short name used in logs and alerts.
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        assert!(SourceError::unavailable("timeout").to_string().contains("timeout"));
        assert!(SourceError::malformed("bad row").to_string().contains("bad row"));
        assert_eq!(SourceError::Empty.to_string(), "data source returned no records");
    }
}
