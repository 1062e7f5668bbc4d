//! # Timestamp Value Object
//!
//! UTC instant used for rating times, snapshot generation times and alert
//! lifecycle times.
//!
//! # Examples
//!
//! ```
//! use mm_monitor::domain::value_objects::timestamp::Timestamp;
//!
//! let new_year = Timestamp::from_secs(1_704_067_200).unwrap();
//!
//! assert_eq!(new_year.year(), 2024);
//! assert!(new_year < Timestamp::now());
//! ```

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A UTC timestamp.
///
/// Serializes as an RFC 3339 string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from Unix seconds.
    ///
    /// Returns `None` if the value is out of range.
    #[must_use]
    pub fn from_secs(secs: i64) -> Option<Self> {
        Utc.timestamp_opt(secs, 0).single().map(Self)
    }

    /// Returns the calendar year.
    #[inline]
    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
