//! # Application Errors
//!
//! Error types for the application layer.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── Domain(DomainError)      - Business rule violations
//! ├── Validation(String)       - Input validation failures
//! ├── NotFound { .. }          - Resource not found
//! ├── ViewUnavailable(ViewKind) - View never populated
//! └── Internal(String)         - Unexpected failures
//! ```
//!
//! # Examples
//!
//! ```
//! use mm_monitor::application::error::ApplicationError;
//!
//! let err = ApplicationError::not_found("market maker", "Nobody");
//! assert!(err.is_not_found());
//!
//! let err = ApplicationError::validation("reason must not be empty");
//! assert!(err.is_validation());
//! ```

use crate::application::views::ViewKind;
use crate::domain::errors::DomainError;
use thiserror::Error;

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain error from business logic.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Request validation failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("not found: {resource_type} with id {id}")]
    NotFound {
        /// Type of resource.
        resource_type: String,
        /// Resource identifier.
        id: String,
    },

    /// The view has never been populated.
    #[error("view unavailable: {0}")]
    ViewUnavailable(ViewKind),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// Creates a view unavailable error.
    #[must_use]
    pub fn view_unavailable(view: ViewKind) -> Self {
        Self::ViewUnavailable(view)
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a validation error, including domain rule
    /// violations caused by caller input.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Domain(_))
    }

    /// Returns true if the view has no data yet.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::ViewUnavailable(_))
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
