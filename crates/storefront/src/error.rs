//! Unified error handling.
//!
//! Provides a unified `AppError` type for operations that span the content,
//! storage and checkout layers. Feed failures are absorbed by the content
//! service, so they only surface here when a caller asks for them directly.

use thiserror::Error;

use poppin_deli_core::checkout::CheckoutError;
use poppin_deli_core::storage::StorageError;

use crate::config::ConfigError;
use crate::content::FallbackError;
use crate::sheets::SheetsError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Spreadsheet feed operation failed.
    #[error("Sheets error: {0}")]
    Sheets(#[from] SheetsError),

    /// Key-value storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Bundled fallback data could not be read.
    #[error("Fallback error: {0}")]
    Fallback(#[from] FallbackError),

    /// Checkout validation failed.
    #[error("{0}")]
    Checkout(#[from] CheckoutError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad input from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Whether the error is the user's to fix rather than an environment
    /// problem.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Checkout(_) | Self::NotFound(_) | Self::BadRequest(_)
        )
    }
}

/// Result type alias for application operations.
pub type Result<T> = std::result::Result<T, AppError>;
