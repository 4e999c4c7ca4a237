//! State layer errors

use app_core::HoroscopeError;
use thiserror::Error;

/// State errors
#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    /// Fetching the reading failed
    #[error("Horoscope error: {0}")]
    Horoscope(#[from] HoroscopeError),

    /// Retry was requested without a failed load
    #[error("Nothing to retry")]
    NothingToRetry,
}

/// Result type for state operations
pub type Result<T> = std::result::Result<T, StoreError>;
