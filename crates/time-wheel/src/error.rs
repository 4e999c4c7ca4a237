//! Error types for the time wheel

use thiserror::Error;

use crate::time::TimeUnit;

/// Time wheel errors
#[derive(Debug, Error)]
pub enum WheelError {
    /// Offsetting a date left the representable calendar range
    #[error("Date out of range: {offset} x {unit} from base")]
    DateOutOfRange {
        /// Unit of the offset
        unit: TimeUnit,
        /// Number of units
        offset: i64,
    },

    /// A time unit name could not be parsed
    #[error("Unknown time unit: {0}")]
    UnknownUnit(String),

    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for time wheel operations
pub type Result<T> = std::result::Result<T, WheelError>;
