use thiserror::Error;

/// Errors surfaced to callers of the core.
///
/// Every kind is recoverable at the UI boundary; none of them is fatal to the process.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AttendanceError {
    #[error("Invalid date format: {0:?} (expected YYYY-MM-DD)")]
    InvalidDateFormat(String),

    #[error("Invalid month token: {0:?} (expected YYYY-MM with month 01-12)")]
    InvalidMonthToken(String),

    #[error("Failed to fetch attendance data. Please check your connection and try again.")]
    DataUnavailable { reason: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Internal classification of a failed snapshot read.
///
/// Only used for logging; callers always see [`AttendanceError::DataUnavailable`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FetchFailure {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("HTTP error! status: {0}")]
    HttpStatus(u16),

    #[error("response body is not a valid attendance document: {0}")]
    Malformed(String),

    #[error("missing metadata in JSON")]
    MissingMetadata,

    #[error("could not read snapshot file: {0}")]
    Io(String),
}

impl From<FetchFailure> for AttendanceError {
    fn from(failure: FetchFailure) -> Self {
        AttendanceError::DataUnavailable {
            reason: failure.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AttendanceError>;
