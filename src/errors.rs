use std::result::Result as StdResult;

use thiserror::Error;

/// Error type shared by the calendar domain, storage, and sync layers.
#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Invalid date `{value}` in field `{field}` of record {record}")]
    InvalidDate {
        record: String,
        field: &'static str,
        value: String,
    },
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Invalid month index: {0} (expected 0-11)")]
    InvalidMonth(u32),
    #[error("Remote sync error: {0}")]
    Remote(String),
}

pub type Result<T> = StdResult<T, CalendarError>;

impl From<std::io::Error> for CalendarError {
    fn from(err: std::io::Error) -> Self {
        CalendarError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for CalendarError {
    fn from(err: serde_json::Error) -> Self {
        CalendarError::Storage(err.to_string())
    }
}
