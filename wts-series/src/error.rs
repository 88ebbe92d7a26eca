/// Error types for time series storage
use chrono::NaiveDate;
use thiserror::Error;

/// Configuration errors raised before any storage is mutated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeriesError {
    /// One or both period dates were not provided
    #[error("Period is not set: both date1 and date2 are required")]
    PeriodNotSet,

    /// Only a multiplier of 1 is supported for storage
    #[error("Unsupported interval multiplier {0} (only 1 is supported)")]
    UnsupportedMultiplier(u32),

    /// The start of the period is after its end
    #[error("Invalid period: {start} is after {end}")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },
}

/// Type alias for Results using SeriesError
pub type Result<T> = std::result::Result<T, SeriesError>;
