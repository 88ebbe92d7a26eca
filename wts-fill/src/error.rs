/// Error types for gap filling
use chrono::NaiveDate;
use thiserror::Error;
use wts_series::SeriesError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FillError {
    /// The target series has no allocated period
    #[error("Series {0} has no period of record")]
    NotAllocated(String),

    /// A reference series does not share the target interval
    #[error("Interval mismatch: target is {target}, {candidate} is {interval}")]
    IntervalMismatch {
        target: String,
        candidate: String,
        interval: String,
    },

    /// The fill period is inverted
    #[error("Invalid fill period: {start} is after {end}")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },

    /// A candidate relationship produced NaN or infinity for one date
    #[error("Estimate from {candidate} for {date} is not finite")]
    NonFiniteEstimate { date: NaiveDate, candidate: String },

    #[error(transparent)]
    Series(#[from] SeriesError),
}

/// Type alias for Results using FillError
pub type Result<T> = std::result::Result<T, FillError>;
