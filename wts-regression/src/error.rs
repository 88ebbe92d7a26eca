/// Error types for regression analysis
use crate::result::NotAnalyzedReason;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegressionError {
    /// The analysis configuration is inconsistent
    #[error("Invalid regression configuration: {0}")]
    InvalidConfig(String),

    /// Dependent and independent series use different intervals
    #[error("Interval mismatch: dependent is {dependent}, independent is {independent}")]
    IntervalMismatch {
        dependent: String,
        independent: String,
    },

    /// A series has no allocated period to analyze
    #[error("Series {0} has no period of record")]
    NotAllocated(String),

    /// The single whole-period equation could not be fit
    #[error("Regression of {dependent} on {independent} failed: {reason}")]
    EquationFailed {
        dependent: String,
        independent: String,
        reason: NotAnalyzedReason,
    },
}

/// Type alias for Results using RegressionError
pub type Result<T> = std::result::Result<T, RegressionError>;
