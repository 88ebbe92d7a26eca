//! Regression analysis between a dependent and an independent water time
//! series.
//!
//! Relationships are fit either as one equation over the whole analysis
//! period or as twelve independent monthly equations, using ordinary least
//! squares (OLS) or the Maintenance Of Variance Extension, type 2 (MOVE.2),
//! optionally on log10-transformed data. Each equation carries its own
//! sample sizes, error statistics and an optional slope significance test.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod result;
mod samples;
mod stats;

pub use analyzer::{analyze_candidates, RegressionAnalyzer};
pub use config::{ErrorMode, NumberOfEquations, RegressionConfig, RegressionMethod, Transformation};
pub use error::{RegressionError, Result};
pub use result::{ConfidenceTest, Equation, FitStatistics, NotAnalyzedReason, RegressionResults};
