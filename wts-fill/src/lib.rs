//! Gap filling for water time series.
//!
//! The regression filler estimates each missing value from the best of
//! several validated relationships with reference series; the interpolation
//! filler bridges short interior gaps linearly.

pub mod candidate;
pub mod config;
pub mod error;
pub mod filler;
pub mod interpolate;
pub mod mixed;

pub use candidate::FillCandidate;
pub use config::{FillConfig, FillFlag, RankBy, ValidationCriteria};
pub use error::{FillError, Result};
pub use filler::{CancelToken, FillReport, GapFiller};
pub use interpolate::fill_interpolate;
pub use mixed::{build_candidates, MixedStationPlan};
