//! Fixed-interval time series storage for water resources data.
//!
//! A series is stored as a row-per-year grid (row = year offset from the
//! start of the period, column = sub-year unit such as the month), with a
//! configurable missing-value domain, lazily recomputed limits and an
//! append-only genesis trail describing how the data were produced.

pub mod date_range;
pub mod error;
pub mod genesis;
pub mod ident;
pub mod interval;
pub mod limits;
pub mod missing;
pub mod point;
pub mod store;
pub mod year_type;

pub use date_range::DateRange;
pub use error::{Result, SeriesError};
pub use genesis::Genesis;
pub use ident::TsIdent;
pub use interval::{IntervalBase, TimeInterval};
pub use limits::TsLimits;
pub use missing::MissingDomain;
pub use point::TimeSeriesPoint;
pub use store::{DayTs, Daily, Layout, MonthTs, Monthly, RowColumnStore, TimeSeries};
pub use year_type::YearType;
