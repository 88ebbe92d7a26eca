use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single value of a series, as returned by point queries and iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
    pub units: String,
    /// Empty when the value carries no flag
    pub flag: String,
    /// Accepted for compatibility with instantaneous data; not enforced
    pub duration: i32,
}

impl TimeSeriesPoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        TimeSeriesPoint {
            date,
            value,
            units: String::new(),
            flag: String::new(),
            duration: 0,
        }
    }

    pub fn has_flag(&self) -> bool {
        !self.flag.is_empty()
    }
}
