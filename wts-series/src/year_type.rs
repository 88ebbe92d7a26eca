use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// The 12-month window used to group a record into years.
///
/// California's water year runs from October 1 to September 30 and is the
/// official timeframe used by water managers to compile and compare
/// hydrologic records. Non-calendar years are named by the calendar year in
/// which they end, so October 2022 belongs to water year 2023.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum YearType {
    #[default]
    Calendar,
    Water,
    NovToOct,
}

impl YearType {
    /// Calendar month (1-12) on which the year starts.
    pub fn start_month(self) -> u32 {
        match self {
            YearType::Calendar => 1,
            YearType::Water => 10,
            YearType::NovToOct => 11,
        }
    }

    /// The year a date belongs to under this year type.
    pub fn year_for(self, date: NaiveDate) -> i32 {
        if self.start_month() != 1 && date.month() >= self.start_month() {
            date.year() + 1
        } else {
            date.year()
        }
    }

    /// First and last day of the given year.
    pub fn period_for(self, year: i32) -> Option<(NaiveDate, NaiveDate)> {
        let start_month = self.start_month();
        let start = if start_month == 1 {
            NaiveDate::from_ymd_opt(year, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year - 1, start_month, 1)?
        };
        let next_start = if start_month == 1 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, start_month, 1)?
        };
        Some((start, next_start.pred_opt()?))
    }

    /// Zero-based position of a calendar month within the year
    /// (October is 0 for water years).
    pub fn month_position(self, month: u32) -> u32 {
        (month + 12 - self.start_month()) % 12
    }
}
