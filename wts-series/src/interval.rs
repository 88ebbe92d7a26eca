use chrono::{Datelike, Months, NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Base unit of a regular time step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntervalBase {
    Day,
    Month,
    Year,
}

/// A regular time step: base unit plus multiplier (e.g. 1 Month).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeInterval {
    pub base: IntervalBase,
    pub mult: u32,
}

impl TimeInterval {
    pub const DAY: TimeInterval = TimeInterval::new(IntervalBase::Day, 1);
    pub const MONTH: TimeInterval = TimeInterval::new(IntervalBase::Month, 1);
    pub const YEAR: TimeInterval = TimeInterval::new(IntervalBase::Year, 1);

    pub const fn new(base: IntervalBase, mult: u32) -> Self {
        TimeInterval { base, mult }
    }

    /// Truncate a date to the precision of the interval: monthly dates land on
    /// the first of the month, yearly dates on January 1.
    pub fn normalize(&self, date: NaiveDate) -> NaiveDate {
        match self.base {
            IntervalBase::Day => date,
            IntervalBase::Month => date.with_day(1).unwrap_or(date),
            IntervalBase::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
        }
    }

    /// Add `n` intervals (negative to go back) to a normalized date.
    ///
    /// Returns `None` when the result falls outside chrono's supported range.
    pub fn add(&self, date: NaiveDate, n: i64) -> Option<NaiveDate> {
        let date = self.normalize(date);
        let steps = n.checked_mul(i64::from(self.mult))?;
        match self.base {
            IntervalBase::Day => date.checked_add_signed(TimeDelta::try_days(steps)?),
            IntervalBase::Month => shift_months(date, steps),
            IntervalBase::Year => shift_months(date, steps.checked_mul(12)?),
        }
    }

    /// Number of whole intervals from `start` to `end` (negative when `end`
    /// precedes `start`).
    pub fn steps_between(&self, start: NaiveDate, end: NaiveDate) -> i64 {
        let start = self.normalize(start);
        let end = self.normalize(end);
        let raw = match self.base {
            IntervalBase::Day => (end - start).num_days(),
            IntervalBase::Month => {
                i64::from(end.year() - start.year()) * 12 + i64::from(end.month0())
                    - i64::from(start.month0())
            }
            IntervalBase::Year => i64::from(end.year() - start.year()),
        };
        raw / i64::from(self.mult.max(1))
    }
}

fn shift_months(date: NaiveDate, months: i64) -> Option<NaiveDate> {
    let magnitude = u32::try_from(months.unsigned_abs()).ok()?;
    if months >= 0 {
        date.checked_add_months(Months::new(magnitude))
    } else {
        date.checked_sub_months(Months::new(magnitude))
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = match self.base {
            IntervalBase::Day => "Day",
            IntervalBase::Month => "Month",
            IntervalBase::Year => "Year",
        };
        if self.mult == 1 {
            write!(f, "{base}")
        } else {
            write!(f, "{}{base}", self.mult)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TimeInterval;
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_normalize_and_add() {
        let interval = TimeInterval::MONTH;
        assert_eq!(interval.normalize(ymd(2001, 3, 17)), ymd(2001, 3, 1));
        assert_eq!(interval.add(ymd(2001, 11, 30), 3), Some(ymd(2002, 2, 1)));
        assert_eq!(interval.add(ymd(2001, 1, 1), -1), Some(ymd(2000, 12, 1)));
    }

    #[test]
    fn test_steps_between() {
        let interval = TimeInterval::MONTH;
        assert_eq!(interval.steps_between(ymd(2000, 10, 1), ymd(2001, 9, 1)), 11);
        assert_eq!(interval.steps_between(ymd(2001, 9, 1), ymd(2000, 10, 1)), -11);
        assert_eq!(
            TimeInterval::DAY.steps_between(ymd(2024, 2, 28), ymd(2024, 3, 1)),
            2
        );
        assert_eq!(TimeInterval::YEAR.steps_between(ymd(1990, 6, 1), ymd(2000, 1, 1)), 10);
    }

    #[test]
    fn test_display() {
        assert_eq!(TimeInterval::MONTH.to_string(), "Month");
        assert_eq!(
            TimeInterval::new(super::IntervalBase::Day, 7).to_string(),
            "7Day"
        );
    }
}
