use crate::interval::TimeInterval;
use chrono::NaiveDate;
use std::mem::replace;

/// A date range iterator that yields each interval step from the start date
/// through the end date (inclusive), in ascending order.
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct DateRange {
    next: Option<NaiveDate>,
    end: NaiveDate,
    interval: TimeInterval,
}

impl DateRange {
    /// Both ends are normalized to the interval precision.
    pub fn new(start: NaiveDate, end: NaiveDate, interval: TimeInterval) -> Self {
        DateRange {
            next: Some(interval.normalize(start)),
            end: interval.normalize(end),
            interval,
        }
    }

    /// A range that yields nothing.
    pub fn empty(interval: TimeInterval) -> Self {
        DateRange {
            next: None,
            end: NaiveDate::MIN,
            interval,
        }
    }
}

impl Iterator for DateRange {
    type Item = NaiveDate;
    fn next(&mut self) -> Option<Self::Item> {
        match self.next {
            Some(current) if current <= self.end => {
                let following = self.interval.add(current, 1);
                replace(&mut self.next, following)
            }
            _ => None,
        }
    }
}
