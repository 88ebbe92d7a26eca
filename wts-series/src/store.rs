//! Indexed fixed-interval storage.
//!
//! Values live in a flat row-major grid: one row per calendar year spanned by
//! the period and `Layout::COLUMNS` cells per row. A date resolves to its
//! `(row, column)` position arithmetically, so reads and writes are O(1).

use crate::{
    date_range::DateRange,
    error::{Result, SeriesError},
    genesis::Genesis,
    ident::TsIdent,
    interval::TimeInterval,
    limits::TsLimits,
    missing::MissingDomain,
    point::TimeSeriesPoint,
};
use chrono::{Datelike, NaiveDate};
use log::debug;
use std::marker::PhantomData;

/// Maps a date to its column within a year row.
pub trait Layout: Send + Sync + 'static {
    const COLUMNS: usize;
    const INTERVAL: TimeInterval;
    fn column(date: NaiveDate) -> usize;
}

/// Twelve columns per year, one per month.
#[derive(Debug, Clone, Copy, Default)]
pub struct Monthly;

impl Layout for Monthly {
    const COLUMNS: usize = 12;
    const INTERVAL: TimeInterval = TimeInterval::MONTH;

    fn column(date: NaiveDate) -> usize {
        date.month0() as usize
    }
}

/// 366 columns per year laid out on a leap-year calendar, so a given
/// month/day always lands in the same column. Feb 29 is simply never
/// addressed in non-leap years.
#[derive(Debug, Clone, Copy, Default)]
pub struct Daily;

impl Layout for Daily {
    const COLUMNS: usize = 366;
    const INTERVAL: TimeInterval = TimeInterval::DAY;

    fn column(date: NaiveDate) -> usize {
        let ordinal0 = date.ordinal0() as usize;
        if !is_leap_year(date.year()) && date.month() >= 3 {
            ordinal0 + 1
        } else {
            ordinal0
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

/// Capability interface shared by every storage variant. Callers (the
/// regression analyzer, the gap filler, loaders) depend only on this trait.
pub trait TimeSeries: Send + Sync {
    fn ident(&self) -> &TsIdent;

    fn units(&self) -> &str;

    fn interval(&self) -> TimeInterval;

    /// Inclusive `(date1, date2)`, `None` until storage is allocated.
    fn period(&self) -> Option<(NaiveDate, NaiveDate)>;

    fn missing(&self) -> &MissingDomain;

    fn is_missing(&self, value: f64) -> bool {
        self.missing().contains(value)
    }

    /// The stored value, or the missing value when `date` is outside the
    /// period.
    fn value(&self, date: NaiveDate) -> f64;

    fn flag(&self, date: NaiveDate) -> Option<&str>;

    /// Outside the period this is a silent no-op. Clears any flag on the cell.
    fn set_value(&mut self, date: NaiveDate, value: f64);

    fn set_value_with_flag(&mut self, date: NaiveDate, value: f64, flag: &str, duration: i32);

    fn allocate(
        &mut self,
        date1: Option<NaiveDate>,
        date2: Option<NaiveDate>,
        interval_mult: u32,
    ) -> Result<()>;

    fn change_period(&mut self, date1: NaiveDate, date2: NaiveDate) -> Result<()>;

    /// Recompute limits if the data changed since the last refresh.
    fn refresh(&mut self) -> &TsLimits;

    /// Limits as of the last refresh.
    fn limits(&self) -> &TsLimits;

    fn is_dirty(&self) -> bool;

    fn genesis(&self) -> &Genesis;

    fn genesis_mut(&mut self) -> &mut Genesis;

    /// Number of interval steps spanning the period.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn point(&self, date: NaiveDate) -> TimeSeriesPoint {
        let date = self.interval().normalize(date);
        TimeSeriesPoint {
            date,
            value: self.value(date),
            units: self.units().to_string(),
            flag: self.flag(date).unwrap_or_default().to_string(),
            duration: 0,
        }
    }

    /// Every date of the period in ascending order.
    fn dates(&self) -> DateRange {
        match self.period() {
            Some((date1, date2)) => DateRange::new(date1, date2, self.interval()),
            None => DateRange::empty(self.interval()),
        }
    }

    fn points(&self) -> Box<dyn Iterator<Item = TimeSeriesPoint> + '_> {
        Box::new(self.dates().map(move |date| self.point(date)))
    }
}

/// Row-per-year storage parameterized by its column layout.
#[derive(Debug, Clone)]
pub struct RowColumnStore<L: Layout> {
    ident: TsIdent,
    units: String,
    period: Option<(NaiveDate, NaiveDate)>,
    missing: MissingDomain,
    data: Vec<f64>,
    flags: Option<Vec<String>>,
    dirty: bool,
    limits: TsLimits,
    genesis: Genesis,
    layout: PhantomData<L>,
}

pub type MonthTs = RowColumnStore<Monthly>;
pub type DayTs = RowColumnStore<Daily>;

impl<L: Layout> RowColumnStore<L> {
    /// An unallocated series; call `allocate` before storing values.
    pub fn new(ident: TsIdent, units: &str) -> Self {
        RowColumnStore {
            ident,
            units: units.to_string(),
            period: None,
            missing: MissingDomain::default(),
            data: Vec::new(),
            flags: None,
            dirty: true,
            limits: TsLimits::default(),
            genesis: Genesis::new(),
            layout: PhantomData,
        }
    }

    pub fn with_period(ident: TsIdent, units: &str, date1: NaiveDate, date2: NaiveDate) -> Result<Self> {
        let mut series = Self::new(ident, units);
        series.allocate(Some(date1), Some(date2), 1)?;
        Ok(series)
    }

    /// Replace the missing domain. Stored data are not rewritten.
    pub fn set_missing(&mut self, missing: MissingDomain) {
        self.missing = missing;
        self.dirty = true;
    }

    pub fn set_units(&mut self, units: &str) {
        self.units = units.to_string();
    }

    /// `(row, column)` of a date within the current period.
    pub fn position(&self, date: NaiveDate) -> Option<(usize, usize)> {
        self.period
            .and_then(|period| Self::position_in(period, L::INTERVAL.normalize(date)))
    }

    /// Allocated year rows.
    pub fn rows(&self) -> usize {
        self.data.len() / L::COLUMNS
    }

    fn position_in(period: (NaiveDate, NaiveDate), date: NaiveDate) -> Option<(usize, usize)> {
        let (date1, date2) = period;
        if date < date1 || date > date2 {
            return None;
        }
        let row = usize::try_from(date.year() - date1.year()).ok()?;
        Some((row, L::column(date)))
    }

    fn index_in(period: (NaiveDate, NaiveDate), date: NaiveDate) -> Option<usize> {
        Self::position_in(period, date).map(|(row, column)| row * L::COLUMNS + column)
    }

    fn index(&self, date: NaiveDate) -> Option<usize> {
        self.period
            .and_then(|period| Self::index_in(period, L::INTERVAL.normalize(date)))
    }

    fn checked_period(
        date1: Option<NaiveDate>,
        date2: Option<NaiveDate>,
        interval_mult: u32,
    ) -> Result<(NaiveDate, NaiveDate)> {
        let (date1, date2) = match (date1, date2) {
            (Some(date1), Some(date2)) => (date1, date2),
            _ => return Err(SeriesError::PeriodNotSet),
        };
        if interval_mult != 1 {
            return Err(SeriesError::UnsupportedMultiplier(interval_mult));
        }
        let date1 = L::INTERVAL.normalize(date1);
        let date2 = L::INTERVAL.normalize(date2);
        if date1 > date2 {
            return Err(SeriesError::InvalidPeriod {
                start: date1,
                end: date2,
            });
        }
        Ok((date1, date2))
    }

    fn cells_for(period: (NaiveDate, NaiveDate)) -> usize {
        let years = (period.1.year() - period.0.year() + 1) as usize;
        years * L::COLUMNS
    }
}

impl<L: Layout> TimeSeries for RowColumnStore<L> {
    fn ident(&self) -> &TsIdent {
        &self.ident
    }

    fn units(&self) -> &str {
        &self.units
    }

    fn interval(&self) -> TimeInterval {
        L::INTERVAL
    }

    fn period(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.period
    }

    fn missing(&self) -> &MissingDomain {
        &self.missing
    }

    fn value(&self, date: NaiveDate) -> f64 {
        match self.index(date) {
            Some(i) => self.data[i],
            None => self.missing.value(),
        }
    }

    fn flag(&self, date: NaiveDate) -> Option<&str> {
        let i = self.index(date)?;
        self.flags
            .as_ref()
            .map(|flags| flags[i].as_str())
            .filter(|flag| !flag.is_empty())
    }

    fn set_value(&mut self, date: NaiveDate, value: f64) {
        let Some(i) = self.index(date) else {
            return;
        };
        if let Some(flags) = self.flags.as_mut() {
            flags[i].clear();
        }
        self.data[i] = value;
        self.dirty = true;
    }

    fn set_value_with_flag(&mut self, date: NaiveDate, value: f64, flag: &str, _duration: i32) {
        let Some(i) = self.index(date) else {
            return;
        };
        if self.flags.is_none() && !flag.is_empty() {
            self.flags = Some(vec![String::new(); self.data.len()]);
        }
        if let Some(flags) = self.flags.as_mut() {
            flags[i] = flag.to_string();
        }
        self.data[i] = value;
        self.dirty = true;
    }

    fn allocate(
        &mut self,
        date1: Option<NaiveDate>,
        date2: Option<NaiveDate>,
        interval_mult: u32,
    ) -> Result<()> {
        let period = Self::checked_period(date1, date2, interval_mult)?;
        self.data = vec![self.missing.value(); Self::cells_for(period)];
        self.flags = None;
        self.period = Some(period);
        self.dirty = true;
        debug!(
            "Allocated {} rows for {} ({} - {})",
            self.rows(),
            self.ident.name(),
            period.0,
            period.1
        );
        Ok(())
    }

    fn change_period(&mut self, date1: NaiveDate, date2: NaiveDate) -> Result<()> {
        let new_period = Self::checked_period(Some(date1), Some(date2), 1)?;
        let Some(old_period) = self.period else {
            return self.allocate(Some(date1), Some(date2), 1);
        };
        if old_period == new_period {
            return Ok(());
        }

        let cells = Self::cells_for(new_period);
        let mut data = vec![self.missing.value(); cells];
        let mut flags = self.flags.as_ref().map(|_| vec![String::new(); cells]);
        let overlap_start = old_period.0.max(new_period.0);
        let overlap_end = old_period.1.min(new_period.1);
        for date in DateRange::new(overlap_start, overlap_end, L::INTERVAL) {
            let (Some(old), Some(new)) = (
                Self::index_in(old_period, date),
                Self::index_in(new_period, date),
            ) else {
                continue;
            };
            data[new] = self.data[old];
            if let (Some(new_flags), Some(old_flags)) = (flags.as_mut(), self.flags.as_mut()) {
                new_flags[new] = std::mem::take(&mut old_flags[old]);
            }
        }

        self.data = data;
        self.flags = flags;
        self.period = Some(new_period);
        self.dirty = true;
        self.genesis.push(format!(
            "Changed period from {} - {} to {} - {}",
            old_period.0, old_period.1, new_period.0, new_period.1
        ));
        Ok(())
    }

    fn refresh(&mut self) -> &TsLimits {
        if self.dirty {
            let limits = TsLimits::compute(
                self.dates().map(|date| (date, self.value(date))),
                &self.missing,
            );
            self.limits = limits;
            self.dirty = false;
        }
        &self.limits
    }

    fn limits(&self) -> &TsLimits {
        &self.limits
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn genesis(&self) -> &Genesis {
        &self.genesis
    }

    fn genesis_mut(&mut self) -> &mut Genesis {
        &mut self.genesis
    }

    fn len(&self) -> usize {
        match self.period {
            Some((date1, date2)) => (L::INTERVAL.steps_between(date1, date2) + 1) as usize,
            None => 0,
        }
    }
}
