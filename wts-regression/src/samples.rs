//! Pairing of dependent and independent values for one equation.

use crate::config::{RegressionConfig, RegressionMethod};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;
use wts_series::{DateRange, TimeSeries};

/// Samples for one equation. `x1`/`y1` are the overlapping pairs (N1) in
/// transformed units, `x1_raw`/`y1_raw` the same pairs before the
/// transform, `x2` the independent-only values (N2, MOVE.2 only).
#[derive(Debug, Default, Clone)]
pub(crate) struct SampleSet {
    pub x1: Vec<f64>,
    pub y1: Vec<f64>,
    pub x1_raw: Vec<f64>,
    pub y1_raw: Vec<f64>,
    pub x2: Vec<f64>,
}

impl SampleSet {
    pub fn n1(&self) -> usize {
        self.x1.len()
    }
}

fn in_equation(date: NaiveDate, month: Option<u32>, config: &RegressionConfig) -> bool {
    match month {
        Some(month) => date.month() == month,
        None => config.includes_month(date.month()),
    }
}

/// Collect the samples for one equation; `month` restricts them to a single
/// calendar month.
pub(crate) fn extract(
    dependent: &dyn TimeSeries,
    independent: &dyn TimeSeries,
    config: &RegressionConfig,
    month: Option<u32>,
) -> SampleSet {
    let mut samples = SampleSet::default();
    let transform = config.transformation;
    let le_zero = config.le_zero_log_value;
    let interval = dependent.interval();

    let mut paired_dates = BTreeSet::new();
    if let Some((start, end)) = config.dependent_period.or_else(|| dependent.period()) {
        for date in DateRange::new(start, end, interval) {
            if !in_equation(date, month, config) {
                continue;
            }
            let y = dependent.value(date);
            let x = independent.value(date);
            if dependent.is_missing(y) || independent.is_missing(x) {
                continue;
            }
            samples.x1_raw.push(x);
            samples.y1_raw.push(y);
            samples.x1.push(transform.apply(x, le_zero));
            samples.y1.push(transform.apply(y, le_zero));
            paired_dates.insert(date);
        }
    }

    if config.method != RegressionMethod::Move2 {
        return samples;
    }
    if let Some((start, end)) = config.independent_period.or_else(|| independent.period()) {
        for date in DateRange::new(start, end, interval) {
            if !in_equation(date, month, config) || paired_dates.contains(&date) {
                continue;
            }
            let x = independent.value(date);
            if independent.is_missing(x) {
                continue;
            }
            samples.x2.push(transform.apply(x, le_zero));
        }
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::extract;
    use crate::config::{RegressionConfig, RegressionMethod, Transformation};
    use chrono::NaiveDate;
    use wts_series::{MonthTs, TimeInterval, TimeSeries, TsIdent};

    fn ymd(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn series(name: &str, values: &[f64]) -> MonthTs {
        let ident = TsIdent::new(name, "FLOW", TimeInterval::MONTH);
        let end = TimeInterval::MONTH.add(ymd(2000, 1), values.len() as i64 - 1).unwrap();
        let mut ts = MonthTs::with_period(ident, "CFS", ymd(2000, 1), end).unwrap();
        for (i, value) in values.iter().enumerate() {
            ts.set_value(TimeInterval::MONTH.add(ymd(2000, 1), i as i64).unwrap(), *value);
        }
        ts
    }

    #[test]
    fn test_pairs_skip_missing_on_either_side() {
        let y = series("Y", &[1.0, f64::NAN, 3.0, 4.0]);
        let x = series("X", &[10.0, 20.0, f64::NAN, 40.0]);
        let samples = extract(&y, &x, &RegressionConfig::default(), None);
        assert_eq!(samples.x1, vec![10.0, 40.0]);
        assert_eq!(samples.y1, vec![1.0, 4.0]);
        assert!(samples.x2.is_empty());
    }

    #[test]
    fn test_move2_collects_independent_only_values() {
        let y = series("Y", &[1.0, f64::NAN, 3.0, f64::NAN]);
        let x = series("X", &[10.0, 20.0, 30.0, 40.0, 50.0]);
        let config = RegressionConfig {
            method: RegressionMethod::Move2,
            ..Default::default()
        };
        let samples = extract(&y, &x, &config, None);
        assert_eq!(samples.x1, vec![10.0, 30.0]);
        assert_eq!(samples.x2, vec![20.0, 40.0, 50.0]);
    }

    #[test]
    fn test_log_transform_keeps_raw_values() {
        let y = series("Y", &[100.0, 0.0]);
        let x = series("X", &[10.0, 1000.0]);
        let config = RegressionConfig {
            transformation: Transformation::Log10,
            ..Default::default()
        };
        let samples = extract(&y, &x, &config, None);
        assert_eq!(samples.y1_raw, vec![100.0, 0.0]);
        assert!((samples.y1[0] - 2.0).abs() < 1e-12);
        assert!((samples.y1[1] + 3.0).abs() < 1e-12);
        assert!((samples.x1[1] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_month_restriction() {
        let values: Vec<f64> = (1..=24).map(f64::from).collect();
        let y = series("Y", &values);
        let x = series("X", &values);
        let samples = extract(&y, &x, &RegressionConfig::default(), Some(3));
        assert_eq!(samples.y1, vec![3.0, 15.0]);

        let config = RegressionConfig {
            analysis_months: Some(vec![1, 2]),
            ..Default::default()
        };
        let samples = extract(&y, &x, &config, None);
        assert_eq!(samples.n1(), 4);
    }

    #[test]
    fn test_analysis_windows_restrict_pairs_and_extension_separately() {
        let y = series("Y", &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let x = series("X", &[10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0]);
        let mut config = RegressionConfig {
            method: RegressionMethod::Move2,
            dependent_period: Some((ymd(2000, 2), ymd(2000, 4))),
            ..Default::default()
        };

        // N2 defaults to the whole independent period, minus paired months
        let samples = extract(&y, &x, &config, None);
        assert_eq!(samples.x1, vec![20.0, 30.0, 40.0]);
        assert_eq!(samples.y1, vec![2.0, 3.0, 4.0]);
        assert_eq!(samples.x2, vec![10.0, 50.0, 60.0, 70.0, 80.0]);

        config.independent_period = Some((ymd(2000, 4), ymd(2000, 7)));
        let samples = extract(&y, &x, &config, None);
        assert_eq!(samples.x1, vec![20.0, 30.0, 40.0]);
        assert_eq!(samples.x2, vec![50.0, 60.0, 70.0]);

        // the independent window never widens the paired samples
        config.dependent_period = None;
        config.independent_period = Some((ymd(2000, 7), ymd(2000, 8)));
        let samples = extract(&y, &x, &config, None);
        assert_eq!(samples.n1(), 6);
        assert_eq!(samples.x2, vec![70.0, 80.0]);
    }
}
