use crate::missing::MissingDomain;
use chrono::NaiveDate;
use serde::Serialize;

/// Summary statistics over the non-missing values of a series.
///
/// Every field is `None` or zero until at least one non-missing value exists.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TsLimits {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub sum: f64,
    pub non_missing_count: usize,
    pub missing_count: usize,
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    pub non_missing_date1: Option<NaiveDate>,
    pub non_missing_date2: Option<NaiveDate>,
}

impl TsLimits {
    /// Full scan over `(date, value)` pairs in ascending date order.
    pub fn compute<I>(values: I, missing: &MissingDomain) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let mut limits = TsLimits::default();
        for (date, value) in values {
            if missing.contains(value) {
                limits.missing_count += 1;
                continue;
            }
            limits.non_missing_count += 1;
            limits.sum += value;
            if limits.non_missing_date1.is_none() {
                limits.non_missing_date1 = Some(date);
            }
            limits.non_missing_date2 = Some(date);
            if limits.min.map_or(true, |min| value < min) {
                limits.min = Some(value);
                limits.min_date = Some(date);
            }
            if limits.max.map_or(true, |max| value > max) {
                limits.max = Some(value);
                limits.max_date = Some(date);
            }
        }
        if limits.non_missing_count > 0 {
            limits.mean = Some(limits.sum / limits.non_missing_count as f64);
        }
        limits
    }
}

#[cfg(test)]
mod tests {
    use super::TsLimits;
    use crate::missing::MissingDomain;
    use chrono::NaiveDate;

    #[test]
    fn test_limits_skip_missing() {
        let d = |m| NaiveDate::from_ymd_opt(2000, m, 1).unwrap();
        let values = vec![(d(1), f64::NAN), (d(2), 4.0), (d(3), 1.0), (d(4), 7.0), (d(5), f64::NAN)];
        let limits = TsLimits::compute(values, &MissingDomain::default());
        assert_eq!(limits.min, Some(1.0));
        assert_eq!(limits.min_date, Some(d(3)));
        assert_eq!(limits.max, Some(7.0));
        assert_eq!(limits.max_date, Some(d(4)));
        assert_eq!(limits.mean, Some(4.0));
        assert_eq!(limits.non_missing_count, 3);
        assert_eq!(limits.missing_count, 2);
        assert_eq!(limits.non_missing_date1, Some(d(2)));
        assert_eq!(limits.non_missing_date2, Some(d(4)));
    }

    #[test]
    fn test_limits_all_missing() {
        let d = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let limits = TsLimits::compute(vec![(d, -999.0)], &MissingDomain::single(-999.0));
        assert_eq!(limits.mean, None);
        assert_eq!(limits.missing_count, 1);
    }
}
