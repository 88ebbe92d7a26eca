use crate::error::{FillError, Result};
use chrono::NaiveDate;
use log::info;
use wts_series::TimeSeries;

/// Linearly interpolate interior runs of missing values.
///
/// A run is filled only when it has a non-missing value on both sides and
/// is at most `max_gap` values long (`0` means no limit). Leading and
/// trailing runs stay missing. Returns the number of values filled.
pub fn fill_interpolate<T: TimeSeries + ?Sized>(
    series: &mut T,
    max_gap: usize,
    flag: Option<&str>,
) -> Result<usize> {
    if series.period().is_none() {
        return Err(FillError::NotAllocated(series.ident().name()));
    }
    let interval = series.interval();
    let known: Vec<(NaiveDate, f64)> = series
        .dates()
        .map(|date| (date, series.value(date)))
        .filter(|&(_, value)| !series.is_missing(value))
        .collect();

    let mut filled = 0;
    for pair in known.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let steps = interval.steps_between(start.0, end.0);
        let gap = (steps - 1) as usize;
        if steps <= 1 || (max_gap > 0 && gap > max_gap) {
            continue;
        }
        let slope = (end.1 - start.1) / steps as f64;
        for i in 1..steps {
            let Some(date) = interval.add(start.0, i) else {
                break;
            };
            let value = start.1 + slope * i as f64;
            match flag {
                Some(flag) => series.set_value_with_flag(date, value, flag, 0),
                None => series.set_value(date, value),
            }
            filled += 1;
        }
    }

    if filled > 0 {
        let name = series.ident().name();
        let limit = match max_gap {
            0 => "no limit".to_string(),
            n => format!("gaps up to {}", n),
        };
        series
            .genesis_mut()
            .push(format!("Filled {} values of {} by linear interpolation ({})", filled, name, limit));
        info!("Interpolated {} values in {}", filled, name);
    }
    Ok(filled)
}
