//! Observation CSV reading and writing.
//!
//! Observation files carry no headers: `station_id,duration,date(YYYYMMDD),value`.
//! Only monthly (`M`) rows are loaded. Non-numeric values (`ART`, `BRT`,
//! `---`) become missing. Written files add a trailing flag column.

use chrono::NaiveDate;
use log::{info, warn};
use std::collections::HashMap;
use std::io::{Read, Write};
use wts_series::{MonthTs, TimeInterval, TimeSeries, TsIdent};
use wts_utils::dates::{format_date_compact, parse_date_compact};

/// Data type given to series read from observation files
pub const DATA_TYPE: &str = "VALUE";
/// Written for missing values
pub const MISSING_TEXT: &str = "---";

struct Row {
    station: String,
    date: NaiveDate,
    value: Option<f64>,
}

/// Read monthly observations into one series per station, each covering
/// the station's first through last observed month.
pub fn read_monthly<R: Read>(reader: R) -> anyhow::Result<HashMap<String, MonthTs>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    let mut skipped = 0u32;
    for result in rdr.records() {
        let r = result?;
        let station = r.get(0).unwrap_or("").trim();
        let duration = r.get(1).unwrap_or("").trim();
        let date = r.get(2).unwrap_or("").trim();
        if station.is_empty() || duration != "M" {
            skipped += 1;
            continue;
        }
        let Ok(date) = parse_date_compact(date) else {
            warn!("Skipping {} row with bad date {:?}", station, date);
            skipped += 1;
            continue;
        };
        rows.push(Row {
            station: station.to_string(),
            date: TimeInterval::MONTH.normalize(date),
            value: r.get(3).and_then(|v| v.trim().parse::<f64>().ok()),
        });
    }

    let mut periods: HashMap<&str, (NaiveDate, NaiveDate)> = HashMap::new();
    for row in &rows {
        periods
            .entry(row.station.as_str())
            .and_modify(|(start, end)| {
                *start = (*start).min(row.date);
                *end = (*end).max(row.date);
            })
            .or_insert((row.date, row.date));
    }

    let mut series = HashMap::new();
    for (station, (start, end)) in periods {
        let ident = TsIdent::new(station, DATA_TYPE, TimeInterval::MONTH);
        series.insert(station.to_string(), MonthTs::with_period(ident, "", start, end)?);
    }
    for row in &rows {
        if let (Some(ts), Some(value)) = (series.get_mut(&row.station), row.value) {
            ts.set_value(row.date, value);
        }
    }
    info!(
        "Loaded {} monthly rows for {} stations, skipped {}",
        rows.len(),
        series.len(),
        skipped
    );
    Ok(series)
}

/// Read monthly observations from a file.
pub fn load_monthly(path: &str) -> anyhow::Result<HashMap<String, MonthTs>> {
    let file = std::fs::File::open(path)
        .map_err(|e| anyhow::anyhow!("Cannot open {}: {}", path, e))?;
    read_monthly(file)
}

/// Write every value of each series, missing values as `---`.
pub fn write_monthly<W: Write>(writer: W, series: &[&MonthTs]) -> anyhow::Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    for ts in series {
        let station = &ts.ident().location;
        for date in ts.dates() {
            let value = ts.value(date);
            let value = if ts.is_missing(value) {
                MISSING_TEXT.to_string()
            } else {
                value.to_string()
            };
            let compact = format_date_compact(&date);
            wtr.write_record([
                station.as_str(),
                "M",
                compact.as_str(),
                value.as_str(),
                ts.flag(date).unwrap_or(""),
            ])?;
        }
    }
    wtr.flush()?;
    Ok(())
}

/// Look up stations by id, failing on the first one not loaded.
pub fn select<'a>(
    series: &'a HashMap<String, MonthTs>,
    stations: &[String],
) -> anyhow::Result<Vec<&'a MonthTs>> {
    stations
        .iter()
        .map(|station| {
            series
                .get(station)
                .ok_or_else(|| anyhow::anyhow!("Station {} not found in input", station))
        })
        .collect()
}
