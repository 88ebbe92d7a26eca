//! Command implementations for the WTS CLI.
//!
//! Provides subcommands that load monthly observation CSVs, analyze
//! regression relationships between stations, and fill gaps in a target
//! station from its best reference stations.

use anyhow::bail;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use serde::de::DeserializeOwned;
use wts_series::YearType;

pub mod analyze;
pub mod fill;
pub mod loader;

#[derive(Subcommand)]
pub enum Command {
    /// Fit regression relationships between a dependent station and references
    Analyze(analyze::AnalyzeArgs),

    /// Fill missing values of a station from its best reference stations
    Fill(fill::FillArgs),
}

/// Restricts a command to a range of years.
#[derive(Args, Debug, Clone, Default)]
pub struct YearRange {
    /// First year to include
    #[arg(long)]
    pub start_year: Option<i32>,

    /// Last year to include
    #[arg(long)]
    pub end_year: Option<i32>,

    /// How years are counted: calendar, water (Oct-Sep) or nov-oct
    #[arg(long, default_value = "calendar", value_parser = parse_year_type)]
    pub year_type: YearType,
}

impl YearRange {
    /// The dates covered, or `None` when no years were given. A missing
    /// bound is taken from the other one.
    pub fn period(&self) -> anyhow::Result<Option<(NaiveDate, NaiveDate)>> {
        let (start, end) = match (self.start_year, self.end_year) {
            (None, None) => return Ok(None),
            (Some(start), None) => (start, start),
            (None, Some(end)) => (end, end),
            (Some(start), Some(end)) => (start, end),
        };
        if start > end {
            bail!("Start year {} is after end year {}", start, end);
        }
        let (Some((first, _)), Some((_, last))) = (
            self.year_type.period_for(start),
            self.year_type.period_for(end),
        ) else {
            bail!("Years {}-{} are out of range", start, end);
        };
        Ok(Some((first, last)))
    }
}

pub fn parse_year_type(s: &str) -> Result<YearType, String> {
    match s.to_ascii_lowercase().as_str() {
        "calendar" => Ok(YearType::Calendar),
        "water" => Ok(YearType::Water),
        "nov-oct" | "novtooct" => Ok(YearType::NovToOct),
        other => Err(format!("unknown year type: {}", other)),
    }
}

/// Read a JSON configuration file.
pub fn load_json<T: DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Cannot read {}: {}", path, e))?;
    Ok(serde_json::from_str(&text)?)
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Analyze(args) => analyze::run_analyze(&args),
        Command::Fill(args) => fill::run_fill(&args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_year_range_period() {
        let range = YearRange {
            start_year: Some(2001),
            end_year: Some(2003),
            year_type: YearType::Water,
        };
        assert_eq!(
            range.period().unwrap(),
            Some((ymd(2000, 10, 1), ymd(2003, 9, 30)))
        );
        assert_eq!(YearRange::default().period().unwrap(), None);

        let single = YearRange {
            start_year: Some(1999),
            ..Default::default()
        };
        assert_eq!(
            single.period().unwrap(),
            Some((ymd(1999, 1, 1), ymd(1999, 12, 31)))
        );

        let inverted = YearRange {
            start_year: Some(2005),
            end_year: Some(2001),
            ..Default::default()
        };
        assert!(inverted.period().is_err());
    }

    #[test]
    fn test_parse_year_type() {
        assert_eq!(parse_year_type("Water"), Ok(YearType::Water));
        assert_eq!(parse_year_type("nov-oct"), Ok(YearType::NovToOct));
        assert!(parse_year_type("fiscal").is_err());
    }
}
