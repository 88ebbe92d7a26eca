//! Shared utility functions for WTS crates.

/// Date utility functions
pub mod dates {
    use anyhow::{anyhow, Context};
    use chrono::{Datelike, NaiveDate};

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Format a NaiveDate as "YYYYMMDD", the observation file format
    pub fn format_date_compact(date: &NaiveDate) -> String {
        date.format("%Y%m%d").to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s, "%Y-%m-%d")?)
    }

    /// Parse a date string in "YYYYMMDD" format
    pub fn parse_date_compact(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s, "%Y%m%d")?)
    }

    /// Parse "YYYY-MM" (or a full "YYYY-MM-DD") into the first of that month
    pub fn parse_year_month(s: &str) -> anyhow::Result<NaiveDate> {
        let s = s.trim();
        if let Ok(date) = parse_date(s) {
            return NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
                .ok_or_else(|| anyhow!("Invalid month: {}", s));
        }
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| anyhow!("Expected YYYY-MM, got {}", s))?;
        let year: i32 = year.parse().with_context(|| format!("Invalid year in {}", s))?;
        let month: u32 = month.parse().with_context(|| format!("Invalid month in {}", s))?;
        NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| anyhow!("Invalid month: {}", s))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_format_and_parse() {
            let date = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
            let formatted = format_date(&date);
            assert_eq!(formatted, "2023-06-15");
            let parsed = parse_date(&formatted).unwrap();
            assert_eq!(parsed, date);
        }

        #[test]
        fn test_compact_format() {
            let date = NaiveDate::from_ymd_opt(2022, 11, 1).unwrap();
            assert_eq!(format_date_compact(&date), "20221101");
            assert_eq!(parse_date_compact("20221101").unwrap(), date);
            assert!(parse_date_compact("2022-11-01").is_err());
        }

        #[test]
        fn test_parse_year_month() {
            let first = NaiveDate::from_ymd_opt(1995, 10, 1).unwrap();
            assert_eq!(parse_year_month("1995-10").unwrap(), first);
            assert_eq!(parse_year_month("1995-10-17").unwrap(), first);
            assert!(parse_year_month("1995-13").is_err());
            assert!(parse_year_month("1995").is_err());
        }
    }
}
