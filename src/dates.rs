use anyhow::{Context, Result};
use chrono::NaiveDate;

/// Canonical date key format: `YYYY-MM-DD`, timezone-naive local calendar date.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Format a calendar date as its canonical `YYYY-MM-DD` key.
pub fn format_date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parse a canonical `YYYY-MM-DD` date key.
pub fn parse_date_key(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_KEY_FORMAT)
        .with_context(|| format!("Invalid date '{}' (expected YYYY-MM-DD)", s))
}

/// All days from `start` to `end` inclusive, ascending.
/// An inverted range (`start > end`) yields an empty vector.
pub fn days_in_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut day = start;
    while day <= end {
        days.push(day);
        day = match day.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }
    days
}

/// First and last day of the given month.
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .with_context(|| format!("Invalid month {}-{:02}", year, month))?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .with_context(|| format!("Invalid month {}-{:02}", year, month))?;
    let last = next_first
        .pred_opt()
        .context("Date arithmetic out of range")?;
    Ok((first, last))
}

/// Parse a `YYYY-MM` string into (year, month).
pub fn parse_month(s: &str) -> Result<(i32, u32)> {
    let (year_str, month_str) = s
        .trim()
        .split_once('-')
        .with_context(|| format!("Invalid month '{}' (expected YYYY-MM)", s))?;
    let year: i32 = year_str
        .parse()
        .with_context(|| format!("Invalid year in '{}'", s))?;
    let month: u32 = month_str
        .parse()
        .with_context(|| format!("Invalid month in '{}'", s))?;
    if !(1..=12).contains(&month) {
        anyhow::bail!("Month must be 01-12 in '{}'", s);
    }
    Ok((year, month))
}

/// Short human-readable form for listings, e.g. "Fri Mar 1".
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%a %b %-d").to_string()
}

/// Month header form, e.g. "March 2024".
pub fn format_month_header(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_date_key_roundtrip() {
        let date = d(2024, 3, 1);
        assert_eq!(format_date_key(date), "2024-03-01");
        assert_eq!(parse_date_key("2024-03-01").unwrap(), date);
    }

    #[test]
    fn test_parse_date_key_rejects_garbage() {
        assert!(parse_date_key("not-a-date").is_err());
        assert!(parse_date_key("2024-13-01").is_err());
        assert!(parse_date_key("2024/03/01").is_err());
    }

    #[test]
    fn test_days_in_range_inclusive() {
        let days = days_in_range(d(2024, 2, 28), d(2024, 3, 2));
        assert_eq!(
            days,
            vec![d(2024, 2, 28), d(2024, 2, 29), d(2024, 3, 1), d(2024, 3, 2)]
        );
    }

    #[test]
    fn test_days_in_range_single_day() {
        let days = days_in_range(d(2024, 3, 1), d(2024, 3, 1));
        assert_eq!(days, vec![d(2024, 3, 1)]);
    }

    #[test]
    fn test_days_in_range_inverted_is_empty() {
        assert!(days_in_range(d(2024, 3, 2), d(2024, 3, 1)).is_empty());
    }

    #[test]
    fn test_month_bounds_leap_february() {
        let (first, last) = month_bounds(2024, 2).unwrap();
        assert_eq!(first, d(2024, 2, 1));
        assert_eq!(last, d(2024, 2, 29));
    }

    #[test]
    fn test_month_bounds_december_wraps_year() {
        let (first, last) = month_bounds(2024, 12).unwrap();
        assert_eq!(first, d(2024, 12, 1));
        assert_eq!(last, d(2024, 12, 31));
    }

    #[test]
    fn test_month_bounds_rejects_invalid() {
        assert!(month_bounds(2024, 13).is_err());
        assert!(month_bounds(2024, 0).is_err());
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2024-03").unwrap(), (2024, 3));
        assert_eq!(parse_month("2025-12").unwrap(), (2025, 12));
        assert!(parse_month("2024").is_err());
        assert!(parse_month("2024-00").is_err());
        assert!(parse_month("2024-13").is_err());
    }

    #[test]
    fn test_format_display_date() {
        let date = d(2024, 3, 1);
        assert_eq!(date.weekday().to_string(), "Fri");
        assert_eq!(format_display_date(date), "Fri Mar 1");
    }
}
