//! Calendar-day normalization and span arithmetic.
//!
//! Completion dates arrive in several representations (bare
//! `YYYY-MM-DD`, RFC 3339 datetimes, datetimes without an offset).
//! [`parse_day`] is the single normalization point; every derivation
//! goes through it so the screens cannot diverge on date matching.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Normalize a date value to a calendar day.
///
/// Tries, in order: bare `YYYY-MM-DD` (anything before a `T` is
/// considered the day part), RFC 3339, and an offset-less
/// `%Y-%m-%dT%H:%M:%S`. Returns `None` for anything unparseable;
/// callers treat that as "no completion", never as an error.
pub fn parse_day(value: &str) -> Option<NaiveDate> {
    let day_part = value.split('T').next().unwrap_or(value);
    if let Ok(day) = NaiveDate::parse_from_str(day_part, "%Y-%m-%d") {
        return Some(day);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date());
    }
    None
}

/// Inclusive number of days between two dates.
///
/// `day_span(d, d)` is 1; a reversed range yields 0.
pub fn day_span(start: NaiveDate, end: NaiveDate) -> i64 {
    ((end - start).num_days() + 1).max(0)
}

/// Iterate every day of an inclusive range, ascending.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    std::iter::successors(Some(start), |d| d.succ_opt()).take_while(move |d| *d <= end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_parse_day_representations() {
        assert_eq!(parse_day("2024-05-01"), Some(day("2024-05-01")));
        assert_eq!(parse_day("2024-05-01T00:00:00Z"), Some(day("2024-05-01")));
        assert_eq!(
            parse_day("2024-05-01T23:59:59-03:00"),
            Some(day("2024-05-01"))
        );
        assert_eq!(parse_day("2024-05-01T10:30:00"), Some(day("2024-05-01")));
    }

    #[test]
    fn test_parse_day_malformed() {
        assert_eq!(parse_day(""), None);
        assert_eq!(parse_day("yesterday"), None);
        assert_eq!(parse_day("2024-13-40"), None);
        assert_eq!(parse_day("01/05/2024"), None);
    }

    #[test]
    fn test_day_span_inclusive() {
        assert_eq!(day_span(day("2024-05-01"), day("2024-05-01")), 1);
        assert_eq!(day_span(day("2024-05-01"), day("2024-05-31")), 31);
        assert_eq!(day_span(day("2024-05-31"), day("2024-05-01")), 0);
    }

    #[test]
    fn test_days_between() {
        let days: Vec<_> = days_between(day("2024-02-27"), day("2024-03-01")).collect();
        assert_eq!(
            days,
            vec![
                day("2024-02-27"),
                day("2024-02-28"),
                day("2024-02-29"),
                day("2024-03-01"),
            ]
        );
        assert_eq!(days_between(day("2024-03-01"), day("2024-02-01")).count(), 0);
    }
}
