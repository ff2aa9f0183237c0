//! Opportunity and completion-rate arithmetic.

use chrono::NaiveDate;

use crate::types::Frequency;

use super::dates::day_span;

/// Expected occurrences ("opportunities") of a habit within a range.
///
/// For an inclusive range of `D` days this is `D` for daily,
/// `ceil(D/7)` for weekly and `ceil(D/30)` for monthly. The weekly and
/// monthly figures are deliberately coarse; no per-habit due-date
/// schedule exists, so a calendar-aware count would be guessing.
/// Without a range, fixed single-period defaults apply (30/4/1).
pub fn expected_occurrences(frequency: Frequency, range: Option<(NaiveDate, NaiveDate)>) -> i64 {
    match range {
        Some((start, end)) => {
            let days = day_span(start, end);
            if days == 0 {
                return 0;
            }
            match frequency {
                Frequency::Daily => days,
                Frequency::Weekly => (days + 6) / 7,
                Frequency::Monthly => (days + 29) / 30,
            }
        }
        None => frequency.default_expected_occurrences(),
    }
}

/// Completion rate as a whole percentage, clamped to 100.
///
/// Zero expected occurrences yields 0, never a division error.
pub fn completion_rate(observed: i64, expected: i64) -> u32 {
    if expected <= 0 {
        return 0;
    }
    let rate = (observed as f64 / expected as f64 * 100.0).round() as i64;
    rate.clamp(0, 100) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_expected_daily() {
        let range = Some((day("2024-05-01"), day("2024-05-30")));
        assert_eq!(expected_occurrences(Frequency::Daily, range), 30);
    }

    #[test]
    fn test_expected_weekly_rounds_up() {
        let range = Some((day("2024-05-01"), day("2024-05-08"))); // 8 days
        assert_eq!(expected_occurrences(Frequency::Weekly, range), 2);
        let range = Some((day("2024-05-01"), day("2024-05-07"))); // exactly 7
        assert_eq!(expected_occurrences(Frequency::Weekly, range), 1);
    }

    #[test]
    fn test_expected_monthly_rounds_up() {
        let range = Some((day("2024-05-01"), day("2024-06-15"))); // 46 days
        assert_eq!(expected_occurrences(Frequency::Monthly, range), 2);
    }

    #[test]
    fn test_expected_defaults_without_range() {
        assert_eq!(expected_occurrences(Frequency::Daily, None), 30);
        assert_eq!(expected_occurrences(Frequency::Weekly, None), 4);
        assert_eq!(expected_occurrences(Frequency::Monthly, None), 1);
    }

    #[test]
    fn test_expected_reversed_range_is_zero() {
        let range = Some((day("2024-05-31"), day("2024-05-01")));
        assert_eq!(expected_occurrences(Frequency::Daily, range), 0);
    }

    #[test]
    fn test_rate_no_division_error() {
        assert_eq!(completion_rate(0, 0), 0);
        assert_eq!(completion_rate(5, 0), 0);
    }

    #[test]
    fn test_rate_rounds_and_clamps() {
        assert_eq!(completion_rate(5, 10), 50);
        assert_eq!(completion_rate(1, 3), 33);
        assert_eq!(completion_rate(2, 3), 67);
        assert_eq!(completion_rate(15, 10), 100); // clamped, not 150
    }
}
