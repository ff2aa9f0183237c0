//! Formatting helpers shared by the CLI and charts.

use chrono::{Datelike, NaiveDate};

/// Format a day as `DD/MM/YYYY` for display.
pub fn format_day(day: NaiveDate) -> String {
    day.format("%d/%m/%Y").to_string()
}

/// Short `D/M` label used on chart axes.
pub fn short_day_label(day: NaiveDate) -> String {
    format!("{}/{}", day.day(), day.month())
}

/// Format a whole-percentage rate.
pub fn format_rate(rate: u32) -> String {
    format!("{rate}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_formats() {
        let day = NaiveDate::parse_from_str("2024-05-03", "%Y-%m-%d").unwrap();
        assert_eq!(format_day(day), "03/05/2024");
        assert_eq!(short_day_label(day), "3/5");
        assert_eq!(format_rate(57), "57%");
    }
}
