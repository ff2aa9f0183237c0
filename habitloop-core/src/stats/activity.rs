//! Daily-activity aggregation: success-rate series, best and worst day.

use chrono::NaiveDate;

use crate::types::Habit;

use super::dates::days_between;
use super::lookup::completed_on;

/// One day of the activity window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayActivity {
    pub day: NaiveDate,
    /// Habits with a qualifying completion on this day.
    pub completed: usize,
    /// Habits considered active this day.
    pub total: usize,
    /// `round(completed / total * 100)`, 0 when total is 0.
    pub rate: u32,
}

/// A day paired with its success rate, for best/worst reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySummary {
    pub day: NaiveDate,
    pub rate: u32,
}

/// Per-day completed/total counts over an inclusive window, ascending.
pub fn daily_activity(habits: &[Habit], start: NaiveDate, end: NaiveDate) -> Vec<DayActivity> {
    days_between(start, end)
        .map(|day| {
            let total = habits.len();
            let completed = habits.iter().filter(|h| completed_on(h, day)).count();
            let rate = if total == 0 {
                0
            } else {
                (completed as f64 / total as f64 * 100.0).round() as u32
            };
            DayActivity {
                day,
                completed,
                total,
                rate,
            }
        })
        .collect()
}

/// Best and worst day of a window.
///
/// Best starts from a sentinel rate of 0, so a window with no activity
/// yields no best day; worst starts from 100, so an all-perfect window
/// yields no worst day. Ties keep the first-encountered day in
/// ascending date order (strict comparisons).
pub fn best_and_worst(series: &[DayActivity]) -> (Option<DaySummary>, Option<DaySummary>) {
    let mut best: Option<DaySummary> = None;
    let mut worst: Option<DaySummary> = None;

    for entry in series {
        if entry.rate > best.map_or(0, |b| b.rate) {
            best = Some(DaySummary {
                day: entry.day,
                rate: entry.rate,
            });
        }
        if entry.rate < worst.map_or(100, |w| w.rate) {
            worst = Some(DaySummary {
                day: entry.day,
                rate: entry.rate,
            });
        }
    }

    (best, worst)
}
