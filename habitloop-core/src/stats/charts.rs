//! Chart-series builders.
//!
//! Pure reshaping of already-computed numbers into parallel
//! label/value arrays. Rendering is the caller's concern; nothing here
//! computes anything the other stats modules have not.

use chrono::{Datelike, Duration, NaiveDate};

use crate::format::short_day_label;
use crate::types::{Frequency, Habit};

use super::activity::DayActivity;
use super::lookup::completed_on;
use super::rate::{completion_rate, expected_occurrences};

/// Parallel labels and values for a line or bar chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// Weekday labels, Sunday first, matching the weekday bar chart.
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Daily completion counts over the window as a line series.
///
/// Labels are thinned to every third day (`D/M`) to keep narrow
/// renderings readable; the other slots are empty strings so labels
/// and values stay parallel.
pub fn activity_series(series: &[DayActivity]) -> ChartSeries {
    let labels = series
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            if i % 3 == 0 {
                short_day_label(entry.day)
            } else {
                String::new()
            }
        })
        .collect();
    let values = series.iter().map(|entry| entry.completed as f64).collect();
    ChartSeries { labels, values }
}

/// Completed-record totals per weekday (Sunday..Saturday), for the
/// weekly distribution bar chart.
pub fn weekday_series(habits: &[Habit]) -> ChartSeries {
    let mut totals = [0u64; 7];
    for habit in habits {
        for completion in &habit.completions {
            if !completion.completed {
                continue;
            }
            if let Some(day) = completion.date.day() {
                totals[day.weekday().num_days_from_sunday() as usize] += 1;
            }
        }
    }
    ChartSeries {
        labels: WEEKDAY_LABELS.iter().map(|s| s.to_string()).collect(),
        values: totals.iter().map(|&v| v as f64).collect(),
    }
}

/// Habit counts per frequency.
pub fn frequency_totals(habits: &[Habit]) -> ChartSeries {
    let values = Frequency::ALL
        .iter()
        .map(|freq| habits.iter().filter(|h| h.frequency == *freq).count() as f64)
        .collect();
    ChartSeries {
        labels: Frequency::ALL.iter().map(|f| f.to_string()).collect(),
        values,
    }
}

/// Mean per-habit completion rate per frequency, over an optional
/// window. Frequencies with no habits read 0.
pub fn frequency_rates(habits: &[Habit], range: Option<(NaiveDate, NaiveDate)>) -> ChartSeries {
    let values = Frequency::ALL
        .iter()
        .map(|freq| {
            let rates: Vec<u32> = habits
                .iter()
                .filter(|h| h.frequency == *freq)
                .map(|h| {
                    let observed = observed_count(h, range);
                    completion_rate(observed, expected_occurrences(*freq, range))
                })
                .collect();
            if rates.is_empty() {
                0.0
            } else {
                rates.iter().sum::<u32>() as f64 / rates.len() as f64
            }
        })
        .collect();
    ChartSeries {
        labels: Frequency::ALL.iter().map(|f| f.to_string()).collect(),
        values,
    }
}

/// Per-frequency habits-completed counts over the 7 days ending at
/// `end`, one series per frequency sharing the same day labels.
pub fn last_week_by_frequency(
    habits: &[Habit],
    end: NaiveDate,
) -> Vec<(Frequency, ChartSeries)> {
    let days: Vec<NaiveDate> = (0i64..7).rev().map(|back| end - Duration::days(back)).collect();
    let labels: Vec<String> = days.iter().map(|d| short_day_label(*d)).collect();

    Frequency::ALL
        .iter()
        .map(|freq| {
            let of_freq: Vec<&Habit> = habits.iter().filter(|h| h.frequency == *freq).collect();
            let values = days
                .iter()
                .map(|day| of_freq.iter().filter(|h| completed_on(h, *day)).count() as f64)
                .collect();
            (
                *freq,
                ChartSeries {
                    labels: labels.clone(),
                    values,
                },
            )
        })
        .collect()
}

/// Completed records for a habit, optionally restricted to a window.
pub(crate) fn observed_count(habit: &Habit, range: Option<(NaiveDate, NaiveDate)>) -> i64 {
    let mut days: Vec<NaiveDate> = habit
        .completions
        .iter()
        .filter(|c| c.completed)
        .filter_map(|c| c.date.day())
        .filter(|d| match range {
            Some((start, end)) => *d >= start && *d <= end,
            None => true,
        })
        .collect();
    days.sort_unstable();
    days.dedup();
    days.len() as i64
}
