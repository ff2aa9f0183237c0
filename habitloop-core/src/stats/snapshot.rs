//! Snapshot assembly: filters in, full stats snapshot out.
//!
//! The snapshot is derived state. It is recomputed from scratch on
//! every call, never stored, and never incrementally updated.

use chrono::{Duration, NaiveDate, Utc};

use crate::types::{Frequency, Habit, StatsFilter};

use super::activity::{best_and_worst, daily_activity, DayActivity, DaySummary};
use super::charts::{
    activity_series, frequency_rates, frequency_totals, last_week_by_frequency, observed_count,
    weekday_series, ChartSeries,
};
use super::rate::{completion_rate, expected_occurrences};
use super::streak::longest_streak;

/// Days in the default activity window when the filter has no range.
const DEFAULT_WINDOW_DAYS: i64 = 15;

/// Per-frequency rollup within a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyBreakdown {
    pub frequency: Frequency,
    /// Habits of this frequency in the filtered set.
    pub habits: usize,
    /// Observed completion days summed across those habits.
    pub observed: i64,
    /// Expected occurrences summed across those habits.
    pub expected: i64,
    /// `completion_rate(observed, expected)`.
    pub rate: u32,
}

/// Everything the stats view needs, derived from `(habits, filter)`.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSnapshot {
    /// Habits in the filtered set.
    pub total: usize,
    /// Habits whose observed completions met their expected occurrences.
    pub completed: usize,
    /// Habits with no miss recorded but the expectation not yet met.
    pub pending: usize,
    /// Habits with at least one explicit missed day recorded.
    pub not_completed: usize,
    /// `round(completed / total * 100)`, clamped; 0 for an empty set.
    pub completion_rate: u32,
    pub per_frequency: Vec<FrequencyBreakdown>,
    /// Longest run of consecutive completion days across the set.
    pub longest_streak: u32,
    pub best_day: Option<DaySummary>,
    pub worst_day: Option<DaySummary>,
    /// The inclusive window the activity series covers.
    pub window: (NaiveDate, NaiveDate),
    pub activity: Vec<DayActivity>,
    pub activity_chart: ChartSeries,
    pub weekday_chart: ChartSeries,
    pub frequency_totals: ChartSeries,
    pub frequency_rates: ChartSeries,
    pub week_by_frequency: Vec<(Frequency, ChartSeries)>,
}

/// Compute the stats snapshot for today.
pub fn compute_snapshot(habits: &[Habit], filter: &StatsFilter) -> StatsSnapshot {
    compute_snapshot_at(habits, filter, Utc::now().date_naive())
}

/// Compute the stats snapshot anchored to a given "today".
///
/// Pure in all three arguments: recomputing from unchanged input
/// yields an identical snapshot.
pub fn compute_snapshot_at(
    habits: &[Habit],
    filter: &StatsFilter,
    today: NaiveDate,
) -> StatsSnapshot {
    let range = filter.range();

    // When a range filter is set, every derivation only sees the
    // completions inside it, matching how the backend bounds the
    // completion fetch.
    let habits: Vec<Habit> = habits
        .iter()
        .filter(|h| filter.matches(h))
        .cloned()
        .map(|h| restrict_to_window(h, range))
        .collect();

    let window = range.unwrap_or((today - Duration::days(DEFAULT_WINDOW_DAYS - 1), today));

    let mut completed = 0usize;
    let mut pending = 0usize;
    let mut not_completed = 0usize;
    for habit in &habits {
        let expected = expected_occurrences(habit.frequency, range);
        let observed = observed_count(habit, range);
        let missed = habit
            .completions
            .iter()
            .any(|c| !c.completed && c.date.day().is_some());
        if observed >= expected {
            completed += 1;
        } else if missed {
            not_completed += 1;
        } else {
            pending += 1;
        }
    }

    let per_frequency = Frequency::ALL
        .iter()
        .map(|freq| {
            let of_freq: Vec<&Habit> = habits.iter().filter(|h| h.frequency == *freq).collect();
            let observed: i64 = of_freq.iter().map(|h| observed_count(h, range)).sum();
            let expected =
                expected_occurrences(*freq, range) * of_freq.len() as i64;
            FrequencyBreakdown {
                frequency: *freq,
                habits: of_freq.len(),
                observed,
                expected,
                rate: completion_rate(observed, expected),
            }
        })
        .collect();

    let activity = daily_activity(&habits, window.0, window.1);
    let (best_day, worst_day) = best_and_worst(&activity);

    StatsSnapshot {
        total: habits.len(),
        completed,
        pending,
        not_completed,
        completion_rate: completion_rate(completed as i64, habits.len() as i64),
        per_frequency,
        longest_streak: longest_streak(&habits),
        best_day,
        worst_day,
        window,
        activity_chart: activity_series(&activity),
        weekday_chart: weekday_series(&habits),
        frequency_totals: frequency_totals(&habits),
        frequency_rates: frequency_rates(&habits, range),
        week_by_frequency: last_week_by_frequency(&habits, window.1),
        activity,
    }
}

fn restrict_to_window(mut habit: Habit, range: Option<(NaiveDate, NaiveDate)>) -> Habit {
    if let Some((start, end)) = range {
        habit.completions.retain(|c| match c.date.day() {
            Some(day) => day >= start && day <= end,
            // Invalid dates stay; they are non-matches everywhere anyway.
            None => true,
        });
    }
    habit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HabitCompletion, Tag};

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn habit(id: i64, frequency: Frequency, tags: &[&str], days: &[&str]) -> Habit {
        Habit {
            id,
            name: format!("habit-{id}"),
            description: None,
            frequency,
            created_at: None,
            tags: tags
                .iter()
                .enumerate()
                .map(|(i, name)| Tag {
                    id: i as i64,
                    name: name.to_string(),
                    color: "blue".to_string(),
                    created_at: None,
                })
                .collect(),
            completions: days
                .iter()
                .enumerate()
                .map(|(i, d)| HabitCompletion::on_day(i as i64, id, day(d)))
                .collect(),
        }
    }

    fn full_range(filter: &mut StatsFilter, start: &str, end: &str) {
        filter.start = Some(day(start));
        filter.end = Some(day(end));
    }

    #[test]
    fn test_snapshot_counts_and_streak() {
        let habits = vec![
            habit(1, Frequency::Daily, &[], &["2024-05-01", "2024-05-02", "2024-05-03"]),
            habit(2, Frequency::Weekly, &[], &["2024-05-01"]),
            habit(3, Frequency::Daily, &[], &[]),
        ];
        let mut filter = StatsFilter::default();
        full_range(&mut filter, "2024-05-01", "2024-05-03");

        let snapshot = compute_snapshot_at(&habits, &filter, day("2024-05-03"));

        assert_eq!(snapshot.total, 3);
        // Daily expects 3 in a 3-day window: habit 1 met it, habit 3
        // has nothing recorded (pending). Weekly expects 1: habit 2 met it.
        assert_eq!(snapshot.completed, 2);
        assert_eq!(snapshot.pending, 1);
        assert_eq!(snapshot.not_completed, 0);
        assert_eq!(snapshot.completion_rate, 67);
        assert_eq!(snapshot.longest_streak, 3);
        assert_eq!(snapshot.window, (day("2024-05-01"), day("2024-05-03")));
    }

    #[test]
    fn test_snapshot_missed_day_marks_not_completed() {
        let mut h = habit(1, Frequency::Daily, &[], &["2024-05-01"]);
        h.completions.push(HabitCompletion {
            completed: false,
            ..HabitCompletion::on_day(9, 1, day("2024-05-02"))
        });
        let mut filter = StatsFilter::default();
        full_range(&mut filter, "2024-05-01", "2024-05-03");

        let snapshot = compute_snapshot_at(&[h], &filter, day("2024-05-03"));
        assert_eq!(snapshot.not_completed, 1);
        assert_eq!(snapshot.pending, 0);
    }

    #[test]
    fn test_snapshot_applies_frequency_and_tag_filters() {
        let habits = vec![
            habit(1, Frequency::Daily, &["health"], &["2024-05-01"]),
            habit(2, Frequency::Weekly, &["health"], &["2024-05-01"]),
            habit(3, Frequency::Daily, &["reading"], &["2024-05-01"]),
        ];

        let mut filter = StatsFilter {
            frequency: Some(Frequency::Daily),
            ..Default::default()
        };
        full_range(&mut filter, "2024-05-01", "2024-05-02");
        let snapshot = compute_snapshot_at(&habits, &filter, day("2024-05-02"));
        assert_eq!(snapshot.total, 2);

        let mut filter = StatsFilter {
            tags: Some(vec!["health".to_string()]),
            ..Default::default()
        };
        full_range(&mut filter, "2024-05-01", "2024-05-02");
        let snapshot = compute_snapshot_at(&habits, &filter, day("2024-05-02"));
        assert_eq!(snapshot.total, 2);
    }

    #[test]
    fn test_snapshot_range_restricts_streak() {
        let habits = vec![habit(
            1,
            Frequency::Daily,
            &[],
            &["2024-04-01", "2024-04-02", "2024-04-03", "2024-05-01"],
        )];
        let mut filter = StatsFilter::default();
        full_range(&mut filter, "2024-05-01", "2024-05-05");

        let snapshot = compute_snapshot_at(&habits, &filter, day("2024-05-05"));
        assert_eq!(snapshot.longest_streak, 1);
    }

    #[test]
    fn test_default_window_is_trailing_15_days() {
        let snapshot = compute_snapshot_at(&[], &StatsFilter::default(), day("2024-05-15"));
        assert_eq!(snapshot.window, (day("2024-05-01"), day("2024-05-15")));
        assert_eq!(snapshot.activity.len(), 15);
    }

    #[test]
    fn test_snapshot_is_idempotent() {
        let habits = vec![
            habit(1, Frequency::Daily, &["health"], &["2024-05-01", "2024-05-02"]),
            habit(2, Frequency::Monthly, &[], &["2024-05-03"]),
        ];
        let mut filter = StatsFilter::default();
        full_range(&mut filter, "2024-05-01", "2024-05-10");

        let first = compute_snapshot_at(&habits, &filter, day("2024-05-10"));
        let second = compute_snapshot_at(&habits, &filter, day("2024-05-10"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_set_is_all_zeroes() {
        let snapshot = compute_snapshot_at(&[], &StatsFilter::default(), day("2024-05-15"));
        assert_eq!(snapshot.total, 0);
        assert_eq!(snapshot.completion_rate, 0);
        assert_eq!(snapshot.longest_streak, 0);
        assert_eq!(snapshot.best_day, None);
    }
}
