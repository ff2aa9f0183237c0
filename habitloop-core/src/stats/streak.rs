//! Streak calculation.

use crate::types::Habit;

/// Longest run of consecutive completion days for one habit.
///
/// Only records marked completed count; dates are de-duplicated and
/// sorted, then walked once. A gap of exactly one day extends the run,
/// any other gap resets it to 1. No completions contribute 0.
pub fn habit_streak(habit: &Habit) -> u32 {
    let mut days: Vec<_> = habit
        .completions
        .iter()
        .filter(|c| c.completed)
        .filter_map(|c| c.date.day())
        .collect();
    days.sort_unstable();
    days.dedup();

    if days.is_empty() {
        return 0;
    }

    let mut longest = 1u32;
    let mut run = 1u32;
    for pair in days.windows(2) {
        if (pair[1] - pair[0]).num_days() == 1 {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 1;
        }
    }
    longest
}

/// Longest streak across a set of habits.
pub fn longest_streak(habits: &[Habit]) -> u32 {
    habits.iter().map(habit_streak).max().unwrap_or(0)
}
