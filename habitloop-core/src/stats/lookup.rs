//! Completion lookup.

use chrono::NaiveDate;

use crate::types::Habit;

/// Whether a habit counts as completed on a given calendar day.
///
/// A habit matches when any of its records is marked completed and
/// normalizes to the target day. Records with unparseable dates are
/// non-matches. Multiple same-day records are equivalent to one.
pub fn completed_on(habit: &Habit, day: NaiveDate) -> bool {
    habit
        .completions
        .iter()
        .any(|c| c.completed && c.date.day() == Some(day))
}
