//! Core domain types for habitloop
//!
//! These types mirror the habit backend's JSON model. The backend owns
//! every entity; the client holds read-only, session-scoped copies that
//! are refreshed on demand and never persisted locally.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Habit** | A recurring user-defined activity tracked for completion |
//! | **Completion** | A record asserting a habit was performed on a calendar day |
//! | **Frequency** | The habit's intended cadence: daily, weekly, or monthly |
//! | **Tag** | A user-defined label; many-to-many with habits |
//! | **Streak** | The longest run of consecutive calendar days with a completion |
//! | **Opportunity** | An expected occurrence of a habit within a date range |

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::stats::dates::parse_day;

// ============================================
// Frequency
// ============================================

/// How often a habit is meant to be performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    /// All cadences, in display order.
    pub const ALL: [Frequency; 3] = [Frequency::Daily, Frequency::Weekly, Frequency::Monthly];

    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
        }
    }

    /// Rough single-period opportunity count used when no explicit
    /// date range is supplied.
    pub fn default_expected_occurrences(&self) -> i64 {
        match self {
            Frequency::Daily => 30,
            Frequency::Weekly => 4,
            Frequency::Monthly => 1,
        }
    }
}

impl std::str::FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            _ => Err(format!("unknown frequency: {}", s)),
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================
// Tag
// ============================================

fn default_tag_color() -> String {
    "blue".to_string()
}

/// A user-defined label attached to habits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: i64,
    pub name: String,
    /// Display color; the backend may omit it, in which case "blue" is used.
    #[serde(default = "default_tag_color")]
    pub color: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// ============================================
// Completion
// ============================================

/// The calendar day of a completion record, after normalization.
///
/// Backends and older snapshots have stored this as a bare
/// `YYYY-MM-DD` string, a full ISO datetime, or under a different
/// field name entirely. Values that cannot be parsed become
/// [`CompletionDate::Invalid`] and are treated as non-matches by every
/// derivation, never as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionDate {
    Day(NaiveDate),
    Invalid,
}

impl CompletionDate {
    /// The normalized day, if the stored value was parseable.
    pub fn day(&self) -> Option<NaiveDate> {
        match self {
            CompletionDate::Day(d) => Some(*d),
            CompletionDate::Invalid => None,
        }
    }
}

impl From<NaiveDate> for CompletionDate {
    fn from(day: NaiveDate) -> Self {
        CompletionDate::Day(day)
    }
}

impl Serialize for CompletionDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            CompletionDate::Day(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
            CompletionDate::Invalid => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for CompletionDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(completion_date_from_value(&value))
    }
}

fn completion_date_from_value(value: &serde_json::Value) -> CompletionDate {
    match value {
        serde_json::Value::String(s) => match parse_day(s) {
            Some(day) => CompletionDate::Day(day),
            None => CompletionDate::Invalid,
        },
        _ => CompletionDate::Invalid,
    }
}

/// A record asserting a habit was (or was not) performed on a day.
///
/// At most one record per habit per day is meaningful; derivations
/// treat multiple same-day entries as equivalent to one.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitCompletion {
    pub id: i64,
    pub habit_id: i64,
    pub date: CompletionDate,
    pub completed: bool,
}

impl HabitCompletion {
    /// Build a completed record for tests and local construction.
    pub fn on_day(id: i64, habit_id: i64, day: NaiveDate) -> Self {
        Self {
            id,
            habit_id,
            date: CompletionDate::Day(day),
            completed: true,
        }
    }
}

// Payloads disagree on where the day lives: `date` in current
// backends, `completedAt` or `createdAt` in older snapshots. The
// fallback order is fixed: date, then completedAt, then createdAt.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCompletion {
    #[serde(default)]
    id: i64,
    #[serde(default)]
    habit_id: i64,
    #[serde(default)]
    date: Option<serde_json::Value>,
    #[serde(default)]
    completed_at: Option<serde_json::Value>,
    #[serde(default)]
    created_at: Option<serde_json::Value>,
    #[serde(default)]
    completed: bool,
}

impl<'de> Deserialize<'de> for HabitCompletion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawCompletion::deserialize(deserializer)?;
        let date = raw
            .date
            .as_ref()
            .or(raw.completed_at.as_ref())
            .or(raw.created_at.as_ref())
            .map(completion_date_from_value)
            .unwrap_or(CompletionDate::Invalid);

        Ok(HabitCompletion {
            id: raw.id,
            habit_id: raw.habit_id,
            date,
            completed: raw.completed,
        })
    }
}

// ============================================
// Habit
// ============================================

/// A recurring user-defined activity, with its tags and completion
/// history as delivered by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub frequency: Frequency,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub completions: Vec<HabitCompletion>,
}

impl Habit {
    /// Whether this habit carries any of the given tag names.
    pub fn has_any_tag(&self, names: &[String]) -> bool {
        self.tags.iter().any(|t| names.contains(&t.name))
    }
}

// ============================================
// User
// ============================================

/// The authenticated account, as returned by `/user/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// ============================================
// Filters
// ============================================

/// Ephemeral stats filters: never persisted, recreated per session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsFilter {
    pub frequency: Option<Frequency>,
    /// Inclusive window start (calendar-day granularity).
    pub start: Option<NaiveDate>,
    /// Inclusive window end.
    pub end: Option<NaiveDate>,
    /// Tag names; a habit matches when it carries any of them.
    pub tags: Option<Vec<String>>,
}

impl StatsFilter {
    /// Default window: first day of the current month through today.
    pub fn current_month() -> Self {
        Self::current_month_at(Utc::now().date_naive())
    }

    /// Same as [`StatsFilter::current_month`], anchored to a given day.
    pub fn current_month_at(today: NaiveDate) -> Self {
        let first = today.with_day(1).unwrap_or(today);
        Self {
            start: Some(first),
            end: Some(today),
            ..Default::default()
        }
    }

    /// The inclusive window, when both bounds are present.
    pub fn range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start <= end => Some((start, end)),
            _ => None,
        }
    }

    /// Whether a habit passes the frequency and tag filters.
    pub fn matches(&self, habit: &Habit) -> bool {
        if let Some(frequency) = self.frequency {
            if habit.frequency != frequency {
                return false;
            }
        }
        if let Some(tags) = &self.tags {
            if !tags.is_empty() && !habit.has_any_tag(tags) {
                return false;
            }
        }
        true
    }
}

// ============================================
// Server-side stats (cross-check)
// ============================================

/// Aggregate counts from the backend `/stats` endpoint, used as a
/// cross-check alongside the client-side snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerHabitStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub not_completed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_frequency_round_trip() {
        for freq in Frequency::ALL {
            assert_eq!(freq.as_str().parse::<Frequency>().unwrap(), freq);
        }
        assert!("hourly".parse::<Frequency>().is_err());
    }

    #[test]
    fn test_completion_date_representations() {
        // Bare day, ISO datetime, and Z-suffixed datetime all normalize
        // to the same calendar day.
        for json in [
            r#"{"id":1,"habitId":2,"date":"2024-05-01","completed":true}"#,
            r#"{"id":1,"habitId":2,"date":"2024-05-01T00:00:00Z","completed":true}"#,
            r#"{"id":1,"habitId":2,"date":"2024-05-01T10:30:00","completed":true}"#,
        ] {
            let completion: HabitCompletion = serde_json::from_str(json).unwrap();
            assert_eq!(completion.date.day(), Some(day("2024-05-01")));
        }
    }

    #[test]
    fn test_completion_date_field_fallback() {
        let completion: HabitCompletion = serde_json::from_str(
            r#"{"id":1,"habitId":2,"completedAt":"2024-05-02","completed":true}"#,
        )
        .unwrap();
        assert_eq!(completion.date.day(), Some(day("2024-05-02")));

        let completion: HabitCompletion = serde_json::from_str(
            r#"{"id":1,"habitId":2,"createdAt":"2024-05-03T08:00:00Z","completed":false}"#,
        )
        .unwrap();
        assert_eq!(completion.date.day(), Some(day("2024-05-03")));

        // `date` wins over the fallbacks when both are present.
        let completion: HabitCompletion = serde_json::from_str(
            r#"{"id":1,"habitId":2,"date":"2024-05-04","createdAt":"2024-01-01","completed":true}"#,
        )
        .unwrap();
        assert_eq!(completion.date.day(), Some(day("2024-05-04")));
    }

    #[test]
    fn test_malformed_dates_are_invalid_not_errors() {
        for json in [
            r#"{"id":1,"habitId":2,"date":"not-a-date","completed":true}"#,
            r#"{"id":1,"habitId":2,"date":12345,"completed":true}"#,
            r#"{"id":1,"habitId":2,"completed":true}"#,
        ] {
            let completion: HabitCompletion = serde_json::from_str(json).unwrap();
            assert_eq!(completion.date, CompletionDate::Invalid);
        }
    }

    #[test]
    fn test_tag_color_defaults_to_blue() {
        let tag: Tag = serde_json::from_str(r#"{"id":1,"name":"Leitura"}"#).unwrap();
        assert_eq!(tag.color, "blue");
    }

    #[test]
    fn test_filter_matches() {
        let habit: Habit = serde_json::from_str(
            r##"{"id":1,"name":"Run","frequency":"daily",
                "tags":[{"id":1,"name":"health","color":"#34D399"}]}"##,
        )
        .unwrap();

        assert!(StatsFilter::default().matches(&habit));
        assert!(StatsFilter {
            frequency: Some(Frequency::Daily),
            ..Default::default()
        }
        .matches(&habit));
        assert!(!StatsFilter {
            frequency: Some(Frequency::Weekly),
            ..Default::default()
        }
        .matches(&habit));
        assert!(StatsFilter {
            tags: Some(vec!["health".to_string()]),
            ..Default::default()
        }
        .matches(&habit));
        assert!(!StatsFilter {
            tags: Some(vec!["reading".to_string()]),
            ..Default::default()
        }
        .matches(&habit));
    }

    #[test]
    fn test_current_month_window() {
        let filter = StatsFilter::current_month_at(day("2024-05-17"));
        assert_eq!(filter.range(), Some((day("2024-05-01"), day("2024-05-17"))));
    }
}
