//! Statistics derivation for habitloop
//!
//! Everything in this module is a pure, synchronous function of its
//! inputs: a slice of habits (with their completion records, as fetched
//! from the backend) and an ephemeral filter. Nothing is cached or
//! incrementally updated; the snapshot is recomputed from scratch on
//! every filter change or refresh.
//!
//! - [`dates`] — calendar-day normalization and span arithmetic
//! - [`lookup`] — "was this habit completed on day X"
//! - [`rate`] — expected occurrences and clamped completion rates
//! - [`streak`] — longest run of consecutive completion days
//! - [`activity`] — per-day completed/total series, best and worst day
//! - [`charts`] — reshaping into label/value series for rendering
//! - [`snapshot`] — filter application and full snapshot assembly

pub mod activity;
pub mod charts;
pub mod dates;
pub mod lookup;
pub mod rate;
pub mod snapshot;
pub mod streak;

pub use activity::{best_and_worst, daily_activity, DayActivity, DaySummary};
pub use charts::ChartSeries;
pub use lookup::completed_on;
pub use rate::{completion_rate, expected_occurrences};
pub use snapshot::{compute_snapshot, compute_snapshot_at, FrequencyBreakdown, StatsSnapshot};
pub use streak::{habit_streak, longest_streak};
