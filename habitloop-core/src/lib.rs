//! # habitloop-core
//!
//! Core library for habitloop - a client for a habit-tracking backend.
//!
//! This library provides:
//! - Domain types for habits, tags, and completion records
//! - A pure statistics core: streaks, completion rates, daily
//!   activity, and chart series
//! - An HTTP client for the backend API
//! - An explicit, injected auth session with on-disk persistence
//! - Configuration management and logging infrastructure
//!
//! ## Architecture
//!
//! The backend owns all domain data. The client fetches habits (with
//! nested tags and completions) on demand, derives every statistic
//! locally via pure functions, and persists nothing but the session.
//!
//! ## Example
//!
//! ```rust,no_run
//! use habitloop_core::{compute_snapshot, StatsFilter};
//!
//! let habits = vec![]; // fetched via ApiClient::get_all_habits
//! let snapshot = compute_snapshot(&habits, &StatsFilter::current_month());
//! println!("longest streak: {} days", snapshot.longest_streak);
//! ```

// Re-export commonly used items at the crate root
pub use api::ApiClient;
pub use config::Config;
pub use error::{Error, Result};
pub use refresh::{StatsRefresher, StatsReport};
pub use session::{Session, SessionStore};
pub use stats::{compute_snapshot, StatsSnapshot};
pub use types::*;

// Public modules
pub mod api;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod refresh;
pub mod session;
pub mod stats;
pub mod types;
