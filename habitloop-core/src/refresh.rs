//! Generation-stamped fetch-and-recompute.
//!
//! Filter changes can overlap: a user flips filters faster than the
//! backend answers, and nothing guarantees responses resolve in issue
//! order. Every refresh cycle is stamped with a monotonically
//! increasing generation; a cycle whose generation is no longer
//! current when its fetch resolves is discarded, so a stale response
//! can never overwrite a fresher snapshot.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::api::ApiClient;
use crate::error::Result;
use crate::stats::{compute_snapshot, StatsSnapshot};
use crate::types::{ServerHabitStats, StatsFilter};

/// Monotonic counter of issued refresh cycles.
#[derive(Debug, Default)]
pub struct GenerationCounter(AtomicU64);

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next generation.
    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// The most recently issued generation.
    pub fn current(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    /// Whether a generation is still the latest issued one.
    pub fn is_current(&self, generation: u64) -> bool {
        self.current() == generation
    }
}

/// A completed refresh: the client-side snapshot plus the backend's
/// own rollup for cross-checking, when the stats endpoint answered.
#[derive(Debug, Clone)]
pub struct StatsReport {
    pub snapshot: StatsSnapshot,
    pub server: Option<ServerHabitStats>,
}

/// Coordinates fetches and snapshot recomputation.
pub struct StatsRefresher {
    client: ApiClient,
    generations: GenerationCounter,
}

impl StatsRefresher {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            generations: GenerationCounter::new(),
        }
    }

    /// Fetch habits and server stats, then compute the snapshot.
    ///
    /// Returns `Ok(None)` when a newer refresh was issued while this
    /// one was in flight; the caller keeps whatever it already shows.
    /// A failing stats endpoint degrades to `server: None` rather than
    /// failing the whole refresh.
    pub async fn refresh(&self, filter: &StatsFilter) -> Result<Option<StatsReport>> {
        let generation = self.generations.next();
        tracing::debug!(generation, "Starting stats refresh");

        let habits = self.client.get_all_habits(filter.start, filter.end).await?;
        let server = match self.client.get_server_stats(filter).await {
            Ok(stats) => Some(stats),
            Err(e) => {
                tracing::warn!(error = %e, "Server stats unavailable, using client snapshot only");
                None
            }
        };

        if !self.generations.is_current(generation) {
            tracing::debug!(
                generation,
                current = self.generations.current(),
                "Discarding stale stats refresh"
            );
            return Ok(None);
        }

        let snapshot = compute_snapshot(&habits, filter);
        tracing::info!(
            generation,
            habits = snapshot.total,
            longest_streak = snapshot.longest_streak,
            "Stats refresh complete"
        );

        Ok(Some(StatsReport { snapshot, server }))
    }
}
