//! Run configuration for the sync drivers.

use std::time::{Duration, Instant};

use crate::util::env::{env_flag, env_parse};

/// Knobs shared by every sync routine. Built once at startup from the
/// environment; a `Default` instance exists for tests.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Disable both recency filters and load all history. Slow and
    /// write-heavy; off by default.
    pub historical_load: bool,
    /// Delay between per-unit source queries (per league, per tournament)
    /// to stay under the wiki's rate limits.
    pub rate_limit_delay: Duration,
    /// Matches older than this are assumed settled (VODs and score
    /// corrections arrive late, but not this late).
    pub match_lookback: chrono::Duration,
    /// Matches farther out than this are not worth writing yet.
    pub match_lookahead: chrono::Duration,
    /// Bound on concurrent per-tournament match fetches. 1 keeps the run
    /// fully sequential and source-ordered.
    pub worker_concurrency: usize,
    /// Soft deadline; checked between units of work, never mid-transform.
    pub deadline: Option<Instant>,
}

impl SyncConfig {
    pub fn from_env() -> Self {
        let lookback_days: i64 = env_parse("MATCH_LOOKBACK_DAYS", 7);
        let lookahead_days: i64 = env_parse("MATCH_LOOKAHEAD_DAYS", 14);
        let deadline_secs: u64 = env_parse("SYNC_DEADLINE_SECS", 0);
        Self {
            historical_load: env_flag("HISTORICAL_LOAD", false),
            rate_limit_delay: Duration::from_millis(env_parse("RATE_LIMIT_DELAY_MS", 2000)),
            match_lookback: chrono::Duration::days(lookback_days),
            match_lookahead: chrono::Duration::days(lookahead_days),
            worker_concurrency: env_parse("WORKER_CONCURRENCY", 1usize).max(1),
            deadline: (deadline_secs > 0)
                .then(|| Instant::now() + Duration::from_secs(deadline_secs)),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            historical_load: false,
            rate_limit_delay: Duration::ZERO,
            match_lookback: chrono::Duration::weeks(1),
            match_lookahead: chrono::Duration::weeks(2),
            worker_concurrency: 1,
            deadline: None,
        }
    }
}
