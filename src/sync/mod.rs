//! Sync drivers: query -> filter -> transform -> diff -> conditional write.

pub mod filters;
mod leagues;
mod matches;
mod players;
mod teams;
mod tournaments;

pub use leagues::sync_leagues;
pub use matches::sync_matches;
pub use players::sync_players;
pub use teams::sync_teams;
pub use tournaments::sync_tournaments;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use serde_json::Value;
use tracing::debug;

use crate::config::SyncConfig;
use crate::leaguepedia::CargoSource;
use crate::normalization::TeamCodeResolver;
use crate::store::{EntityKind, Store, StoreKey};

/// Everything a sync routine needs: the source, the store, the shared
/// team-code resolver and the run configuration. Built once per run.
pub struct SyncContext {
    pub source: Arc<dyn CargoSource>,
    pub store: Arc<dyn Store>,
    pub resolver: TeamCodeResolver,
    pub cfg: SyncConfig,
}

impl SyncContext {
    pub fn new(source: Arc<dyn CargoSource>, store: Arc<dyn Store>, cfg: SyncConfig) -> Self {
        let resolver = TeamCodeResolver::new(source.clone());
        Self {
            source,
            store,
            resolver,
            cfg,
        }
    }

    /// Whether the run's soft deadline has passed. Only consulted between
    /// units of work.
    pub fn deadline_exceeded(&self) -> bool {
        self.cfg
            .deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Sleep the configured rate-limit delay after a source query.
    pub async fn pace(&self) {
        if !self.cfg.rate_limit_delay.is_zero() {
            tokio::time::sleep(self.cfg.rate_limit_delay).await;
        }
    }
}

/// Per-entity write tally for observability.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncStats {
    pub considered: usize,
    pub written: usize,
}

impl SyncStats {
    pub fn merge(&mut self, other: SyncStats) {
        self.considered += other.considered;
        self.written += other.written;
    }
}

/// Write the document only when it differs from what the store holds
/// (absent counts as different). Returns whether a write happened.
///
/// Best-effort optimization, not a transaction: a concurrent writer can
/// slip between the read and the write.
pub async fn upsert_entity(
    store: &dyn Store,
    kind: EntityKind,
    key: &StoreKey,
    doc: Value,
) -> Result<bool> {
    let existing = store.get(kind, key).await?;
    if existing.as_ref() == Some(&doc) {
        debug!(%kind, %key, "unchanged; skipping put");
        return Ok(false);
    }
    debug!(%kind, %key, new = %doc, old = ?existing, "putting updated record");
    store.put(kind, key, &doc).await?;
    Ok(true)
}
