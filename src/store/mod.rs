//! Key-value store façade.
//!
//! Each entity kind lives in its own document table; the composite natural
//! key serializes to a single primary-key string and the full normalized
//! entity is the value. The sync drivers read the current value, compare,
//! and write only on change. No transaction wraps the pair, so two
//! concurrent writers on the same key race last-writer-wins. A single run
//! never assigns the same key to two workers, which is what makes that
//! acceptable.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use std::fmt;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    League,
    Tournament,
    Match,
    Player,
    Team,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::League,
        EntityKind::Tournament,
        EntityKind::Match,
        EntityKind::Player,
        EntityKind::Team,
    ];

    pub fn table(&self) -> &'static str {
        match self {
            EntityKind::League => "leagues",
            EntityKind::Tournament => "tournaments",
            EntityKind::Match => "matches",
            EntityKind::Player => "players",
            EntityKind::Team => "teams",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

/// An entity's natural key: ordered named components, e.g.
/// `[("tournamentId", "LCK_2023_Spring"), ("matchId", "LCK_2023_Spring_Week1_1")]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreKey(Vec<(&'static str, String)>);

impl StoreKey {
    pub fn from_parts(parts: Vec<(&'static str, String)>) -> Self {
        Self(parts)
    }

    pub fn components(&self) -> &[(&'static str, String)] {
        &self.0
    }

    /// The flattened primary key: component values joined with `#`.
    pub fn primary(&self) -> String {
        let values: Vec<&str> = self.0.iter().map(|(_, v)| v.as_str()).collect();
        values.join("#")
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.primary())
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn get(&self, kind: EntityKind, key: &StoreKey) -> Result<Option<Value>>;
    async fn put(&self, kind: EntityKind, key: &StoreKey, doc: &Value) -> Result<()>;
}
