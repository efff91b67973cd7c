use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use super::{EntityKind, Store, StoreKey};

/// In-memory store for tests and dry runs. Tracks the number of puts so
/// callers can assert on write behavior.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<(EntityKind, String), Value>>,
    puts: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of `put` calls so far.
    pub fn put_count(&self) -> usize {
        *self.puts.lock().expect("puts lock")
    }

    /// Number of stored records for one entity kind.
    pub fn len(&self, kind: EntityKind) -> usize {
        self.records
            .lock()
            .expect("records lock")
            .keys()
            .filter(|(k, _)| *k == kind)
            .count()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, kind: EntityKind, key: &StoreKey) -> Result<Option<Value>> {
        let records = self.records.lock().expect("records lock");
        Ok(records.get(&(kind, key.primary())).cloned())
    }

    async fn put(&self, kind: EntityKind, key: &StoreKey, doc: &Value) -> Result<()> {
        let mut records = self.records.lock().expect("records lock");
        records.insert((kind, key.primary()), doc.clone());
        *self.puts.lock().expect("puts lock") += 1;
        Ok(())
    }
}
