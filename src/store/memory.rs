//! Process-local durable store.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::time::SystemTime;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{PersistedResult, SignatureStore};
use crate::Result;

/// [`SignatureStore`] held in memory.
///
/// Survives for the lifetime of the value, not the process restart; use
/// it where a real durable backend is unavailable or in tests.
#[derive(Default)]
pub struct MemoryStore {
    rows: RwLock<HashMap<String, PersistedResult>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Snapshot of every row, in no particular order.
    pub async fn rows(&self) -> Vec<PersistedResult> {
        self.rows.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl SignatureStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch(&self, hash: &str) -> Result<Option<PersistedResult>> {
        Ok(self.rows.read().await.get(hash).cloned())
    }

    async fn insert_if_absent(&self, row: PersistedResult) -> Result<bool> {
        let mut rows = self.rows.write().await;
        match rows.entry(row.signature_hash.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(row);
                Ok(true)
            }
        }
    }

    async fn record_hit(&self, hash: &str, at: SystemTime) -> Result<()> {
        if let Some(row) = self.rows.write().await.get_mut(hash) {
            row.hit_count += 1;
            row.last_accessed_at = at;
        }
        Ok(())
    }
}
