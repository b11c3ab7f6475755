//! In-memory store backend

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use vpcflow_core::NetworkRecord;

use crate::error::Result;
use crate::store::NetworkStore;

/// [`NetworkStore`] backed by an in-process map.
///
/// Used by tests and local development; records are ordered by id so
/// `list_all` is deterministic.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<String, NetworkRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NetworkStore for MemoryStore {
    async fn save(&self, record: &NetworkRecord) -> Result<()> {
        self.records
            .write()
            .await
            .insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<NetworkRecord>> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<NetworkRecord>> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.records.write().await.remove(id).is_some())
    }
}
