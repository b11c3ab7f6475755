//! Store trait definition

use crate::error::Result;
use async_trait::async_trait;
use vpcflow_core::NetworkRecord;

/// Persistence contract for network records
///
/// The service layer is written against this trait only, never against a
/// concrete backend, so swapping DynamoDB for an in-memory map (or any
/// future alternative) touches no orchestration code.
#[async_trait]
pub trait NetworkStore: Send + Sync {
    /// Persist a record. An existing record with the same id is fully
    /// replaced.
    async fn save(&self, record: &NetworkRecord) -> Result<()>;

    /// Fetch a record by network id; `None` when absent
    async fn get(&self, id: &str) -> Result<Option<NetworkRecord>>;

    /// Return every stored record
    async fn list_all(&self) -> Result<Vec<NetworkRecord>>;

    /// Delete the record with the given id. Returns `true` iff a record
    /// existed and was removed.
    async fn delete(&self, id: &str) -> Result<bool>;
}
