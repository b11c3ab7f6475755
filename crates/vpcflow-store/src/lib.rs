//! Record persistence for vpcflow
//!
//! [`NetworkStore`] is the full persistence contract the service layer
//! depends on — four operations, keyed by network id. Backends are
//! swappable: [`DynamoStore`] for production, [`MemoryStore`] for tests
//! and local development.

pub mod dynamodb;
pub mod error;
pub mod memory;
pub mod store;

// Re-exports
pub use dynamodb::DynamoStore;
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use store::NetworkStore;
