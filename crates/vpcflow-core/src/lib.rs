//! vpcflow domain model
//!
//! Shared types for the provisioning pipeline: the durable [`NetworkRecord`]
//! written to the store after a successful run, and the [`NetworkRequest`]
//! validated before any provider call is made.

pub mod error;
pub mod record;
pub mod request;

// Re-exports
pub use error::{Result, ValidationError};
pub use record::{NetworkRecord, NetworkStatus, SubnetRecord};
pub use request::{NetworkRequest, SubnetRequest};
