//! vpcflow service layer
//!
//! [`NetworkService`] is the boundary a transport façade calls: it
//! validates requests, drives the cloud orchestrators, and keeps the
//! record store in sync. It holds the gateway and store as trait objects,
//! so any provider or backend can be substituted without touching this
//! crate.

pub mod error;
pub mod service;

// Re-exports
pub use error::{ControlError, Result};
pub use service::{LiveNetworkView, NetworkList, NetworkService};
