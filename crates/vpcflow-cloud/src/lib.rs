//! vpcflow cloud abstraction
//!
//! This crate defines the [`NetworkGateway`] trait — the full surface of
//! provider calls the orchestrators need — and the two workflows built on
//! top of it:
//!
//! - [`provision`]: the ordered create sequence (VPC → DNS attributes →
//!   internet gateway → subnets) with best-effort rollback when a step
//!   fails partway through.
//! - [`teardown`]: the symmetric delete sequence (subnets → gateway → VPC),
//!   where every step is fatal-and-stop, plus a diagnostic sweep of leftover
//!   dependencies when the final VPC deletion fails.
//!
//! Concrete providers (see `vpcflow-cloud-aws`) implement the trait; the
//! orchestrators never see an SDK type.

pub mod error;
pub mod gateway;
pub mod provision;
pub mod teardown;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-exports
pub use error::{CloudError, Result};
pub use gateway::{DependentResources, LiveNetwork, LiveSubnet, NetworkGateway};
pub use provision::provision;
pub use teardown::teardown;
