//! AWS EC2 implementation of the vpcflow network gateway
//!
//! Translates [`NetworkGateway`](vpcflow_cloud::NetworkGateway) operations
//! into aws-sdk-ec2 calls and normalizes SDK failures into
//! [`CloudError`](vpcflow_cloud::CloudError). The underlying SDK client is
//! process-wide and lazily initialized on first use.

pub mod client;
pub mod gateway;

// Re-exports
pub use gateway::Ec2Gateway;
