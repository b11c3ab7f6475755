//! Network gateway trait definition

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tag set applied to every created resource: `{Name: <name>}` plus the
/// caller-supplied tags.
pub type Tags = BTreeMap<String, String>;

/// Provider abstraction for network provisioning
///
/// One method per provider API call the orchestrators need. Implementations
/// translate these into the provider's wire calls and normalize failures
/// into [`CloudError`](crate::error::CloudError).
#[async_trait]
pub trait NetworkGateway: Send + Sync {
    /// Region the gateway operates in, stamped into persisted records
    fn region(&self) -> &str;

    /// Create a VPC with the given CIDR block; returns the provider id
    async fn create_network(&self, cidr_block: &str, name: &str, tags: &Tags) -> Result<String>;

    /// Enable DNS hostname and DNS resolution support on the network.
    /// Idempotent; both attributes must end up enabled.
    async fn enable_dns_attributes(&self, network_id: &str) -> Result<()>;

    /// Create an internet gateway; returns the provider id
    async fn create_gateway(&self, name: &str, tags: &Tags) -> Result<String>;

    /// Attach an internet gateway to a network
    async fn attach_gateway(&self, gateway_id: &str, network_id: &str) -> Result<()>;

    /// Create a subnet inside the network; returns the provider id
    async fn create_subnet(
        &self,
        network_id: &str,
        cidr_block: &str,
        availability_zone: &str,
        name: &str,
        tags: &Tags,
    ) -> Result<String>;

    async fn delete_subnet(&self, subnet_id: &str) -> Result<()>;

    async fn detach_gateway(&self, gateway_id: &str, network_id: &str) -> Result<()>;

    async fn delete_gateway(&self, gateway_id: &str) -> Result<()>;

    async fn delete_network(&self, network_id: &str) -> Result<()>;

    /// Fetch live network details, for refreshing stale stored records
    async fn describe_network(&self, network_id: &str) -> Result<LiveNetwork>;

    /// Fetch the live subnets belonging to a network
    async fn describe_subnets(&self, network_id: &str) -> Result<Vec<LiveSubnet>>;

    /// Diagnostic-only: list dependents still attached to the network.
    /// Never fails — implementations swallow and log their own errors,
    /// returning empty lists, so a sweep can never mask the error that
    /// prompted it.
    async fn describe_dependents(&self, network_id: &str) -> DependentResources;
}

/// Live view of a network, as reported by the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveNetwork {
    pub id: String,
    pub name: String,
    pub cidr_block: String,
    pub state: String,
}

/// Live view of a subnet, as reported by the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveSubnet {
    pub id: String,
    pub cidr_block: String,
    pub availability_zone: String,
    pub name: String,
}

/// Dependents still attached to a network, collected after a failed deletion
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DependentResources {
    pub network_interfaces: Vec<String>,
    pub non_main_route_tables: Vec<String>,
    pub endpoints: Vec<String>,
}

impl DependentResources {
    pub fn is_empty(&self) -> bool {
        self.network_interfaces.is_empty()
            && self.non_main_route_tables.is_empty()
            && self.endpoints.is_empty()
    }
}
