//! Scripted gateway for orchestrator and service tests
//!
//! Records every gateway call in order and fails at the points a
//! [`FailPlan`] names, with stable provider-style error codes. Ids are
//! deterministic (`vpc-1`, `igw-1`, `subnet-1`, `subnet-2`, ...).

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::error::{CloudError, Result};
use crate::gateway::{DependentResources, LiveNetwork, LiveSubnet, NetworkGateway, Tags};

/// One recorded gateway call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateNetwork { cidr_block: String, name: String },
    EnableDns { network_id: String },
    CreateGateway { name: String },
    AttachGateway { gateway_id: String, network_id: String },
    CreateSubnet {
        network_id: String,
        cidr_block: String,
        availability_zone: String,
        name: String,
    },
    DeleteSubnet { subnet_id: String },
    DetachGateway { gateway_id: String, network_id: String },
    DeleteGateway { gateway_id: String },
    DeleteNetwork { network_id: String },
    DescribeNetwork { network_id: String },
    DescribeSubnets { network_id: String },
    DescribeDependents { network_id: String },
}

/// Which calls should fail, and how
#[derive(Debug, Default)]
pub struct FailPlan {
    pub create_network: bool,
    pub enable_dns: bool,
    pub create_gateway: bool,
    pub attach_gateway: bool,
    /// Fail the n-th `create_subnet` call (0-based)
    pub create_subnet_at: Option<usize>,
    pub delete_subnet: bool,
    pub detach_gateway: bool,
    pub delete_gateway: bool,
    /// Error returned by `delete_network`, when set
    pub delete_network: Option<CloudError>,
    /// Make `describe_network` report the network as missing
    pub describe_missing: bool,
}

/// In-memory [`NetworkGateway`] that records calls instead of hitting a
/// provider
pub struct ScriptedGateway {
    region: String,
    calls: Mutex<Vec<Call>>,
    fail: FailPlan,
    network_seq: AtomicUsize,
    gateway_seq: AtomicUsize,
    subnet_seq: AtomicUsize,
    create_subnet_seq: AtomicUsize,
    dependents: DependentResources,
    live_subnets: Vec<LiveSubnet>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::with_fail(FailPlan::default())
    }

    pub fn with_fail(fail: FailPlan) -> Self {
        Self {
            region: "us-east-1".to_string(),
            calls: Mutex::new(Vec::new()),
            fail,
            network_seq: AtomicUsize::new(0),
            gateway_seq: AtomicUsize::new(0),
            subnet_seq: AtomicUsize::new(0),
            create_subnet_seq: AtomicUsize::new(0),
            dependents: DependentResources::default(),
            live_subnets: Vec::new(),
        }
    }

    pub fn with_dependents(mut self, dependents: DependentResources) -> Self {
        self.dependents = dependents;
        self
    }

    pub fn with_live_subnets(mut self, subnets: Vec<LiveSubnet>) -> Self {
        self.live_subnets = subnets;
        self
    }

    /// All calls recorded so far, in order
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Default for ScriptedGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NetworkGateway for ScriptedGateway {
    fn region(&self) -> &str {
        &self.region
    }

    async fn create_network(&self, cidr_block: &str, name: &str, _tags: &Tags) -> Result<String> {
        self.record(Call::CreateNetwork {
            cidr_block: cidr_block.to_string(),
            name: name.to_string(),
        });
        if self.fail.create_network {
            return Err(CloudError::provider(
                "VpcLimitExceeded",
                "maximum number of VPCs reached",
            ));
        }
        let id = self.network_seq.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("vpc-{}", id))
    }

    async fn enable_dns_attributes(&self, network_id: &str) -> Result<()> {
        self.record(Call::EnableDns {
            network_id: network_id.to_string(),
        });
        if self.fail.enable_dns {
            return Err(CloudError::provider(
                "InvalidParameterValue",
                "cannot modify DNS attributes",
            ));
        }
        Ok(())
    }

    async fn create_gateway(&self, name: &str, _tags: &Tags) -> Result<String> {
        self.record(Call::CreateGateway {
            name: name.to_string(),
        });
        if self.fail.create_gateway {
            return Err(CloudError::provider(
                "InternetGatewayLimitExceeded",
                "maximum number of internet gateways reached",
            ));
        }
        let id = self.gateway_seq.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("igw-{}", id))
    }

    async fn attach_gateway(&self, gateway_id: &str, network_id: &str) -> Result<()> {
        self.record(Call::AttachGateway {
            gateway_id: gateway_id.to_string(),
            network_id: network_id.to_string(),
        });
        if self.fail.attach_gateway {
            return Err(CloudError::provider(
                "Gateway.NotAttached",
                "attachment failed",
            ));
        }
        Ok(())
    }

    async fn create_subnet(
        &self,
        network_id: &str,
        cidr_block: &str,
        availability_zone: &str,
        name: &str,
        _tags: &Tags,
    ) -> Result<String> {
        self.record(Call::CreateSubnet {
            network_id: network_id.to_string(),
            cidr_block: cidr_block.to_string(),
            availability_zone: availability_zone.to_string(),
            name: name.to_string(),
        });
        let n = self.create_subnet_seq.fetch_add(1, Ordering::SeqCst);
        if self.fail.create_subnet_at == Some(n) {
            return Err(CloudError::provider(
                "InvalidSubnet.Range",
                format!("CIDR {} is not within the VPC block", cidr_block),
            ));
        }
        let id = self.subnet_seq.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("subnet-{}", id))
    }

    async fn delete_subnet(&self, subnet_id: &str) -> Result<()> {
        self.record(Call::DeleteSubnet {
            subnet_id: subnet_id.to_string(),
        });
        if self.fail.delete_subnet {
            return Err(CloudError::provider("InternalError", "delete failed"));
        }
        Ok(())
    }

    async fn detach_gateway(&self, gateway_id: &str, network_id: &str) -> Result<()> {
        self.record(Call::DetachGateway {
            gateway_id: gateway_id.to_string(),
            network_id: network_id.to_string(),
        });
        if self.fail.detach_gateway {
            return Err(CloudError::provider("InternalError", "detach failed"));
        }
        Ok(())
    }

    async fn delete_gateway(&self, gateway_id: &str) -> Result<()> {
        self.record(Call::DeleteGateway {
            gateway_id: gateway_id.to_string(),
        });
        if self.fail.delete_gateway {
            return Err(CloudError::provider("InternalError", "delete failed"));
        }
        Ok(())
    }

    async fn delete_network(&self, network_id: &str) -> Result<()> {
        self.record(Call::DeleteNetwork {
            network_id: network_id.to_string(),
        });
        if let Some(err) = &self.fail.delete_network {
            return Err(err.clone());
        }
        Ok(())
    }

    async fn describe_network(&self, network_id: &str) -> Result<LiveNetwork> {
        self.record(Call::DescribeNetwork {
            network_id: network_id.to_string(),
        });
        if self.fail.describe_missing {
            return Err(CloudError::NotFound(network_id.to_string()));
        }
        Ok(LiveNetwork {
            id: network_id.to_string(),
            name: "demo-vpc".to_string(),
            cidr_block: "10.0.0.0/16".to_string(),
            state: "available".to_string(),
        })
    }

    async fn describe_subnets(&self, network_id: &str) -> Result<Vec<LiveSubnet>> {
        self.record(Call::DescribeSubnets {
            network_id: network_id.to_string(),
        });
        Ok(self.live_subnets.clone())
    }

    async fn describe_dependents(&self, network_id: &str) -> DependentResources {
        self.record(Call::DescribeDependents {
            network_id: network_id.to_string(),
        });
        self.dependents.clone()
    }
}
