//! Provisioning orchestration
//!
//! Drives the gateway through the fixed create sequence:
//!
//! 1. Create the VPC
//! 2. Enable DNS hostnames and resolution
//! 3. Create and attach the internet gateway
//! 4. Create each requested subnet, in request order
//!
//! Any failure after step 1 rolls back everything created so far, in reverse
//! creation order (subnets → gateway → VPC). Rollback is best-effort: each
//! delete is wrapped independently so one failed delete does not stop the
//! remaining ones, every failure is logged, and the error returned to the
//! caller is always the one that triggered the rollback.
//!
//! The orchestrator does not persist anything — the service layer saves the
//! returned record only after this function succeeds.

use chrono::Utc;
use tracing::{error, info, warn};
use vpcflow_core::{NetworkRecord, NetworkRequest, NetworkStatus, SubnetRecord};

use crate::error::Result;
use crate::gateway::NetworkGateway;

/// Create a network, its internet gateway, and its subnets.
///
/// Returns the assembled [`NetworkRecord`] on full success. On failure the
/// original error is returned after best-effort rollback; no partial record
/// is ever produced.
pub async fn provision(
    gateway: &dyn NetworkGateway,
    request: &NetworkRequest,
    created_by: &str,
) -> Result<NetworkRecord> {
    let tags = &request.tags;

    info!("Creating network with CIDR {}", request.cidr_block);
    let network_id = gateway
        .create_network(&request.cidr_block, &request.name, tags)
        .await?;
    info!("Network created: {}", network_id);

    let mut rollback = Rollback::new(gateway, &network_id);

    if let Err(err) = gateway.enable_dns_attributes(&network_id).await {
        error!("Failed to enable DNS attributes on {}: {}", network_id, err);
        rollback.run().await;
        return Err(err);
    }

    let gateway_name = format!("{}-igw", request.name);
    let gateway_id = match gateway.create_gateway(&gateway_name, tags).await {
        Ok(id) => id,
        Err(err) => {
            error!("Failed to create internet gateway: {}", err);
            rollback.run().await;
            return Err(err);
        }
    };
    rollback.gateway_id = Some(gateway_id.clone());

    if let Err(err) = gateway.attach_gateway(&gateway_id, &network_id).await {
        error!(
            "Failed to attach gateway {} to network {}: {}",
            gateway_id, network_id, err
        );
        rollback.run().await;
        return Err(err);
    }
    rollback.attached = true;
    info!(
        "Internet gateway {} attached to network {}",
        gateway_id, network_id
    );

    let mut subnets = Vec::with_capacity(request.subnets.len());
    for (idx, spec) in request.subnets.iter().enumerate() {
        let subnet_name = spec
            .name
            .clone()
            .unwrap_or_else(|| format!("{}-subnet-{}", request.name, idx + 1));

        info!(
            "Creating subnet {} in {}",
            spec.cidr_block, spec.availability_zone
        );
        let subnet_id = match gateway
            .create_subnet(
                &network_id,
                &spec.cidr_block,
                &spec.availability_zone,
                &subnet_name,
                tags,
            )
            .await
        {
            Ok(id) => id,
            Err(err) => {
                error!("Failed to create subnet {}: {}", spec.cidr_block, err);
                rollback.run().await;
                return Err(err);
            }
        };
        info!("Subnet created: {}", subnet_id);

        rollback.subnet_ids.push(subnet_id.clone());
        subnets.push(SubnetRecord {
            id: subnet_id,
            cidr_block: spec.cidr_block.clone(),
            availability_zone: spec.availability_zone.clone(),
            name: subnet_name,
        });
    }

    Ok(NetworkRecord {
        id: network_id,
        name: request.name.clone(),
        cidr_block: request.cidr_block.clone(),
        gateway_id: Some(gateway_id),
        region: gateway.region().to_string(),
        subnets,
        tags: request.tags.clone(),
        created_by: created_by.to_string(),
        created_at: Utc::now(),
        status: NetworkStatus::Active,
    })
}

/// Tracks what has been created so far and reverses it on failure.
///
/// Deletes run newest-first. Every call is independent: a failed delete is
/// logged and the next one is still attempted.
struct Rollback<'a> {
    gateway: &'a dyn NetworkGateway,
    network_id: String,
    gateway_id: Option<String>,
    attached: bool,
    subnet_ids: Vec<String>,
}

impl<'a> Rollback<'a> {
    fn new(gateway: &'a dyn NetworkGateway, network_id: &str) -> Self {
        Self {
            gateway,
            network_id: network_id.to_string(),
            gateway_id: None,
            attached: false,
            subnet_ids: Vec::new(),
        }
    }

    async fn run(&self) {
        warn!("Rolling back resources for network {}", self.network_id);

        for subnet_id in self.subnet_ids.iter().rev() {
            match self.gateway.delete_subnet(subnet_id).await {
                Ok(()) => info!("Deleted subnet {}", subnet_id),
                Err(err) => error!("Could not delete subnet {}: {}", subnet_id, err),
            }
        }

        if let Some(gateway_id) = &self.gateway_id {
            if self.attached {
                if let Err(err) = self
                    .gateway
                    .detach_gateway(gateway_id, &self.network_id)
                    .await
                {
                    error!("Could not detach gateway {}: {}", gateway_id, err);
                }
            }
            match self.gateway.delete_gateway(gateway_id).await {
                Ok(()) => info!("Deleted gateway {}", gateway_id),
                Err(err) => error!("Could not delete gateway {}: {}", gateway_id, err),
            }
        }

        match self.gateway.delete_network(&self.network_id).await {
            Ok(()) => info!("Deleted network {}", self.network_id),
            Err(err) => error!("Could not delete network {}: {}", self.network_id, err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, FailPlan, ScriptedGateway};
    use std::collections::BTreeMap;
    use vpcflow_core::SubnetRequest;

    fn request(subnet_count: usize) -> NetworkRequest {
        NetworkRequest {
            cidr_block: "10.0.0.0/16".to_string(),
            name: "demo-vpc".to_string(),
            subnets: (0..subnet_count)
                .map(|i| SubnetRequest {
                    cidr_block: format!("10.0.{}.0/24", i + 1),
                    availability_zone: "us-east-1a".to_string(),
                    name: None,
                })
                .collect(),
            tags: BTreeMap::from([("Environment".to_string(), "test".to_string())]),
        }
    }

    #[tokio::test]
    async fn provisions_subnets_in_request_order_with_defaulted_names() {
        let gateway = ScriptedGateway::new();
        let record = provision(&gateway, &request(3), "admin").await.unwrap();

        assert_eq!(record.id, "vpc-1");
        assert_eq!(record.gateway_id.as_deref(), Some("igw-1"));
        assert_eq!(record.region, "us-east-1");
        assert_eq!(record.status, NetworkStatus::Active);
        assert_eq!(record.created_by, "admin");

        let names: Vec<&str> = record.subnets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            ["demo-vpc-subnet-1", "demo-vpc-subnet-2", "demo-vpc-subnet-3"]
        );
        let cidrs: Vec<&str> = record.subnets.iter().map(|s| s.cidr_block.as_str()).collect();
        assert_eq!(cidrs, ["10.0.1.0/24", "10.0.2.0/24", "10.0.3.0/24"]);
    }

    #[tokio::test]
    async fn caller_supplied_subnet_name_is_kept() {
        let gateway = ScriptedGateway::new();
        let mut req = request(2);
        req.subnets[1].name = Some("public-b".to_string());

        let record = provision(&gateway, &req, "admin").await.unwrap();
        assert_eq!(record.subnets[0].name, "demo-vpc-subnet-1");
        assert_eq!(record.subnets[1].name, "public-b");
    }

    #[tokio::test]
    async fn subnet_failure_rolls_back_in_reverse_order() {
        // Third subnet fails: the two created subnets are deleted newest
        // first, then the gateway is detached and deleted, then the VPC.
        let gateway = ScriptedGateway::with_fail(FailPlan {
            create_subnet_at: Some(2),
            ..FailPlan::default()
        });

        let err = provision(&gateway, &request(3), "admin").await.unwrap_err();
        assert_eq!(err.code(), Some("InvalidSubnet.Range"));

        let tail: Vec<Call> = gateway
            .calls()
            .into_iter()
            .skip_while(|c| !matches!(c, Call::DeleteSubnet { .. }))
            .collect();
        assert_eq!(
            tail,
            vec![
                Call::DeleteSubnet {
                    subnet_id: "subnet-2".to_string()
                },
                Call::DeleteSubnet {
                    subnet_id: "subnet-1".to_string()
                },
                Call::DetachGateway {
                    gateway_id: "igw-1".to_string(),
                    network_id: "vpc-1".to_string()
                },
                Call::DeleteGateway {
                    gateway_id: "igw-1".to_string()
                },
                Call::DeleteNetwork {
                    network_id: "vpc-1".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn rollback_continues_past_failed_deletes() {
        let gateway = ScriptedGateway::with_fail(FailPlan {
            create_subnet_at: Some(1),
            delete_subnet: true,
            ..FailPlan::default()
        });

        let err = provision(&gateway, &request(2), "admin").await.unwrap_err();
        // The original subnet-creation error, not the delete failure
        assert_eq!(err.code(), Some("InvalidSubnet.Range"));

        let calls = gateway.calls();
        assert!(calls.contains(&Call::DeleteGateway {
            gateway_id: "igw-1".to_string()
        }));
        assert!(calls.contains(&Call::DeleteNetwork {
            network_id: "vpc-1".to_string()
        }));
    }

    #[tokio::test]
    async fn network_creation_failure_cleans_up_nothing() {
        let gateway = ScriptedGateway::with_fail(FailPlan {
            create_network: true,
            ..FailPlan::default()
        });

        let err = provision(&gateway, &request(1), "admin").await.unwrap_err();
        assert_eq!(err.code(), Some("VpcLimitExceeded"));
        assert_eq!(gateway.calls().len(), 1);
    }

    #[tokio::test]
    async fn dns_failure_rolls_back_the_network() {
        let gateway = ScriptedGateway::with_fail(FailPlan {
            enable_dns: true,
            ..FailPlan::default()
        });

        let err = provision(&gateway, &request(1), "admin").await.unwrap_err();
        assert_eq!(err.code(), Some("InvalidParameterValue"));
        assert_eq!(
            gateway.calls().last(),
            Some(&Call::DeleteNetwork {
                network_id: "vpc-1".to_string()
            })
        );
        // Nothing but the VPC existed, so no detach/delete-gateway calls
        assert!(!gateway
            .calls()
            .iter()
            .any(|c| matches!(c, Call::DetachGateway { .. } | Call::DeleteGateway { .. })));
    }

    #[tokio::test]
    async fn attach_failure_deletes_gateway_without_detaching() {
        let gateway = ScriptedGateway::with_fail(FailPlan {
            attach_gateway: true,
            ..FailPlan::default()
        });

        let err = provision(&gateway, &request(1), "admin").await.unwrap_err();
        assert_eq!(err.code(), Some("Gateway.NotAttached"));

        let calls = gateway.calls();
        // Never attached, so rollback skips the detach call
        assert!(!calls.iter().any(|c| matches!(c, Call::DetachGateway { .. })));
        assert!(calls.contains(&Call::DeleteGateway {
            gateway_id: "igw-1".to_string()
        }));
        assert_eq!(
            calls.last(),
            Some(&Call::DeleteNetwork {
                network_id: "vpc-1".to_string()
            })
        );
    }
}
