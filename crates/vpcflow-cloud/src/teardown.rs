//! Teardown orchestration
//!
//! Deliberate deletion of a previously provisioned network: subnets first,
//! then the internet gateway, then the VPC itself. Unlike provisioning
//! rollback, every step here is fatal — the first failed delete aborts the
//! whole teardown so the caller learns exactly which resource is stuck.
//!
//! When the final VPC deletion fails, a diagnostic sweep lists the
//! dependents still attached (network interfaces, non-main route tables,
//! VPC endpoints). The sweep only enriches the logs; the original deletion
//! error is always the one returned.

use tracing::{error, info};

use crate::error::Result;
use crate::gateway::NetworkGateway;

/// Delete a network's subnets, gateway, and finally the network itself.
pub async fn teardown(
    gateway: &dyn NetworkGateway,
    network_id: &str,
    subnet_ids: &[String],
    gateway_id: Option<&str>,
) -> Result<()> {
    for subnet_id in subnet_ids {
        if let Err(err) = gateway.delete_subnet(subnet_id).await {
            error!("Could not delete subnet {}: {}", subnet_id, err);
            return Err(err);
        }
        info!("Deleted subnet {}", subnet_id);
    }

    if let Some(gateway_id) = gateway_id {
        if let Err(err) = gateway.detach_gateway(gateway_id, network_id).await {
            error!("Could not detach gateway {}: {}", gateway_id, err);
            return Err(err);
        }
        if let Err(err) = gateway.delete_gateway(gateway_id).await {
            error!("Could not delete gateway {}: {}", gateway_id, err);
            return Err(err);
        }
        info!("Deleted gateway {}", gateway_id);
    }

    if let Err(err) = gateway.delete_network(network_id).await {
        let dependents = gateway.describe_dependents(network_id).await;
        if !dependents.network_interfaces.is_empty() {
            error!(
                "Remaining network interfaces for {}: {}",
                network_id,
                dependents.network_interfaces.join(", ")
            );
        }
        if !dependents.non_main_route_tables.is_empty() {
            error!(
                "Remaining non-main route tables for {}: {}",
                network_id,
                dependents.non_main_route_tables.join(", ")
            );
        }
        if !dependents.endpoints.is_empty() {
            error!(
                "Remaining endpoints for {}: {}",
                network_id,
                dependents.endpoints.join(", ")
            );
        }
        error!("Could not delete network {}: {}", network_id, err);
        return Err(err);
    }
    info!("Deleted network {}", network_id);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CloudError;
    use crate::gateway::DependentResources;
    use crate::testing::{Call, FailPlan, ScriptedGateway};

    fn subnet_ids(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("subnet-{}", i)).collect()
    }

    #[tokio::test]
    async fn deletes_subnets_then_gateway_then_network() {
        let gateway = ScriptedGateway::new();
        teardown(&gateway, "vpc-1", &subnet_ids(2), Some("igw-1"))
            .await
            .unwrap();

        assert_eq!(
            gateway.calls(),
            vec![
                Call::DeleteSubnet {
                    subnet_id: "subnet-1".to_string()
                },
                Call::DeleteSubnet {
                    subnet_id: "subnet-2".to_string()
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
    async fn skips_gateway_steps_when_no_gateway_recorded() {
        let gateway = ScriptedGateway::new();
        teardown(&gateway, "vpc-1", &subnet_ids(1), None)
            .await
            .unwrap();

        assert!(!gateway.calls().iter().any(|c| matches!(
            c,
            Call::DetachGateway { .. } | Call::DeleteGateway { .. }
        )));
    }

    #[tokio::test]
    async fn first_subnet_failure_aborts_immediately() {
        let gateway = ScriptedGateway::with_fail(FailPlan {
            delete_subnet: true,
            ..FailPlan::default()
        });

        let err = teardown(&gateway, "vpc-1", &subnet_ids(3), Some("igw-1"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some("InternalError"));

        // Stops at the first failing delete: no further subnet, gateway, or
        // network calls are attempted.
        assert_eq!(
            gateway.calls(),
            vec![Call::DeleteSubnet {
                subnet_id: "subnet-1".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn network_delete_failure_runs_diagnostic_sweep_and_keeps_original_error() {
        let gateway = ScriptedGateway::with_fail(FailPlan {
            delete_network: Some(CloudError::DependencyConflict("vpc-1".to_string())),
            ..FailPlan::default()
        })
        .with_dependents(DependentResources {
            network_interfaces: vec!["eni-1".to_string()],
            non_main_route_tables: vec!["rtb-7".to_string()],
            endpoints: vec![],
        });

        let err = teardown(&gateway, "vpc-1", &[], None).await.unwrap_err();
        assert!(matches!(err, CloudError::DependencyConflict(_)));

        assert_eq!(
            gateway.calls(),
            vec![
                Call::DeleteNetwork {
                    network_id: "vpc-1".to_string()
                },
                Call::DescribeDependents {
                    network_id: "vpc-1".to_string()
                },
            ]
        );
    }
}
