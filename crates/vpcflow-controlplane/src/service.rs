//! Network service
//!
//! Persistence only ever happens after a fully successful provisioning
//! run, so a failed creation leaves no stored record. Removal is the
//! other way around: provider resources go first, and the record is only
//! dropped once teardown succeeded. `forget` skips the provider entirely
//! for callers that just want the record gone.

use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use vpcflow_cloud::{
    provision, teardown, CloudError, LiveNetwork, LiveSubnet, NetworkGateway,
};
use vpcflow_core::{NetworkRecord, NetworkRequest};
use vpcflow_store::NetworkStore;

use crate::error::{ControlError, Result};

/// Service boundary for the transport façade
pub struct NetworkService {
    gateway: Arc<dyn NetworkGateway>,
    store: Arc<dyn NetworkStore>,
}

/// List of stored records, in the transport shape
#[derive(Debug, Serialize)]
pub struct NetworkList {
    pub count: usize,
    pub records: Vec<NetworkRecord>,
}

/// Live provider-side view of a stored network, for refreshing stale
/// records
#[derive(Debug, Serialize)]
pub struct LiveNetworkView {
    pub network: LiveNetwork,
    pub subnets: Vec<LiveSubnet>,
}

impl NetworkService {
    pub fn new(gateway: Arc<dyn NetworkGateway>, store: Arc<dyn NetworkStore>) -> Self {
        Self { gateway, store }
    }

    /// Validate, provision, and persist a network.
    pub async fn provision(
        &self,
        request: &NetworkRequest,
        created_by: &str,
    ) -> Result<NetworkRecord> {
        request.validate()?;

        info!(
            "User '{}' provisioning network '{}' ({}) with {} subnet(s)",
            created_by,
            request.name,
            request.cidr_block,
            request.subnets.len()
        );

        let record = provision(self.gateway.as_ref(), request, created_by).await?;
        self.store.save(&record).await?;

        info!("Network '{}' provisioned and persisted", record.id);
        Ok(record)
    }

    /// Fetch a stored record by network id.
    pub async fn fetch(&self, id: &str) -> Result<NetworkRecord> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| ControlError::NotFound(id.to_string()))
    }

    /// Every stored record, with the count the transport contract wants.
    pub async fn list(&self) -> Result<NetworkList> {
        let records = self.store.list_all().await?;
        Ok(NetworkList {
            count: records.len(),
            records,
        })
    }

    /// Fetch the live provider state for a stored network.
    pub async fn refresh(&self, id: &str) -> Result<LiveNetworkView> {
        self.fetch(id).await?;

        let network = self
            .gateway
            .describe_network(id)
            .await
            .map_err(|err| not_found_or_cloud(err, id))?;
        let subnets = self
            .gateway
            .describe_subnets(id)
            .await
            .map_err(|err| not_found_or_cloud(err, id))?;

        Ok(LiveNetworkView { network, subnets })
    }

    /// Tear down the provider resources for a stored network, then drop
    /// the record. The record is kept when teardown fails, so the caller
    /// can retry.
    pub async fn remove(&self, id: &str) -> Result<()> {
        let record = self.fetch(id).await?;
        let subnet_ids: Vec<String> = record.subnets.iter().map(|s| s.id.clone()).collect();

        teardown(
            self.gateway.as_ref(),
            &record.id,
            &subnet_ids,
            record.gateway_id.as_deref(),
        )
        .await
        .map_err(|err| match err {
            CloudError::DependencyConflict(_) => ControlError::DependencyConflict(id.to_string()),
            other => ControlError::Cloud(other),
        })?;

        self.store.delete(id).await?;
        info!("Network '{}' torn down and forgotten", id);
        Ok(())
    }

    /// Drop the stored record without touching provider resources.
    pub async fn forget(&self, id: &str) -> Result<()> {
        if !self.store.delete(id).await? {
            return Err(ControlError::NotFound(id.to_string()));
        }
        info!("Record for network '{}' forgotten", id);
        Ok(())
    }
}

fn not_found_or_cloud(err: CloudError, id: &str) -> ControlError {
    match err {
        CloudError::NotFound(_) => ControlError::NotFound(id.to_string()),
        other => ControlError::Cloud(other),
    }
}
