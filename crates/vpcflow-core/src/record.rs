//! Durable resource records
//!
//! A [`NetworkRecord`] is written exactly once, after the whole provisioning
//! sequence has succeeded, and is never mutated afterwards. The same shape is
//! persisted and returned to the API caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Record of a provisioned network and its child resources
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkRecord {
    /// Provider-assigned VPC id, primary key in the store
    pub id: String,

    /// Human-readable name, also applied as the `Name` tag
    pub name: String,

    /// IPv4 CIDR block of the VPC
    pub cidr_block: String,

    /// Internet gateway id, present once the gateway step completed
    pub gateway_id: Option<String>,

    /// Provider region the resources live in
    pub region: String,

    /// Subnets in creation order
    pub subnets: Vec<SubnetRecord>,

    /// Caller-supplied tags applied to every created resource
    pub tags: BTreeMap<String, String>,

    /// Identity of the requesting caller
    pub created_by: String,

    /// Creation timestamp (UTC)
    pub created_at: DateTime<Utc>,

    /// Lifecycle status as seen by the orchestrator, not provider-verified
    pub status: NetworkStatus,
}

/// Subnet belonging to a [`NetworkRecord`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubnetRecord {
    /// Provider-assigned subnet id
    pub id: String,

    /// IPv4 CIDR block of the subnet
    pub cidr_block: String,

    /// Availability zone the subnet was created in
    pub availability_zone: String,

    /// Name tag (auto-generated when the caller omitted one)
    pub name: String,
}

/// Lifecycle status of a stored network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkStatus {
    Active,
}

impl std::fmt::Display for NetworkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkStatus::Active => write!(f, "active"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_round_trips_through_json() {
        let record = NetworkRecord {
            id: "vpc-123".into(),
            name: "demo-vpc".into(),
            cidr_block: "10.0.0.0/16".into(),
            gateway_id: Some("igw-1".into()),
            region: "us-east-1".into(),
            subnets: vec![SubnetRecord {
                id: "subnet-1".into(),
                cidr_block: "10.0.1.0/24".into(),
                availability_zone: "us-east-1a".into(),
                name: "public-1".into(),
            }],
            tags: BTreeMap::from([("Environment".to_string(), "test".to_string())]),
            created_by: "admin".into(),
            created_at: Utc::now(),
            status: NetworkStatus::Active,
        };

        let json = serde_json::to_string(&record).unwrap();
        let back: NetworkRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn status_serializes_as_snake_case() {
        let json = serde_json::to_string(&NetworkStatus::Active).unwrap();
        assert_eq!(json, "\"active\"");
    }
}
