//! Provisioning request types
//!
//! Validation runs before any provider call: the VPC CIDR must parse and its
//! prefix length must be practical for a VPC (AWS allows /16 through /28).
//! Subnet CIDRs are only checked for syntax — containment within the VPC
//! block is left to the provider, which rejects invalid subnets at creation
//! time and triggers rollback.

use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Result, ValidationError};

/// Request to provision a network with one or more subnets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkRequest {
    /// IPv4 CIDR block for the VPC, e.g. `10.0.0.0/16`
    pub cidr_block: String,

    /// Name tag applied to the VPC and all child resources
    #[serde(default = "default_name")]
    pub name: String,

    /// One or more subnets to create inside the VPC
    pub subnets: Vec<SubnetRequest>,

    /// Additional tags applied to every created resource
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

fn default_name() -> String {
    "my-vpc".to_string()
}

/// A single subnet to be created inside the VPC
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubnetRequest {
    /// IPv4 CIDR block for the subnet, e.g. `10.0.1.0/24`
    pub cidr_block: String,

    /// Availability zone, e.g. `us-east-1a`
    pub availability_zone: String,

    /// Name tag; auto-generated as `{vpc_name}-subnet-{n}` when omitted
    #[serde(default)]
    pub name: Option<String>,
}

impl NetworkRequest {
    /// Check the request shape before any provider call is attempted.
    pub fn validate(&self) -> Result<()> {
        let net: Ipv4Net = self
            .cidr_block
            .parse()
            .map_err(|_| ValidationError::InvalidCidr(self.cidr_block.clone()))?;

        if net.prefix_len() < 16 || net.prefix_len() > 28 {
            return Err(ValidationError::PrefixOutOfRange(net.prefix_len()));
        }

        if self.subnets.is_empty() {
            return Err(ValidationError::NoSubnets);
        }

        for subnet in &self.subnets {
            subnet
                .cidr_block
                .parse::<Ipv4Net>()
                .map_err(|_| ValidationError::InvalidSubnetCidr(subnet.cidr_block.clone()))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(cidr: &str, subnet_cidrs: &[&str]) -> NetworkRequest {
        NetworkRequest {
            cidr_block: cidr.to_string(),
            name: "demo-vpc".to_string(),
            subnets: subnet_cidrs
                .iter()
                .map(|c| SubnetRequest {
                    cidr_block: c.to_string(),
                    availability_zone: "us-east-1a".to_string(),
                    name: None,
                })
                .collect(),
            tags: BTreeMap::new(),
        }
    }

    #[test]
    fn accepts_valid_request() {
        assert!(request("10.0.0.0/16", &["10.0.1.0/24"]).validate().is_ok());
        assert!(request("172.16.0.0/28", &["172.16.0.0/28"]).validate().is_ok());
    }

    #[test]
    fn rejects_prefix_too_wide() {
        let err = request("10.0.0.0/15", &["10.0.1.0/24"]).validate().unwrap_err();
        assert_eq!(err, ValidationError::PrefixOutOfRange(15));
    }

    #[test]
    fn rejects_prefix_too_narrow() {
        let err = request("10.0.0.0/29", &["10.0.0.0/29"]).validate().unwrap_err();
        assert_eq!(err, ValidationError::PrefixOutOfRange(29));
    }

    #[test]
    fn rejects_malformed_cidr() {
        let err = request("not-a-cidr", &["10.0.1.0/24"]).validate().unwrap_err();
        assert_eq!(err, ValidationError::InvalidCidr("not-a-cidr".to_string()));
    }

    #[test]
    fn rejects_empty_subnet_list() {
        let err = request("10.0.0.0/16", &[]).validate().unwrap_err();
        assert_eq!(err, ValidationError::NoSubnets);
    }

    #[test]
    fn rejects_malformed_subnet_cidr() {
        let err = request("10.0.0.0/16", &["10.0.1.0/24", "bogus"])
            .validate()
            .unwrap_err();
        assert_eq!(err, ValidationError::InvalidSubnetCidr("bogus".to_string()));
    }

    #[test]
    fn containment_is_not_checked_here() {
        // Subnet outside the VPC block parses fine; the provider rejects it.
        assert!(request("10.0.0.0/16", &["192.168.0.0/24"]).validate().is_ok());
    }
}
