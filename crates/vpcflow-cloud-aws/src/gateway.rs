//! EC2 network gateway implementation

use async_trait::async_trait;
use aws_sdk_ec2::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_ec2::types::{
    AttributeBooleanValue, Filter, ResourceType, Tag, TagSpecification,
};
use aws_sdk_ec2::Client;
use tracing::{info, warn};
use vpcflow_cloud::{
    CloudError, DependentResources, LiveNetwork, LiveSubnet, NetworkGateway, Result,
};

use crate::client;

type Tags = std::collections::BTreeMap<String, String>;

/// [`NetworkGateway`] backed by aws-sdk-ec2
pub struct Ec2Gateway {
    client: Client,
    region: String,
}

impl Ec2Gateway {
    /// Gateway over the shared process-wide client.
    pub async fn from_env() -> Self {
        let (client, region) = client::shared().await;
        Self {
            client: client.clone(),
            region: region.clone(),
        }
    }

    pub fn with_client(client: Client, region: impl Into<String>) -> Self {
        Self {
            client,
            region: region.into(),
        }
    }
}

/// Build the TagSpecifications entry applied to a created resource:
/// a `Name` tag plus every caller-supplied tag.
fn tag_specs(resource_type: ResourceType, name: &str, tags: &Tags) -> TagSpecification {
    let mut all = vec![Tag::builder().key("Name").value(name).build()];
    all.extend(
        tags.iter()
            .map(|(k, v)| Tag::builder().key(k).value(v).build()),
    );
    TagSpecification::builder()
        .resource_type(resource_type)
        .set_tags(Some(all))
        .build()
}

/// Map a provider error code to the domain error taxonomy.
fn classify(code: String, message: String) -> CloudError {
    match code.as_str() {
        "DependencyViolation" => CloudError::DependencyConflict(message),
        "InvalidVpcID.NotFound" => CloudError::NotFound(message),
        _ => CloudError::Provider { code, message },
    }
}

/// Normalize an SDK failure into a [`CloudError`].
fn normalize<E, R>(err: SdkError<E, R>) -> CloudError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    match err.code() {
        Some(code) => {
            let code = code.to_string();
            let message = err
                .message()
                .map(str::to_string)
                .unwrap_or_else(|| code.clone());
            classify(code, message)
        }
        // Transport failures and the like carry no EC2 error code
        None => CloudError::provider("Unknown", DisplayErrorContext(&err).to_string()),
    }
}

/// The EC2 API wraps created resources in optional response fields; a
/// missing id means a malformed response, not a typed failure.
fn missing_field(what: &str) -> CloudError {
    CloudError::provider(
        "MalformedResponse",
        format!("provider response is missing {}", what),
    )
}

fn name_tag(tags: Option<&[Tag]>) -> Option<String> {
    tags?
        .iter()
        .find(|t| t.key() == Some("Name"))
        .and_then(|t| t.value())
        .map(str::to_string)
}

#[async_trait]
impl NetworkGateway for Ec2Gateway {
    fn region(&self) -> &str {
        &self.region
    }

    async fn create_network(&self, cidr_block: &str, name: &str, tags: &Tags) -> Result<String> {
        let resp = self
            .client
            .create_vpc()
            .cidr_block(cidr_block)
            .tag_specifications(tag_specs(ResourceType::Vpc, name, tags))
            .send()
            .await
            .map_err(normalize)?;

        resp.vpc
            .and_then(|vpc| vpc.vpc_id)
            .ok_or_else(|| missing_field("VpcId"))
    }

    async fn enable_dns_attributes(&self, network_id: &str) -> Result<()> {
        self.client
            .modify_vpc_attribute()
            .vpc_id(network_id)
            .enable_dns_hostnames(AttributeBooleanValue::builder().value(true).build())
            .send()
            .await
            .map_err(normalize)?;

        self.client
            .modify_vpc_attribute()
            .vpc_id(network_id)
            .enable_dns_support(AttributeBooleanValue::builder().value(true).build())
            .send()
            .await
            .map_err(normalize)?;

        Ok(())
    }

    async fn create_gateway(&self, name: &str, tags: &Tags) -> Result<String> {
        let resp = self
            .client
            .create_internet_gateway()
            .tag_specifications(tag_specs(ResourceType::InternetGateway, name, tags))
            .send()
            .await
            .map_err(normalize)?;

        resp.internet_gateway
            .and_then(|igw| igw.internet_gateway_id)
            .ok_or_else(|| missing_field("InternetGatewayId"))
    }

    async fn attach_gateway(&self, gateway_id: &str, network_id: &str) -> Result<()> {
        self.client
            .attach_internet_gateway()
            .internet_gateway_id(gateway_id)
            .vpc_id(network_id)
            .send()
            .await
            .map_err(normalize)?;
        info!("Attached gateway {} to network {}", gateway_id, network_id);
        Ok(())
    }

    async fn create_subnet(
        &self,
        network_id: &str,
        cidr_block: &str,
        availability_zone: &str,
        name: &str,
        tags: &Tags,
    ) -> Result<String> {
        let resp = self
            .client
            .create_subnet()
            .vpc_id(network_id)
            .cidr_block(cidr_block)
            .availability_zone(availability_zone)
            .tag_specifications(tag_specs(ResourceType::Subnet, name, tags))
            .send()
            .await
            .map_err(|err| {
                warn!(
                    "Subnet creation failed for {} in {}: {}",
                    cidr_block,
                    availability_zone,
                    err.code().unwrap_or("Unknown")
                );
                normalize(err)
            })?;

        resp.subnet
            .and_then(|subnet| subnet.subnet_id)
            .ok_or_else(|| missing_field("SubnetId"))
    }

    async fn delete_subnet(&self, subnet_id: &str) -> Result<()> {
        self.client
            .delete_subnet()
            .subnet_id(subnet_id)
            .send()
            .await
            .map_err(normalize)?;
        Ok(())
    }

    async fn detach_gateway(&self, gateway_id: &str, network_id: &str) -> Result<()> {
        self.client
            .detach_internet_gateway()
            .internet_gateway_id(gateway_id)
            .vpc_id(network_id)
            .send()
            .await
            .map_err(normalize)?;
        Ok(())
    }

    async fn delete_gateway(&self, gateway_id: &str) -> Result<()> {
        self.client
            .delete_internet_gateway()
            .internet_gateway_id(gateway_id)
            .send()
            .await
            .map_err(normalize)?;
        Ok(())
    }

    async fn delete_network(&self, network_id: &str) -> Result<()> {
        self.client
            .delete_vpc()
            .vpc_id(network_id)
            .send()
            .await
            .map_err(normalize)?;
        Ok(())
    }

    async fn describe_network(&self, network_id: &str) -> Result<LiveNetwork> {
        let resp = self
            .client
            .describe_vpcs()
            .vpc_ids(network_id)
            .send()
            .await
            .map_err(normalize)?;

        let vpc = resp
            .vpcs
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| CloudError::NotFound(network_id.to_string()))?;

        Ok(LiveNetwork {
            id: network_id.to_string(),
            name: name_tag(vpc.tags.as_deref()).unwrap_or_else(|| network_id.to_string()),
            cidr_block: vpc.cidr_block.unwrap_or_default(),
            state: vpc
                .state
                .map(|s| s.as_str().to_string())
                .unwrap_or_default(),
        })
    }

    async fn describe_subnets(&self, network_id: &str) -> Result<Vec<LiveSubnet>> {
        let resp = self
            .client
            .describe_subnets()
            .filters(vpc_filter(network_id))
            .send()
            .await
            .map_err(normalize)?;

        Ok(resp
            .subnets
            .unwrap_or_default()
            .into_iter()
            .map(|subnet| LiveSubnet {
                name: name_tag(subnet.tags.as_deref()).unwrap_or_default(),
                id: subnet.subnet_id.unwrap_or_default(),
                cidr_block: subnet.cidr_block.unwrap_or_default(),
                availability_zone: subnet.availability_zone.unwrap_or_default(),
            })
            .collect())
    }

    async fn describe_dependents(&self, network_id: &str) -> DependentResources {
        let mut dependents = DependentResources::default();

        match self
            .client
            .describe_network_interfaces()
            .filters(vpc_filter(network_id))
            .send()
            .await
        {
            Ok(resp) => {
                dependents.network_interfaces = resp
                    .network_interfaces
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|eni| eni.network_interface_id)
                    .collect();
            }
            Err(err) => warn!(
                "Failed to describe network interfaces for {}: {}",
                network_id,
                DisplayErrorContext(&err)
            ),
        }

        match self
            .client
            .describe_route_tables()
            .filters(vpc_filter(network_id))
            .send()
            .await
        {
            Ok(resp) => {
                dependents.non_main_route_tables = resp
                    .route_tables
                    .unwrap_or_default()
                    .into_iter()
                    .filter(|rt| {
                        !rt.associations()
                            .iter()
                            .any(|assoc| assoc.main() == Some(true))
                    })
                    .filter_map(|rt| rt.route_table_id)
                    .collect();
            }
            Err(err) => warn!(
                "Failed to describe route tables for {}: {}",
                network_id,
                DisplayErrorContext(&err)
            ),
        }

        match self
            .client
            .describe_vpc_endpoints()
            .filters(vpc_filter(network_id))
            .send()
            .await
        {
            Ok(resp) => {
                dependents.endpoints = resp
                    .vpc_endpoints
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|ep| ep.vpc_endpoint_id)
                    .collect();
            }
            Err(err) => warn!(
                "Failed to describe VPC endpoints for {}: {}",
                network_id,
                DisplayErrorContext(&err)
            ),
        }

        dependents
    }
}

fn vpc_filter(network_id: &str) -> Filter {
    Filter::builder().name("vpc-id").values(network_id).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_specs_puts_name_first_and_merges_caller_tags() {
        let tags = Tags::from([("Environment".to_string(), "prod".to_string())]);
        let spec = tag_specs(ResourceType::Vpc, "demo-vpc", &tags);

        assert_eq!(spec.resource_type(), Some(&ResourceType::Vpc));
        let rendered: Vec<(&str, &str)> = spec
            .tags()
            .iter()
            .map(|t| (t.key().unwrap(), t.value().unwrap()))
            .collect();
        assert_eq!(
            rendered,
            [("Name", "demo-vpc"), ("Environment", "prod")]
        );
    }

    #[test]
    fn dependency_violation_maps_to_conflict() {
        let err = classify(
            "DependencyViolation".to_string(),
            "vpc has dependents".to_string(),
        );
        assert!(matches!(err, CloudError::DependencyConflict(_)));
    }

    #[test]
    fn unknown_vpc_maps_to_not_found() {
        let err = classify(
            "InvalidVpcID.NotFound".to_string(),
            "vpc-404 does not exist".to_string(),
        );
        assert!(matches!(err, CloudError::NotFound(_)));
    }

    #[test]
    fn other_codes_stay_provider_errors() {
        let err = classify(
            "VpcLimitExceeded".to_string(),
            "too many VPCs".to_string(),
        );
        assert_eq!(err.code(), Some("VpcLimitExceeded"));
    }
}
