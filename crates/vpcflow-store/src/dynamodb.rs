//! DynamoDB store backend
//!
//! Table schema: partition key `id` (string), pay-per-request billing.
//! The table is created automatically on first use when it does not
//! already exist; bootstrap runs at most once per store instance. In
//! production, prefer managing the table via IaC and pointing the store
//! at it.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, AttributeValue, BillingMode, KeySchemaElement, KeyType, ReturnValue,
    ScalarAttributeType, TableStatus,
};
use aws_sdk_dynamodb::Client;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};
use vpcflow_core::NetworkRecord;

use crate::error::{Result, StoreError};
use crate::store::NetworkStore;

const DEFAULT_TABLE_NAME: &str = "vpc_resources";
const TABLE_WAIT_ATTEMPTS: u32 = 30;

/// [`NetworkStore`] backed by Amazon DynamoDB
pub struct DynamoStore {
    client: Client,
    table_name: String,
    // Table bootstrap runs once; later calls reuse the verified table.
    table_ready: OnceCell<()>,
}

impl DynamoStore {
    /// Build a store from the ambient AWS environment.
    ///
    /// `VPCFLOW_TABLE_NAME` overrides the table name and
    /// `DYNAMODB_ENDPOINT_URL` points the client at a local DynamoDB.
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        let mut builder = aws_sdk_dynamodb::config::Builder::from(&config);
        if let Ok(url) = std::env::var("DYNAMODB_ENDPOINT_URL") {
            if !url.is_empty() {
                builder = builder.endpoint_url(url);
            }
        }
        let table_name = std::env::var("VPCFLOW_TABLE_NAME")
            .unwrap_or_else(|_| DEFAULT_TABLE_NAME.to_string());

        Self::with_client(Client::from_conf(builder.build()), table_name)
    }

    pub fn with_client(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
            table_ready: OnceCell::new(),
        }
    }

    async fn table(&self) -> Result<&str> {
        self.table_ready
            .get_or_try_init(|| self.ensure_table())
            .await?;
        Ok(&self.table_name)
    }

    /// Create the table when it does not exist, then wait for it to become
    /// active.
    async fn ensure_table(&self) -> Result<()> {
        let created = self
            .client
            .create_table()
            .table_name(&self.table_name)
            .key_schema(
                KeySchemaElement::builder()
                    .attribute_name("id")
                    .key_type(KeyType::Hash)
                    .build()
                    .map_err(|err| StoreError::Api(err.to_string()))?,
            )
            .attribute_definitions(
                AttributeDefinition::builder()
                    .attribute_name("id")
                    .attribute_type(ScalarAttributeType::S)
                    .build()
                    .map_err(|err| StoreError::Api(err.to_string()))?,
            )
            .billing_mode(BillingMode::PayPerRequest)
            .send()
            .await;

        match created {
            Ok(_) => {
                info!("DynamoDB table '{}' created", self.table_name);
                self.wait_for_active().await
            }
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_resource_in_use_exception() {
                    // Table already exists — reuse it
                    debug!("DynamoDB table '{}' already exists", self.table_name);
                    Ok(())
                } else {
                    Err(StoreError::Api(
                        DisplayErrorContext(&service_err).to_string(),
                    ))
                }
            }
        }
    }

    async fn wait_for_active(&self) -> Result<()> {
        for _ in 0..TABLE_WAIT_ATTEMPTS {
            let resp = self
                .client
                .describe_table()
                .table_name(&self.table_name)
                .send()
                .await
                .map_err(|err| StoreError::Api(DisplayErrorContext(&err).to_string()))?;

            if resp
                .table()
                .and_then(|t| t.table_status())
                .is_some_and(|status| *status == TableStatus::Active)
            {
                return Ok(());
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
        Err(StoreError::TableNotReady(self.table_name.clone()))
    }
}

#[async_trait]
impl NetworkStore for DynamoStore {
    async fn save(&self, record: &NetworkRecord) -> Result<()> {
        let table = self.table().await?.to_string();
        let item = serde_dynamo::aws_sdk_dynamodb_1::to_item(record)?;

        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|err| StoreError::Api(DisplayErrorContext(&err).to_string()))?;

        info!("Saved record for network '{}'", record.id);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<NetworkRecord>> {
        let table = self.table().await?.to_string();
        let resp = self
            .client
            .get_item()
            .table_name(table)
            .key("id", AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(|err| StoreError::Api(DisplayErrorContext(&err).to_string()))?;

        match resp.item {
            Some(item) => Ok(Some(serde_dynamo::aws_sdk_dynamodb_1::from_item(item)?)),
            None => Ok(None),
        }
    }

    async fn list_all(&self) -> Result<Vec<NetworkRecord>> {
        let table = self.table().await?.to_string();

        // Full scan, following LastEvaluatedKey until the table is exhausted
        let mut items = Vec::new();
        let mut start_key = None;
        loop {
            let resp = self
                .client
                .scan()
                .table_name(&table)
                .set_exclusive_start_key(start_key)
                .send()
                .await
                .map_err(|err| StoreError::Api(DisplayErrorContext(&err).to_string()))?;

            items.extend(resp.items.unwrap_or_default());
            start_key = resp.last_evaluated_key;
            if start_key.is_none() {
                break;
            }
        }

        debug!("Listed {} record(s)", items.len());
        Ok(serde_dynamo::aws_sdk_dynamodb_1::from_items(items)?)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let table = self.table().await?.to_string();
        let resp = self
            .client
            .delete_item()
            .table_name(table)
            .key("id", AttributeValue::S(id.to_string()))
            // ALL_OLD reveals whether the item actually existed
            .return_values(ReturnValue::AllOld)
            .send()
            .await
            .map_err(|err| StoreError::Api(DisplayErrorContext(&err).to_string()))?;

        let existed = resp.attributes.is_some();
        if existed {
            info!("Deleted record for network '{}'", id);
        } else {
            warn!("Delete called for non-existent network '{}'", id);
        }
        Ok(existed)
    }
}
