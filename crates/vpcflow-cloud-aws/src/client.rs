//! Shared EC2 client
//!
//! The SDK client is built once per process from the ambient AWS
//! environment (credential chain, `AWS_REGION`, ...) and shared by every
//! gateway instance. The client is internally reference-counted and safe
//! for concurrent use; no teardown is required at process exit.

use aws_config::BehaviorVersion;
use aws_sdk_ec2::Client;
use tokio::sync::OnceCell;

const DEFAULT_REGION: &str = "us-east-1";

static SHARED: OnceCell<(Client, String)> = OnceCell::const_new();

/// The process-wide EC2 client and its resolved region name.
///
/// `EC2_ENDPOINT_URL` overrides the endpoint for local stacks
/// (e.g. LocalStack).
pub async fn shared() -> &'static (Client, String) {
    SHARED
        .get_or_init(|| async {
            let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
            let region = config
                .region()
                .map(|r| r.as_ref().to_string())
                .unwrap_or_else(|| DEFAULT_REGION.to_string());

            let mut builder = aws_sdk_ec2::config::Builder::from(&config);
            if let Ok(url) = std::env::var("EC2_ENDPOINT_URL") {
                if !url.is_empty() {
                    builder = builder.endpoint_url(url);
                }
            }

            (Client::from_conf(builder.build()), region)
        })
        .await
}
