//! S3 client construction
//!
//! Builds an SDK client from the configured static credentials, with
//! optional custom endpoint and path-style addressing for S3-compatible
//! stores.

use aws_config::Region;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Builder as S3ConfigBuilder;
use aws_sdk_s3::Client;

use reelsync_core::config::StoreConfig;

/// Region used when the configuration leaves the field empty
const DEFAULT_REGION: &str = "us-east-1";

/// Builds an S3 client from the store configuration
pub fn build_client(config: &StoreConfig) -> Client {
    let credentials = Credentials::new(
        &config.access_key_id,
        &config.secret_access_key,
        None,
        None,
        "reelsync",
    );

    let region = if config.region.trim().is_empty() {
        DEFAULT_REGION.to_string()
    } else {
        config.region.clone()
    };

    let mut builder = S3ConfigBuilder::new()
        .credentials_provider(credentials)
        .region(Region::new(region));

    if let Some(endpoint_url) = &config.endpoint_url {
        builder = builder.endpoint_url(endpoint_url.as_str());
    }

    if config.force_path_style {
        builder = builder.force_path_style(true);
    }

    Client::from_conf(builder.build())
}
