//! `ObjectStore` implementation backed by S3
//!
//! Listings use explicit continuation-token loops so every page is walked;
//! downloads stream the object body to disk without buffering whole files.

use std::path::Path;

use aws_sdk_s3::Client;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use reelsync_core::config::StoreConfig;
use reelsync_core::domain::newtypes::{GroupPrefix, ObjectKey};
use reelsync_core::ports::object_store::{ObjectStore, StoreError};

use crate::client::build_client;

/// S3-backed object store for one configured bucket
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Creates a store from the session configuration
    #[must_use]
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            client: build_client(config),
            bucket: config.bucket.clone(),
        }
    }

    /// Creates a store from an existing client (useful for tests)
    #[must_use]
    pub fn with_client(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

/// Classifies an SDK failure into the port's error taxonomy
///
/// The SDK buries service error codes inside nested error types; matching
/// on the rendered text keeps classification uniform across the four call
/// sites. Anything that is not recognizably an authentication rejection is
/// a transport error.
fn classify_error(operation: &str, err: impl std::fmt::Debug) -> StoreError {
    let text = format!("{operation}: {err:?}");
    let lowered = text.to_lowercase();

    let credential_markers = [
        "invalidaccesskeyid",
        "signaturedoesnotmatch",
        "accessdenied",
        "credential",
        "unauthorized",
        "authorizationheadermalformed",
    ];
    if credential_markers.iter().any(|m| lowered.contains(m)) {
        StoreError::Credentials(text)
    } else {
        StoreError::Transport(text)
    }
}

#[async_trait::async_trait]
impl ObjectStore for S3ObjectStore {
    async fn list_groups(&self) -> Result<Vec<GroupPrefix>, StoreError> {
        let mut prefixes = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .delimiter("/");
            if let Some(token) = &continuation_token {
                request = request.continuation_token(token);
            }

            let response = request
                .send()
                .await
                .map_err(|e| classify_error("list groups", e))?;

            for common_prefix in response.common_prefixes() {
                let Some(prefix) = common_prefix.prefix() else {
                    continue;
                };
                match GroupPrefix::new(prefix.to_string()) {
                    Ok(p) => prefixes.push(p),
                    Err(err) => warn!(prefix, %err, "Skipping malformed common prefix"),
                }
            }

            if !response.is_truncated().unwrap_or(false) {
                break;
            }
            continuation_token = response.next_continuation_token().map(|s| s.to_string());
        }

        prefixes.sort();
        debug!(bucket = %self.bucket, groups = prefixes.len(), "Listed top-level groups");
        Ok(prefixes)
    }

    async fn list_objects(&self, prefix: &GroupPrefix) -> Result<Vec<ObjectKey>, StoreError> {
        let mut keys = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix.as_str());
            if let Some(token) = &continuation_token {
                request = request.continuation_token(token);
            }

            let response = request
                .send()
                .await
                .map_err(|e| classify_error("list objects", e))?;

            for object in response.contents() {
                let Some(key) = object.key() else {
                    continue;
                };
                match ObjectKey::new(key.to_string()) {
                    Ok(k) => keys.push(k),
                    Err(err) => warn!(key, %err, "Skipping malformed object key"),
                }
            }

            if !response.is_truncated().unwrap_or(false) {
                break;
            }
            continuation_token = response.next_continuation_token().map(|s| s.to_string());
        }

        debug!(prefix = %prefix, objects = keys.len(), "Listed group objects");
        Ok(keys)
    }

    async fn fetch_object(&self, key: &ObjectKey) -> Result<Vec<u8>, StoreError> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .send()
            .await
            .map_err(|e| classify_error("fetch object", e))?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| StoreError::Transport(format!("read body of {key}: {e}")))?;

        Ok(data.into_bytes().to_vec())
    }

    async fn download_object(&self, key: &ObjectKey, dest: &Path) -> Result<(), StoreError> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .send()
            .await
            .map_err(|e| classify_error("download object", e))?;

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| StoreError::LocalIo(format!("create {}: {e}", dest.display())))?;

        let mut body = response.body;
        while let Some(chunk) = body
            .try_next()
            .await
            .map_err(|e| StoreError::Transport(format!("read body of {key}: {e}")))?
        {
            file.write_all(&chunk)
                .await
                .map_err(|e| StoreError::LocalIo(format!("write {}: {e}", dest.display())))?;
        }

        file.flush()
            .await
            .map_err(|e| StoreError::LocalIo(format!("flush {}: {e}", dest.display())))?;

        debug!(key = %key, dest = %dest.display(), "Downloaded object");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_credentials_markers() {
        for marker in [
            "InvalidAccessKeyId: the key does not exist",
            "SignatureDoesNotMatch",
            "AccessDenied",
            "no credentials in the property bag",
        ] {
            assert!(
                classify_error("op", marker).is_credentials(),
                "expected credentials classification for {marker:?}"
            );
        }
    }

    #[test]
    fn test_classify_transport_fallback() {
        let err = classify_error("op", "connection reset by peer");
        assert!(matches!(err, StoreError::Transport(_)));
    }

    #[test]
    fn test_classify_keeps_operation_context() {
        let err = classify_error("list groups", "timeout");
        assert!(err.to_string().contains("list groups"));
    }
}
