//! Object store port (driven/secondary port)
//!
//! This module defines the interface for the remote object storage the sync
//! engine reads from. The primary implementation targets S3 and
//! S3-compatible endpoints, but the trait is transport-agnostic.
//!
//! ## Design Notes
//!
//! - Returns a typed [`StoreError`] rather than `anyhow::Result` because the
//!   caller must distinguish credential rejection (surfaced as a blocking
//!   error) from ordinary transport failures (logged, call aborted).
//! - The bucket is adapter state, configured once per session; callers deal
//!   only in prefixes and keys.
//! - Listings are recursive and paginated internally; callers receive the
//!   complete key list in the store's listing order.

use std::path::Path;

use thiserror::Error;

use crate::domain::newtypes::{GroupPrefix, ObjectKey};

/// Errors surfaced by object store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Authentication was rejected by the store; fatal to the attempted
    /// operation and never retried
    #[error("Credentials rejected: {0}")]
    Credentials(String),

    /// Any other service or network failure for a single call
    #[error("Transport error: {0}")]
    Transport(String),

    /// The local side of a transfer failed (file creation or write)
    #[error("Local IO error: {0}")]
    LocalIo(String),
}

impl StoreError {
    /// Whether this error is a credentials rejection
    #[must_use]
    pub fn is_credentials(&self) -> bool {
        matches!(self, StoreError::Credentials(_))
    }
}

/// Port trait for remote object storage
///
/// ## Implementation Notes
///
/// - `list_groups` issues a hierarchical (delimiter) listing of the bucket
///   root and returns the common prefixes lexicographically sorted.
/// - `list_objects` returns every key under the prefix, unfiltered;
///   filtering rules live in the domain so refresh and sync agree.
/// - `download_object` streams to the destination path; the caller is
///   responsible for creating parent directories first.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Lists the top-level groups of the bucket, sorted
    async fn list_groups(&self) -> Result<Vec<GroupPrefix>, StoreError>;

    /// Lists all object keys under a group prefix, in listing order
    async fn list_objects(&self, prefix: &GroupPrefix) -> Result<Vec<ObjectKey>, StoreError>;

    /// Fetches a whole object into memory (used for small sidecar files)
    async fn fetch_object(&self, key: &ObjectKey) -> Result<Vec<u8>, StoreError>;

    /// Downloads an object to a local path
    async fn download_object(&self, key: &ObjectKey, dest: &Path) -> Result<(), StoreError>;
}
