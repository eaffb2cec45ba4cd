//! Injected persistence interfaces.
//!
//! The workflow never talks to Shopify directly; it goes through these traits
//! so a real Admin API client, an in-memory store, or a future database can be
//! substituted without touching call sites. Batch writes are per-key
//! best-effort: individual failures are reported back as [`FailedWrite`]
//! entries instead of aborting the whole operation.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{AuditEntry, Metafield, NewMetafield, RawResourceContent, ResourceRef};

#[derive(Debug, Error)]
pub enum StoreError {
    /// The resource (or a required record on it) does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Network-level or backend failure reaching the external system.
    #[error("store transport error: {0}")]
    Transport(String),

    /// A stored value could not be serialized or parsed.
    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Local I/O failure (audit log file).
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single key that failed to persist (or delete) during a batch operation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FailedWrite {
    pub key: String,
    pub reason: String,
}

/// Namespaced key/value metadata attached to a resource.
///
/// Every call is a live round trip to the backing system; implementations hold
/// no caching layer of their own.
#[async_trait]
pub trait MetafieldStore: Send + Sync {
    /// Fetches all metafields on the resource within the store's namespace.
    async fn get_metafields(&self, resource: ResourceRef) -> Result<Vec<Metafield>, StoreError>;

    /// Writes each metafield in turn, overwriting existing values for the same
    /// key. Returns the keys that failed; an `Ok` with a non-empty vec is a
    /// partial success.
    async fn set_metafields(
        &self,
        resource: ResourceRef,
        fields: Vec<NewMetafield>,
    ) -> Result<Vec<FailedWrite>, StoreError>;

    /// Deletes each named key in turn, skipping keys that do not exist.
    /// Returns the keys whose deletion failed.
    async fn delete_metafields(
        &self,
        resource: ResourceRef,
        keys: &[String],
    ) -> Result<Vec<FailedWrite>, StoreError>;
}

/// Read and restore the customer-visible title/body of a resource.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Fetches the resource's current title and body.
    async fn fetch_content(&self, resource: ResourceRef)
        -> Result<RawResourceContent, StoreError>;

    /// Overwrites the resource's title and body. Works for both products and
    /// articles.
    async fn restore_content(
        &self,
        resource: ResourceRef,
        content: &RawResourceContent,
    ) -> Result<(), StoreError>;
}

/// Combined store surface the workflow operates over.
pub trait ContentStore: MetafieldStore + ResourceStore {}

impl<T: MetafieldStore + ResourceStore> ContentStore for T {}

/// Append-only sink for rollback audit records.
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn append(&self, entry: &AuditEntry) -> Result<(), StoreError>;
}
