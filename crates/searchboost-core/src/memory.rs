//! In-memory [`ContentStore`] and [`AuditLog`] implementations.
//!
//! Used by workflow and server tests, and usable for local development without
//! a Shopify store. Supports per-key failure injection to exercise the
//! partial-write paths.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::store::{AuditLog, FailedWrite, MetafieldStore, ResourceStore, StoreError};
use crate::types::{
    AuditEntry, Metafield, NewMetafield, RawResourceContent, ResourceRef, METAFIELD_NAMESPACE,
};

#[derive(Debug, Default)]
struct ResourceState {
    content: RawResourceContent,
    metafields: HashMap<String, Metafield>,
}

#[derive(Debug, Default)]
struct Inner {
    resources: HashMap<ResourceRef, ResourceState>,
    fail_keys: HashSet<String>,
    next_id: u64,
}

/// Thread-safe in-memory store keyed by [`ResourceRef`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a resource with its current title/body.
    pub fn seed_resource(&self, resource: ResourceRef, content: RawResourceContent) {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        inner.resources.entry(resource).or_default().content = content;
    }

    /// Makes every subsequent write or delete of `key` fail.
    pub fn fail_key(&self, key: &str) {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        inner.fail_keys.insert(key.to_owned());
    }

    /// Current title/body of a seeded resource, if present.
    #[must_use]
    pub fn content(&self, resource: ResourceRef) -> Option<RawResourceContent> {
        let inner = self.inner.lock().expect("memory store poisoned");
        inner.resources.get(&resource).map(|r| r.content.clone())
    }
}

#[async_trait]
impl MetafieldStore for MemoryStore {
    async fn get_metafields(&self, resource: ResourceRef) -> Result<Vec<Metafield>, StoreError> {
        let inner = self.inner.lock().expect("memory store poisoned");
        let state = inner
            .resources
            .get(&resource)
            .ok_or_else(|| StoreError::NotFound(resource.to_string()))?;
        Ok(state.metafields.values().cloned().collect())
    }

    async fn set_metafields(
        &self,
        resource: ResourceRef,
        fields: Vec<NewMetafield>,
    ) -> Result<Vec<FailedWrite>, StoreError> {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        if !inner.resources.contains_key(&resource) {
            return Err(StoreError::NotFound(resource.to_string()));
        }
        let mut failed = Vec::new();
        for field in fields {
            if inner.fail_keys.contains(&field.key) {
                failed.push(FailedWrite {
                    key: field.key,
                    reason: "injected write failure".to_owned(),
                });
                continue;
            }
            inner.next_id += 1;
            let id = inner.next_id;
            let state = inner
                .resources
                .get_mut(&resource)
                .expect("checked contains_key above");
            state.metafields.insert(
                field.key.clone(),
                Metafield {
                    id: Some(id),
                    namespace: METAFIELD_NAMESPACE.to_owned(),
                    key: field.key,
                    value: field.value,
                    value_type: field.value_type.to_owned(),
                },
            );
        }
        Ok(failed)
    }

    async fn delete_metafields(
        &self,
        resource: ResourceRef,
        keys: &[String],
    ) -> Result<Vec<FailedWrite>, StoreError> {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        if !inner.resources.contains_key(&resource) {
            return Err(StoreError::NotFound(resource.to_string()));
        }
        let mut failed = Vec::new();
        for key in keys {
            if inner.fail_keys.contains(key) {
                failed.push(FailedWrite {
                    key: key.clone(),
                    reason: "injected delete failure".to_owned(),
                });
                continue;
            }
            let state = inner
                .resources
                .get_mut(&resource)
                .expect("checked contains_key above");
            state.metafields.remove(key);
        }
        Ok(failed)
    }
}

#[async_trait]
impl ResourceStore for MemoryStore {
    async fn fetch_content(
        &self,
        resource: ResourceRef,
    ) -> Result<RawResourceContent, StoreError> {
        self.content(resource)
            .ok_or_else(|| StoreError::NotFound(resource.to_string()))
    }

    async fn restore_content(
        &self,
        resource: ResourceRef,
        content: &RawResourceContent,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        let state = inner
            .resources
            .get_mut(&resource)
            .ok_or_else(|| StoreError::NotFound(resource.to_string()))?;
        state.content = content.clone();
        Ok(())
    }
}

/// In-memory append-only audit sink.
#[derive(Debug, Clone, Default)]
pub struct MemoryAuditLog {
    entries: Arc<Mutex<Vec<AuditEntry>>>,
}

impl MemoryAuditLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().expect("audit log poisoned").clone()
    }
}

#[async_trait]
impl AuditLog for MemoryAuditLog {
    async fn append(&self, entry: &AuditEntry) -> Result<(), StoreError> {
        self.entries
            .lock()
            .expect("audit log poisoned")
            .push(entry.clone());
        Ok(())
    }
}
