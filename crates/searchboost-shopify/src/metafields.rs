//! [`MetafieldStore`] and [`ResourceStore`] implementations over the Admin API.
//!
//! Batch writes and deletes go key by key (the REST API has no batch
//! endpoint). An individual key failure is logged and reported back as a
//! [`FailedWrite`]; the loop continues through the remaining keys.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Method;

use searchboost_core::{
    FailedWrite, Metafield, MetafieldStore, NewMetafield, RawResourceContent, ResourceRef,
    ResourceStore, StoreError, METAFIELD_NAMESPACE,
};

use crate::client::ShopifyAdminClient;
use crate::error::ShopifyError;

impl ShopifyAdminClient {
    /// Lists metafields on the resource, filtered server-side to the
    /// optimization namespace.
    async fn list_metafields(
        &self,
        resource: ResourceRef,
    ) -> Result<Vec<Metafield>, ShopifyError> {
        let path = format!(
            "{}/{}/metafields.json?namespace={METAFIELD_NAMESPACE}",
            resource.kind.path_segment(),
            resource.id
        );
        let body = self.request_json(Method::GET, &path, None).await?;
        let fields = body
            .get("metafields")
            .cloned()
            .unwrap_or(serde_json::Value::Array(vec![]));
        serde_json::from_value(fields).map_err(|e| ShopifyError::Deserialize {
            context: format!("metafields for {resource}"),
            source: e,
        })
    }

    /// Creates the metafield, or updates it in place when the key already
    /// exists (single-slot semantics).
    async fn upsert_metafield(
        &self,
        resource: ResourceRef,
        field: &NewMetafield,
        existing_id: Option<u64>,
    ) -> Result<(), ShopifyError> {
        match existing_id {
            Some(id) => {
                let path = format!("metafields/{id}.json");
                let body = serde_json::json!({
                    "metafield": {
                        "id": id,
                        "value": field.value,
                        "type": field.value_type,
                    }
                });
                self.request_json(Method::PUT, &path, Some(body)).await?;
            }
            None => {
                let path = format!(
                    "{}/{}/metafields.json",
                    resource.kind.path_segment(),
                    resource.id
                );
                let body = serde_json::json!({
                    "metafield": {
                        "namespace": METAFIELD_NAMESPACE,
                        "key": field.key,
                        "value": field.value,
                        "type": field.value_type,
                    }
                });
                self.request_json(Method::POST, &path, Some(body)).await?;
            }
        }
        Ok(())
    }

    async fn delete_metafield_by_id(&self, id: u64) -> Result<(), ShopifyError> {
        let path = format!("metafields/{id}.json");
        self.request_json(Method::DELETE, &path, None).await?;
        Ok(())
    }
}

#[async_trait]
impl MetafieldStore for ShopifyAdminClient {
    async fn get_metafields(&self, resource: ResourceRef) -> Result<Vec<Metafield>, StoreError> {
        Ok(self.list_metafields(resource).await?)
    }

    async fn set_metafields(
        &self,
        resource: ResourceRef,
        fields: Vec<NewMetafield>,
    ) -> Result<Vec<FailedWrite>, StoreError> {
        let existing: HashMap<String, u64> = self
            .list_metafields(resource)
            .await?
            .into_iter()
            .filter_map(|m| m.id.map(|id| (m.key, id)))
            .collect();

        let mut failed = Vec::new();
        for field in fields {
            let existing_id = existing.get(&field.key).copied();
            if let Err(err) = self.upsert_metafield(resource, &field, existing_id).await {
                tracing::warn!(
                    %resource,
                    key = %field.key,
                    error = %err,
                    "metafield write failed; continuing with remaining keys"
                );
                failed.push(FailedWrite {
                    key: field.key,
                    reason: err.to_string(),
                });
            }
        }
        Ok(failed)
    }

    async fn delete_metafields(
        &self,
        resource: ResourceRef,
        keys: &[String],
    ) -> Result<Vec<FailedWrite>, StoreError> {
        let existing: HashMap<String, u64> = self
            .list_metafields(resource)
            .await?
            .into_iter()
            .filter_map(|m| m.id.map(|id| (m.key, id)))
            .collect();

        let mut failed = Vec::new();
        for key in keys {
            // Keys that were never written have nothing to delete.
            let Some(id) = existing.get(key).copied() else {
                continue;
            };
            if let Err(err) = self.delete_metafield_by_id(id).await {
                tracing::warn!(
                    %resource,
                    key = %key,
                    error = %err,
                    "metafield delete failed; continuing with remaining keys"
                );
                failed.push(FailedWrite {
                    key: key.clone(),
                    reason: err.to_string(),
                });
            }
        }
        Ok(failed)
    }
}

#[async_trait]
impl ResourceStore for ShopifyAdminClient {
    async fn fetch_content(
        &self,
        resource: ResourceRef,
    ) -> Result<RawResourceContent, StoreError> {
        Ok(self.get_resource_content(resource).await?)
    }

    async fn restore_content(
        &self,
        resource: ResourceRef,
        content: &RawResourceContent,
    ) -> Result<(), StoreError> {
        Ok(self.update_resource_content(resource, content).await?)
    }
}
