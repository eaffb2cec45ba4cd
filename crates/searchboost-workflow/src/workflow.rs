//! Draft/publish/rollback lifecycle over the injected content store.
//!
//! Lifecycle states are derived from metafield presence, never stored
//! separately: a resource with `optimized_content_draft` has a draft, one with
//! `optimized_content` is live, and `original_backup` existing means it can be
//! rolled back. One draft slot and one live slot per resource; saving a draft
//! overwrites the previous one.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use searchboost_core::{
    AuditEntry, AuditLog, ContentStore, FailedWrite, Metafield, NewMetafield, OptimizationResult,
    OptimizationSettings, OriginalBackup, QualityScores, RawResourceContent, ResourceRef,
    StoreError,
};
use searchboost_optimizer::Optimizer;

use crate::engine::{should_rollback, RollbackContext, RollbackEngine};
use crate::error::WorkflowError;
use crate::keys;

/// Outcome of a draft save attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftStatus {
    DraftSaved,
    Rejected,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftOutcome {
    pub status: DraftStatus,
    pub result: OptimizationResult,
    pub scores: QualityScores,
    pub failed_writes: Vec<FailedWrite>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishOutcome {
    pub published_at: DateTime<Utc>,
    /// Version number appended to the history, when versioning was enabled in
    /// the draft settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    pub failed_writes: Vec<FailedWrite>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RollbackOutcome {
    pub restored: RawResourceContent,
    pub failed_deletes: Vec<FailedWrite>,
}

/// Current draft content with a fresh assessment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftView {
    pub result: OptimizationResult,
    pub scores: QualityScores,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub has_draft: bool,
    pub has_live: bool,
    pub optimized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<DraftView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft_timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_version: Option<u32>,
}

/// Orchestrates optimize, score, stage, publish, and rollback for one shop.
pub struct Workflow {
    store: Arc<dyn ContentStore>,
    audit: Arc<dyn AuditLog>,
    optimizer: Optimizer,
    shop_domain: String,
}

impl Workflow {
    #[must_use]
    pub fn new(
        store: Arc<dyn ContentStore>,
        audit: Arc<dyn AuditLog>,
        optimizer: Optimizer,
        shop_domain: &str,
    ) -> Self {
        Self {
            store,
            audit,
            optimizer,
            shop_domain: shop_domain.to_owned(),
        }
    }

    /// Optimizes the content, assesses it, and stages it as the draft.
    ///
    /// When `content` is `None` the current title/body is fetched from the
    /// store. A risk score above the reversion threshold rejects the draft
    /// before anything is persisted; the engine then clears any stale draft
    /// keys and writes an audit entry.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Store`] when the content fetch or the draft
    /// writes fail outright. Per-key write failures are reported in the
    /// outcome instead.
    pub async fn save_draft(
        &self,
        resource: ResourceRef,
        content: Option<RawResourceContent>,
        settings: OptimizationSettings,
    ) -> Result<DraftOutcome, WorkflowError> {
        let content = match content {
            Some(content) => content,
            None => self.store.fetch_content(resource).await?,
        };

        let result = self
            .optimizer
            .optimize(&content, resource.kind, &settings)
            .await;
        let scores = searchboost_scorer::assess(&result, &content, &settings.keywords);
        let timestamp = Utc::now();

        if should_rollback(scores.risk_score) {
            tracing::warn!(
                %resource,
                risk_score = scores.risk_score,
                "draft rejected by risk gate"
            );
            let engine = RollbackEngine::new(Arc::clone(&self.audit));
            let store = Arc::clone(&self.store);
            let ctx = RollbackContext {
                shop: self.shop_domain.clone(),
                resource,
                title: content.title.clone(),
                risk_score: scores.risk_score,
            };
            engine
                .execute_if_needed(ctx, || async move {
                    let stale: Vec<String> =
                        keys::DRAFT_KEYS.iter().map(|k| (*k).to_owned()).collect();
                    let failed = store.delete_metafields(resource, &stale).await?;
                    if failed.is_empty() {
                        Ok(())
                    } else {
                        Err(StoreError::Transport(format!(
                            "failed to clear {} stale draft key(s)",
                            failed.len()
                        )))
                    }
                })
                .await;

            return Ok(DraftOutcome {
                status: DraftStatus::Rejected,
                result,
                scores,
                failed_writes: Vec::new(),
                timestamp,
            });
        }

        let fields = vec![
            NewMetafield::json(keys::DRAFT_CONTENT, to_json(&result)?),
            NewMetafield::json(keys::DRAFT_FAQ, to_json(&result.faqs)?),
            NewMetafield::json(keys::DRAFT_SETTINGS, to_json(&settings)?),
            NewMetafield::text(keys::DRAFT_TIMESTAMP, timestamp.to_rfc3339()),
        ];
        let failed_writes = self.store.set_metafields(resource, fields).await?;

        Ok(DraftOutcome {
            status: DraftStatus::DraftSaved,
            result,
            scores,
            failed_writes,
            timestamp,
        })
    }

    /// Promotes the staged draft to the live keys.
    ///
    /// Captures `original_backup` from the current title/body the first time
    /// the resource is published; the backup is never overwritten afterwards.
    /// Draft keys are left in place so the draft remains readable.
    ///
    /// # Errors
    ///
    /// - [`WorkflowError::NotFound`] when no draft content is staged.
    /// - [`WorkflowError::BackupFailed`] when the backup cannot be written;
    ///   publishing without it would make rollback impossible.
    /// - [`WorkflowError::Store`] on read/transport failures.
    pub async fn publish(&self, resource: ResourceRef) -> Result<PublishOutcome, WorkflowError> {
        let existing = field_map(self.store.get_metafields(resource).await?);
        let Some(draft_content) = existing.get(keys::DRAFT_CONTENT).cloned() else {
            return Err(WorkflowError::NotFound(
                "no draft content found to publish".to_owned(),
            ));
        };

        if !existing.contains_key(keys::ORIGINAL_BACKUP) {
            let live = self.store.fetch_content(resource).await?;
            let backup = OriginalBackup {
                title: live.title,
                description: live.description,
                backup_timestamp: Utc::now(),
            };
            let failed = self
                .store
                .set_metafields(
                    resource,
                    vec![NewMetafield::json(keys::ORIGINAL_BACKUP, to_json(&backup)?)],
                )
                .await?;
            if let Some(failure) = failed.first() {
                return Err(WorkflowError::BackupFailed(failure.reason.clone()));
            }
            tracing::info!(%resource, "captured original backup at first publish");
        }

        let published_at = Utc::now();
        let mut fields = vec![
            NewMetafield::json(keys::LIVE_CONTENT, draft_content.clone()),
            NewMetafield::text(keys::ENABLE_SCHEMA, "true".to_owned()),
            NewMetafield::text(keys::PUBLISHED_TIMESTAMP, published_at.to_rfc3339()),
        ];
        if let Some(faqs) = existing.get(keys::DRAFT_FAQ) {
            fields.push(NewMetafield::json(keys::LIVE_FAQ, faqs.clone()));
        }
        if let Some(settings) = existing.get(keys::DRAFT_SETTINGS) {
            fields.push(NewMetafield::json(keys::LIVE_SETTINGS, settings.clone()));
        }

        let version = if versioning_enabled(&existing) {
            let next = existing
                .get(keys::CURRENT_VERSION)
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(0)
                + 1;
            fields.push(NewMetafield::json(&keys::version_key(next), draft_content));
            fields.push(NewMetafield::text(
                &keys::version_timestamp_key(next),
                published_at.to_rfc3339(),
            ));
            fields.push(NewMetafield::text(keys::CURRENT_VERSION, next.to_string()));
            Some(next)
        } else {
            None
        };

        let failed_writes = self.store.set_metafields(resource, fields).await?;
        tracing::info!(%resource, ?version, "published optimized content");

        Ok(PublishOutcome {
            published_at,
            version,
            failed_writes,
        })
    }

    /// Restores the pre-optimization title/body and deletes every
    /// optimization key except the backup itself.
    ///
    /// # Errors
    ///
    /// - [`WorkflowError::NotFound`] when no backup was ever captured.
    /// - [`WorkflowError::Corrupt`] when the stored backup cannot be parsed.
    /// - [`WorkflowError::Store`] when the content restore itself fails; key
    ///   deletion failures are reported in the outcome instead.
    pub async fn rollback(&self, resource: ResourceRef) -> Result<RollbackOutcome, WorkflowError> {
        let fields = self.store.get_metafields(resource).await?;
        let backup_value = fields
            .iter()
            .find(|m| m.key == keys::ORIGINAL_BACKUP)
            .map(|m| m.value.clone())
            .ok_or_else(|| WorkflowError::NotFound("no original backup found".to_owned()))?;
        let backup: OriginalBackup =
            serde_json::from_str(&backup_value).map_err(|e| WorkflowError::Corrupt {
                key: keys::ORIGINAL_BACKUP.to_owned(),
                reason: e.to_string(),
            })?;

        let restored = RawResourceContent {
            title: backup.title,
            description: backup.description,
            ..RawResourceContent::default()
        };
        self.store.restore_content(resource, &restored).await?;

        let to_delete: Vec<String> = fields
            .iter()
            .map(|m| m.key.clone())
            .filter(|k| k != keys::ORIGINAL_BACKUP)
            .collect();
        let failed_deletes = self.store.delete_metafields(resource, &to_delete).await?;

        let entry = AuditEntry {
            timestamp: Utc::now(),
            shop: self.shop_domain.clone(),
            content_type: resource.kind,
            title: restored.title.clone(),
            risk_score: 0.0,
            rollback_triggered: true,
            reason: "manual rollback to original content".to_owned(),
            draft_id: resource.to_string(),
        };
        if let Err(err) = self.audit.append(&entry).await {
            tracing::warn!(error = %err, %resource, "failed to write rollback audit entry");
        }
        tracing::info!(%resource, "rolled back to original content");

        Ok(RollbackOutcome {
            restored,
            failed_deletes,
        })
    }

    /// Derives the lifecycle state from the keys currently present.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Store`] when the metafield read fails. An
    /// unreadable draft record is reported as present but without a view.
    pub async fn status(&self, resource: ResourceRef) -> Result<StatusReport, WorkflowError> {
        let existing = field_map(self.store.get_metafields(resource).await?);

        let has_draft = existing.contains_key(keys::DRAFT_CONTENT);
        let has_live = existing.contains_key(keys::LIVE_CONTENT);
        let current_version = existing
            .get(keys::CURRENT_VERSION)
            .and_then(|v| v.parse::<u32>().ok());
        let optimized = current_version.is_some()
            || existing
                .get(keys::ENABLE_SCHEMA)
                .is_some_and(|v| v == "true");

        let draft = match existing.get(keys::DRAFT_CONTENT) {
            Some(raw) => match serde_json::from_str::<OptimizationResult>(raw) {
                Ok(result) => {
                    let scores = self.draft_scores(resource, &result, &existing).await;
                    Some(DraftView { result, scores })
                }
                Err(err) => {
                    tracing::warn!(%resource, error = %err, "stored draft is unreadable");
                    None
                }
            },
            None => None,
        };

        Ok(StatusReport {
            has_draft,
            has_live,
            optimized,
            draft,
            draft_timestamp: existing.get(keys::DRAFT_TIMESTAMP).cloned(),
            published_timestamp: existing.get(keys::PUBLISHED_TIMESTAMP).cloned(),
            current_version,
        })
    }

    /// Re-assesses the stored draft against the resource's current content.
    /// Falls back to neutral scores when the content cannot be fetched.
    async fn draft_scores(
        &self,
        resource: ResourceRef,
        result: &OptimizationResult,
        existing: &HashMap<String, String>,
    ) -> QualityScores {
        let keywords = existing
            .get(keys::DRAFT_SETTINGS)
            .and_then(|raw| serde_json::from_str::<OptimizationSettings>(raw).ok())
            .map(|s| s.keywords)
            .unwrap_or_default();

        match self.store.fetch_content(resource).await {
            Ok(original) => searchboost_scorer::assess(result, &original, &keywords),
            Err(err) => {
                tracing::warn!(
                    %resource,
                    error = %err,
                    "cannot fetch content to assess draft; using neutral scores"
                );
                searchboost_scorer::neutral_scores()
            }
        }
    }
}

fn field_map(fields: Vec<Metafield>) -> HashMap<String, String> {
    fields.into_iter().map(|m| (m.key, m.value)).collect()
}

fn to_json<T: Serialize>(value: &T) -> Result<String, WorkflowError> {
    Ok(serde_json::to_string(value).map_err(StoreError::from)?)
}

fn versioning_enabled(existing: &HashMap<String, String>) -> bool {
    let Some(raw) = existing.get(keys::DRAFT_SETTINGS) else {
        return false;
    };
    match serde_json::from_str::<OptimizationSettings>(raw) {
        Ok(settings) => settings.enable_versioning,
        Err(err) => {
            tracing::warn!(error = %err, "stored draft settings unreadable; versioning disabled");
            false
        }
    }
}
