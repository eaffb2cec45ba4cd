//! Risk-gated automatic reversion.
//!
//! The engine decides whether a scored draft crosses the risk threshold and,
//! when it does, runs the caller-supplied restore step and records the outcome
//! in the audit log. The audit entry is written whether or not the restore
//! succeeds, with a reason string that distinguishes the two cases.

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;

use searchboost_core::{AuditEntry, AuditLog, ResourceRef, StoreError};

/// Drafts scoring strictly above this risk are reverted.
pub const RISK_THRESHOLD: f64 = 0.7;

/// True iff the risk score crosses the reversion threshold. 0.70 does not
/// trigger; 0.71 does.
#[must_use]
pub fn should_rollback(risk_score: f64) -> bool {
    risk_score > RISK_THRESHOLD
}

/// Everything the audit entry needs about the draft under evaluation.
#[derive(Debug, Clone)]
pub struct RollbackContext {
    pub shop: String,
    pub resource: ResourceRef,
    pub title: String,
    pub risk_score: f64,
}

/// Executes threshold-gated reversions and writes their audit trail.
pub struct RollbackEngine {
    audit: Arc<dyn AuditLog>,
}

impl RollbackEngine {
    #[must_use]
    pub fn new(audit: Arc<dyn AuditLog>) -> Self {
        Self { audit }
    }

    /// Runs `restore` when the context's risk score exceeds the threshold.
    ///
    /// Returns `true` only when a reversion ran and succeeded. Below the
    /// threshold this is a no-op returning `false` with no audit entry. A
    /// restore failure is caught, recorded in the audit entry's reason, and
    /// reported as `false`.
    pub async fn execute_if_needed<F, Fut>(&self, ctx: RollbackContext, restore: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), StoreError>>,
    {
        if !should_rollback(ctx.risk_score) {
            return false;
        }

        let restored = restore().await;
        let reason = match &restored {
            Ok(()) => format!(
                "risk score {:.2} exceeded threshold {RISK_THRESHOLD}; draft reverted",
                ctx.risk_score
            ),
            Err(err) => format!(
                "risk score {:.2} exceeded threshold {RISK_THRESHOLD}; revert failed: {err}",
                ctx.risk_score
            ),
        };

        let entry = AuditEntry {
            timestamp: Utc::now(),
            shop: ctx.shop,
            content_type: ctx.resource.kind,
            title: ctx.title,
            risk_score: ctx.risk_score,
            rollback_triggered: true,
            reason,
            draft_id: ctx.resource.to_string(),
        };
        if let Err(err) = self.audit.append(&entry).await {
            tracing::error!(
                error = %err,
                draft_id = %entry.draft_id,
                "failed to write rollback audit entry"
            );
        }

        restored.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use searchboost_core::memory::MemoryAuditLog;
    use searchboost_core::ResourceType;

    fn ctx(risk_score: f64) -> RollbackContext {
        RollbackContext {
            shop: "demo.myshopify.com".to_owned(),
            resource: ResourceRef::new(ResourceType::Product, 1),
            title: "Widget".to_owned(),
            risk_score,
        }
    }

    #[test]
    fn threshold_is_exclusive() {
        assert!(!should_rollback(0.70));
        assert!(should_rollback(0.71));
        assert!(!should_rollback(0.0));
        assert!(should_rollback(1.0));
    }

    #[tokio::test]
    async fn below_threshold_is_a_no_op() {
        let audit = MemoryAuditLog::new();
        let engine = RollbackEngine::new(Arc::new(audit.clone()));
        let triggered = engine.execute_if_needed(ctx(0.3), || async { Ok(()) }).await;
        assert!(!triggered);
        assert!(audit.entries().is_empty(), "no audit entry below threshold");
    }

    #[tokio::test]
    async fn successful_revert_returns_true_and_audits() {
        let audit = MemoryAuditLog::new();
        let engine = RollbackEngine::new(Arc::new(audit.clone()));
        let triggered = engine.execute_if_needed(ctx(0.9), || async { Ok(()) }).await;
        assert!(triggered);

        let entries = audit.entries();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].rollback_triggered);
        assert_eq!(entries[0].draft_id, "product/1");
        assert!(entries[0].reason.contains("draft reverted"));
    }

    #[tokio::test]
    async fn failed_revert_returns_false_but_still_audits() {
        let audit = MemoryAuditLog::new();
        let engine = RollbackEngine::new(Arc::new(audit.clone()));
        let triggered = engine
            .execute_if_needed(ctx(0.9), || async {
                Err(StoreError::Transport("store unreachable".to_owned()))
            })
            .await;
        assert!(!triggered, "failed restore must not report success");

        let entries = audit.entries();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].rollback_triggered);
        assert!(
            entries[0].reason.contains("revert failed"),
            "reason must record the failure: {}",
            entries[0].reason
        );
    }
}
