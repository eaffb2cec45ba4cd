//! Draft/Publish Workflow and Rollback Engine.
//!
//! Staging lives entirely in namespaced metafields on the resource: a draft is
//! written, published by copying to the live keys, and rolled back by
//! restoring the captured original. Risky drafts are rejected automatically
//! before they are ever persisted.

mod engine;
mod error;
mod keys;
mod workflow;

pub use engine::{should_rollback, RollbackContext, RollbackEngine, RISK_THRESHOLD};
pub use error::WorkflowError;
pub use workflow::{
    DraftOutcome, DraftStatus, DraftView, PublishOutcome, RollbackOutcome, StatusReport, Workflow,
};
