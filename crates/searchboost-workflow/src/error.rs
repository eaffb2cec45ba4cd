use thiserror::Error;

use searchboost_core::StoreError;

#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A record required by the operation does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The original backup could not be captured; publishing without it would
    /// leave the resource unrecoverable.
    #[error("failed to capture original backup: {0}")]
    BackupFailed(String),

    /// A stored record exists but cannot be parsed.
    #[error("stored {key} record is unreadable: {reason}")]
    Corrupt { key: String, reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}
