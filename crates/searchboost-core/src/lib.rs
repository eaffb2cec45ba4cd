//! Shared domain types, configuration, and store interfaces for searchboost.

mod app_config;
mod audit;
mod config;
pub mod memory;
mod store;
mod types;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use audit::FileAuditLog;
pub use config::{load_app_config, load_app_config_from_env};
pub use store::{AuditLog, ContentStore, FailedWrite, MetafieldStore, ResourceStore, StoreError};
pub use types::{
    AuditEntry, Faq, Metafield, NewMetafield, OptimizationResult, OptimizationSettings,
    OriginalBackup, QualityScores, RawResourceContent, ResourceRef, ResourceType,
    METAFIELD_NAMESPACE,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
