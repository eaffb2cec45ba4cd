//! Domain types shared across the optimizer, scorer, store, and workflow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The single metafield namespace every optimization record lives under.
pub const METAFIELD_NAMESPACE: &str = "ai_search_booster";

/// Kind of Shopify resource an optimization targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Product,
    Article,
}

impl ResourceType {
    /// Admin REST path segment for this resource kind.
    #[must_use]
    pub fn path_segment(self) -> &'static str {
        match self {
            ResourceType::Product => "products",
            ResourceType::Article => "articles",
        }
    }

    /// JSON envelope key used by the Admin API for a single resource.
    #[must_use]
    pub fn envelope_key(self) -> &'static str {
        match self {
            ResourceType::Product => "product",
            ResourceType::Article => "article",
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceType::Product => write!(f, "product"),
            ResourceType::Article => write!(f, "article"),
        }
    }
}

impl std::str::FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "product" | "products" => Ok(ResourceType::Product),
            "article" | "articles" => Ok(ResourceType::Article),
            other => Err(format!("unknown resource type: {other}")),
        }
    }
}

/// Identifies a single Shopify product or article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRef {
    pub kind: ResourceType,
    pub id: u64,
}

impl ResourceRef {
    #[must_use]
    pub fn new(kind: ResourceType, id: u64) -> Self {
        Self { kind, id }
    }
}

impl std::fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

/// Raw, pre-optimization content of a resource as it exists in Shopify.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawResourceContent {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
}

/// A single question/answer pair generated for a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

/// Output of the Content Optimizer, staged as a draft before publishing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub optimized_title: String,
    pub optimized_description: String,
    pub summary: String,
    #[serde(default)]
    pub faqs: Vec<Faq>,
    #[serde(default)]
    pub json_ld: serde_json::Value,
    pub llm_description: String,
}

/// Caller-supplied knobs for a single optimization run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptimizationSettings {
    pub target_llm: String,
    pub keywords: Vec<String>,
    pub tone: String,
    pub enable_versioning: bool,
}

impl Default for OptimizationSettings {
    fn default() -> Self {
        Self {
            target_llm: "chatgpt".to_owned(),
            keywords: Vec::new(),
            tone: "professional".to_owned(),
            enable_versioning: false,
        }
    }
}

/// Risk and visibility assessment of an [`OptimizationResult`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityScores {
    /// Heuristic 0.0–1.0 estimate of ungrounded/hallucinated content.
    pub risk_score: f64,
    /// Heuristic 0–100 estimate of LLM-agent discoverability.
    pub visibility_score: u8,
}

/// A namespaced key/value record attached to a resource in Shopify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metafield {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub namespace: String,
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub value_type: String,
}

/// A metafield value pending write; the namespace is fixed by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMetafield {
    pub key: String,
    pub value: String,
    pub value_type: &'static str,
}

impl NewMetafield {
    /// A `json`-typed metafield holding a serialized JSON document.
    #[must_use]
    pub fn json(key: &str, value: String) -> Self {
        Self {
            key: key.to_owned(),
            value,
            value_type: "json",
        }
    }

    /// A plain single-line text metafield.
    #[must_use]
    pub fn text(key: &str, value: String) -> Self {
        Self {
            key: key.to_owned(),
            value,
            value_type: "single_line_text_field",
        }
    }
}

/// Snapshot of a resource's pre-optimization state, captured once at first
/// publish and never overwritten or deleted afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginalBackup {
    pub title: String,
    pub description: String,
    pub backup_timestamp: DateTime<Utc>,
}

/// One append-only audit record written whenever the rollback engine runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub shop: String,
    pub content_type: ResourceType,
    pub title: String,
    pub risk_score: f64,
    pub rollback_triggered: bool,
    pub reason: String,
    pub draft_id: String,
}
