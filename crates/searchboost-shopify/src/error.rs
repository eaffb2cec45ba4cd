use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShopifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by Shopify (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("resource not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid shop configuration: {0}")]
    InvalidConfig(String),
}

impl From<ShopifyError> for searchboost_core::StoreError {
    fn from(err: ShopifyError) -> Self {
        match err {
            ShopifyError::NotFound { url } => searchboost_core::StoreError::NotFound(url),
            other => searchboost_core::StoreError::Transport(other.to_string()),
        }
    }
}
