use thiserror::Error;

/// Errors internal to the optimizer.
///
/// These never cross the public boundary: [`crate::Optimizer::optimize`]
/// absorbs every failure into the deterministic fallback result.
#[derive(Debug, Error)]
pub enum OptimizerError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider response body could not be parsed into the expected shape.
    #[error("provider JSON error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The provider returned a structurally valid but unusable completion.
    #[error("unusable provider completion: {0}")]
    InvalidCompletion(String),
}
