//! Content Optimizer: turns raw product/article content into a structured
//! optimization result via a configured LLM provider, with a deterministic
//! fallback when no provider is available or a call fails.
//!
//! Availability over correctness: [`Optimizer::optimize`] never surfaces a
//! provider error to callers — they only ever see degraded-quality output, so
//! they must not assume provider text is present in the result.

mod client;
mod error;
mod fallback;
mod parse;
mod prompt;

use searchboost_core::{
    AppConfig, OptimizationResult, OptimizationSettings, RawResourceContent, ResourceType,
};

use crate::client::ProviderClient;
pub use crate::client::Provider;
pub use crate::error::OptimizerError;
pub use crate::fallback::fallback_result;

/// Content optimizer with a statically selected provider.
pub struct Optimizer {
    provider: Option<ProviderClient>,
}

impl Optimizer {
    /// Builds the optimizer from application config.
    ///
    /// OpenAI is preferred when both keys are configured. With no key, or with
    /// mock mode enabled, every call returns the deterministic fallback.
    ///
    /// # Errors
    ///
    /// Returns [`OptimizerError::Http`] if the underlying HTTP client cannot
    /// be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, OptimizerError> {
        if config.mock_optimizer {
            tracing::info!("optimizer running in mock mode; provider calls disabled");
            return Ok(Self::mock());
        }
        let provider = if let Some(key) = &config.openai_api_key {
            Some(ProviderClient::new(
                Provider::OpenAi,
                key,
                &config.openai_model,
                config.llm_timeout_secs,
            )?)
        } else if let Some(key) = &config.anthropic_api_key {
            Some(ProviderClient::new(
                Provider::Anthropic,
                key,
                &config.anthropic_model,
                config.llm_timeout_secs,
            )?)
        } else {
            tracing::warn!("no LLM provider key configured; using deterministic fallback only");
            None
        };
        Ok(Self { provider })
    }

    /// An optimizer with no provider: every call returns the fallback.
    #[must_use]
    pub fn mock() -> Self {
        Self { provider: None }
    }

    /// An optimizer pointed at a custom provider base URL (for wiremock tests).
    ///
    /// # Errors
    ///
    /// Returns [`OptimizerError::Http`] if the HTTP client cannot be built or
    /// [`OptimizerError::InvalidCompletion`] if `base_url` is not a valid URL.
    pub fn with_base_url(
        provider: Provider,
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, OptimizerError> {
        Ok(Self {
            provider: Some(ProviderClient::with_base_url(
                provider,
                api_key,
                model,
                timeout_secs,
                base_url,
            )?),
        })
    }

    /// Optimizes the given content. Infallible: any provider failure is
    /// absorbed into the deterministic fallback built from the raw content.
    pub async fn optimize(
        &self,
        content: &RawResourceContent,
        kind: ResourceType,
        settings: &OptimizationSettings,
    ) -> OptimizationResult {
        let Some(provider) = &self.provider else {
            return fallback_result(content, kind, settings);
        };

        let user_prompt = prompt::build_prompt(content, kind, settings);
        match provider.complete(prompt::SYSTEM_PROMPT, &user_prompt).await {
            Ok(text) => match parse::parse_completion(&text) {
                Ok(result) => result,
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        resource_kind = %kind,
                        "provider returned unusable completion; using fallback"
                    );
                    fallback_result(content, kind, settings)
                }
            },
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    resource_kind = %kind,
                    "provider call failed; using fallback"
                );
                fallback_result(content, kind, settings)
            }
        }
    }
}
