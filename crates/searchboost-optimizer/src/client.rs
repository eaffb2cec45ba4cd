//! HTTP client for the configured LLM provider.
//!
//! Provider selection is static: the client is built once for either an
//! OpenAI-compatible endpoint or the Anthropic Messages API, never switched
//! per call.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::OptimizerError;

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1/";
const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1/";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Which chat-completion API the client speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    Anthropic,
}

impl Provider {
    fn default_base_url(self) -> &'static str {
        match self {
            Provider::OpenAi => OPENAI_BASE_URL,
            Provider::Anthropic => ANTHROPIC_BASE_URL,
        }
    }
}

#[derive(Debug)]
pub(crate) struct ProviderClient {
    client: Client,
    provider: Provider,
    api_key: String,
    model: String,
    base_url: Url,
}

impl ProviderClient {
    /// Creates a client for the provider's production endpoint.
    pub(crate) fn new(
        provider: Provider,
        api_key: &str,
        model: &str,
        timeout_secs: u64,
    ) -> Result<Self, OptimizerError> {
        Self::with_base_url(
            provider,
            api_key,
            model,
            timeout_secs,
            provider.default_base_url(),
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    pub(crate) fn with_base_url(
        provider: Provider,
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, OptimizerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("searchboost/0.1 (content-optimization)")
            .build()?;

        // Trailing slash so Url::join appends instead of replacing the last
        // path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| {
            OptimizerError::InvalidCompletion(format!("invalid base URL '{base_url}': {e}"))
        })?;

        Ok(Self {
            client,
            provider,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            base_url,
        })
    }

    /// Sends one chat completion and returns the completion text.
    ///
    /// # Errors
    ///
    /// - [`OptimizerError::Http`] on network failure or non-2xx status.
    /// - [`OptimizerError::Deserialize`] if the envelope is not valid JSON.
    /// - [`OptimizerError::InvalidCompletion`] if the envelope carries no text.
    pub(crate) async fn complete(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<String, OptimizerError> {
        match self.provider {
            Provider::OpenAi => self.complete_openai(system, prompt).await,
            Provider::Anthropic => self.complete_anthropic(system, prompt).await,
        }
    }

    async fn complete_openai(&self, system: &str, prompt: &str) -> Result<String, OptimizerError> {
        let url = self.join("chat/completions")?;
        let body = serde_json::json!({
            "model": self.model,
            "temperature": 0.4,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": prompt},
            ],
        });
        let envelope = self.post_json(url, &body).await?;
        envelope
            .pointer("/choices/0/message/content")
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| {
                OptimizerError::InvalidCompletion("no choices[0].message.content".into())
            })
    }

    async fn complete_anthropic(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<String, OptimizerError> {
        let url = self.join("messages")?;
        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": 2048,
            "system": system,
            "messages": [
                {"role": "user", "content": prompt},
            ],
        });
        let envelope = self.post_json(url, &body).await?;
        envelope
            .pointer("/content/0/text")
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| OptimizerError::InvalidCompletion("no content[0].text".into()))
    }

    async fn post_json(
        &self,
        url: Url,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, OptimizerError> {
        let mut request = self.client.post(url.clone()).json(body);
        request = match self.provider {
            Provider::OpenAi => request.bearer_auth(&self.api_key),
            Provider::Anthropic => request
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION),
        };

        let response = request.send().await?.error_for_status()?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| OptimizerError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }

    fn join(&self, path: &str) -> Result<Url, OptimizerError> {
        self.base_url
            .join(path)
            .map_err(|e| OptimizerError::InvalidCompletion(format!("invalid URL path: {e}")))
    }
}
