//! HTTP client for the Shopify Admin REST API.
//!
//! Wraps `reqwest` with access-token auth, typed status handling (404, 429,
//! 5xx), and retry with back-off on transient failures. Holds no local cache:
//! every call is a live round trip.

use std::time::Duration;

use reqwest::{Client, Method, StatusCode, Url};

use searchboost_core::{AppConfig, RawResourceContent, ResourceRef};

use crate::error::ShopifyError;
use crate::retry::retry_with_backoff;

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Client for one shop's Admin API.
///
/// Use [`ShopifyAdminClient::from_config`] for production or
/// [`ShopifyAdminClient::with_base_url`] to point at a mock server in tests.
pub struct ShopifyAdminClient {
    client: Client,
    base_url: Url,
    access_token: String,
    shop_domain: String,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl ShopifyAdminClient {
    /// Creates a client for the shop and API version in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::Http`] if the HTTP client cannot be built, or
    /// [`ShopifyError::InvalidConfig`] if the shop domain does not form a
    /// valid URL.
    pub fn from_config(config: &AppConfig) -> Result<Self, ShopifyError> {
        let base = format!(
            "https://{}/admin/api/{}",
            config.shop_domain, config.shopify_api_version
        );
        Self::with_base_url(
            &config.shop_domain,
            &config.shopify_access_token,
            config.shopify_timeout_secs,
            config.shopify_max_retries,
            config.shopify_backoff_base_ms,
            &base,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::Http`] if the HTTP client cannot be built, or
    /// [`ShopifyError::InvalidConfig`] if `base_url` is not a valid URL.
    pub fn with_base_url(
        shop_domain: &str,
        access_token: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
        base_url: &str,
    ) -> Result<Self, ShopifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("searchboost/0.1 (content-optimization)")
            .build()?;

        // Trailing slash so Url::join appends instead of replacing the last
        // path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| ShopifyError::InvalidConfig(format!("invalid base URL: {e}")))?;

        Ok(Self {
            client,
            base_url,
            access_token: access_token.to_owned(),
            shop_domain: shop_domain.to_owned(),
            max_retries,
            backoff_base_ms,
        })
    }

    /// The shop this client talks to, for logging and audit entries.
    #[must_use]
    pub fn shop_domain(&self) -> &str {
        &self.shop_domain
    }

    /// Fetches the resource's current title and body.
    ///
    /// # Errors
    ///
    /// - [`ShopifyError::NotFound`] if the resource does not exist.
    /// - [`ShopifyError::Http`] / [`ShopifyError::UnexpectedStatus`] on
    ///   transport failures after retries.
    /// - [`ShopifyError::Deserialize`] if the envelope is malformed.
    pub async fn get_resource_content(
        &self,
        resource: ResourceRef,
    ) -> Result<RawResourceContent, ShopifyError> {
        let path = format!("{}/{}.json", resource.kind.path_segment(), resource.id);
        let body = self.request_json(Method::GET, &path, None).await?;
        let entity = body.get(resource.kind.envelope_key()).ok_or_else(|| {
            ShopifyError::InvalidConfig(format!(
                "response missing {} envelope",
                resource.kind.envelope_key()
            ))
        })?;

        Ok(RawResourceContent {
            title: string_field(entity, "title"),
            description: string_field(entity, "body_html"),
            product_type: opt_string_field(entity, "product_type"),
            vendor: opt_string_field(entity, "vendor"),
        })
    }

    /// Overwrites the resource's title and body. Same call shape for products
    /// and articles.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::get_resource_content`].
    pub async fn update_resource_content(
        &self,
        resource: ResourceRef,
        content: &RawResourceContent,
    ) -> Result<(), ShopifyError> {
        let path = format!("{}/{}.json", resource.kind.path_segment(), resource.id);
        let body = serde_json::json!({
            resource.kind.envelope_key(): {
                "id": resource.id,
                "title": content.title,
                "body_html": content.description,
            }
        });
        self.request_json(Method::PUT, &path, Some(body)).await?;
        Ok(())
    }

    /// Sends one request with retry, asserts a usable status, and parses the
    /// response body as JSON (`null` for empty bodies).
    pub(crate) async fn request_json(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, ShopifyError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| ShopifyError::InvalidConfig(format!("invalid path {path}: {e}")))?;

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let method = method.clone();
            let url = url.clone();
            let body = body.clone();
            async move {
                let mut request = self
                    .client
                    .request(method, url.clone())
                    .header(ACCESS_TOKEN_HEADER, &self.access_token);
                if let Some(json) = &body {
                    request = request.json(json);
                }

                let response = request.send().await?;
                let response = Self::check_status(response, &url)?;
                let text = response.text().await?;
                if text.trim().is_empty() {
                    return Ok(serde_json::Value::Null);
                }
                serde_json::from_str(&text).map_err(|e| ShopifyError::Deserialize {
                    context: url.to_string(),
                    source: e,
                })
            }
        })
        .await
    }

    fn check_status(
        response: reqwest::Response,
        url: &Url,
    ) -> Result<reqwest::Response, ShopifyError> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ShopifyError::NotFound {
                url: url.to_string(),
            });
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(2);
            return Err(ShopifyError::RateLimited { retry_after_secs });
        }
        if !status.is_success() {
            return Err(ShopifyError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }
}

fn string_field(value: &serde_json::Value, key: &str) -> String {
    value
        .get(key)
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

fn opt_string_field(value: &serde_json::Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(serde_json::Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}
