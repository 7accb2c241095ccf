//! HTTP backend abstraction for the OpenAI API.
//!
//! The client only ever POSTs JSON and reads the raw body back, so the
//! backend trait is that single operation. Production uses reqwest; tests
//! use the canned backend in [`testing`].

use async_trait::async_trait;
use serde_json::Value;

use crate::config::OpenAiConfig;
use crate::error::{OpenAiError, OpenAiResult};
use crate::models::ApiErrorBody;

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Sends an authenticated JSON POST and returns the response body.
///
/// Non-success statuses must come back as [`OpenAiError::ApiRequestFailed`].
#[async_trait]
pub trait HttpBackend: Send + Sync {
    async fn post_json(&self, path: &str, api_key: &str, body: &Value) -> OpenAiResult<Vec<u8>>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest.
pub struct ReqwestBackend {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestBackend {
    /// Create a backend from the configured root, timeout and user agent.
    pub fn new(config: &OpenAiConfig) -> OpenAiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn post_json(&self, path: &str, api_key: &str, body: &Value) -> OpenAiResult<Vec<u8>> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            return Err(OpenAiError::ApiRequestFailed {
                status: status.as_u16(),
                path: path.to_string(),
                message: error_message(&bytes),
            });
        }
        Ok(bytes.to_vec())
    }
}

/// Pull the provider's message out of an error body, or fall back to the raw text.
pub(crate) fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<ApiErrorBody>(body).map_or_else(
        |_| String::from_utf8_lossy(body).trim().to_string(),
        |parsed| parsed.error.message,
    )
}

// ============================================================================
// Test Backend
// ============================================================================
