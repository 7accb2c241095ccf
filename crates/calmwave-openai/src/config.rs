//! Public configuration for the OpenAI client.

use std::time::Duration;

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for the OpenAI client.
///
/// # Example
///
/// ```
/// use calmwave_openai::OpenAiConfig;
/// use std::time::Duration;
///
/// let config = OpenAiConfig::new()
///     .with_api_key("sk-shared")
///     .with_voice("nova")
///     .with_timeout(Duration::from_secs(90));
/// ```
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API root, without a trailing slash
    pub(crate) base_url: String,
    /// Model used for script generation
    pub(crate) chat_model: String,
    /// Model used for speech synthesis
    pub(crate) tts_model: String,
    /// Voice used for speech synthesis
    pub(crate) voice: String,
    /// Request timeout
    pub(crate) timeout: Duration,
    /// Shared key used when a request carries no credential of its own
    pub(crate) api_key: Option<String>,
    /// User agent string for HTTP requests
    pub(crate) user_agent: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            chat_model: "gpt-4o-mini".to_string(),
            tts_model: "tts-1".to_string(),
            voice: "alloy".to_string(),
            timeout: Duration::from_secs(120),
            api_key: None,
            user_agent: concat!("calmwave-openai/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl OpenAiConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API root. A trailing slash is ignored.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_chat_model(mut self, model: impl Into<String>) -> Self {
        self.chat_model = model.into();
        self
    }

    #[must_use]
    pub fn with_tts_model(mut self, model: impl Into<String>) -> Self {
        self.tts_model = model.into();
        self
    }

    #[must_use]
    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    /// Set the request timeout.
    ///
    /// Defaults to 120 seconds; long speech segments take a while.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the shared API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set an optional shared API key.
    #[must_use]
    pub fn with_optional_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key.filter(|k| !k.trim().is_empty());
        self
    }

    /// Whether a shared key is configured.
    pub const fn has_shared_key(&self) -> bool {
        self.api_key.is_some()
    }
}
