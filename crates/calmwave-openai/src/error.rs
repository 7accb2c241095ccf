//! Internal error types for OpenAI operations.
//!
//! These errors are internal to `calmwave-openai` and are mapped to core
//! port errors at the boundary.

use thiserror::Error;

/// Result type alias for OpenAI operations.
pub type OpenAiResult<T> = Result<T, OpenAiError>;

/// Errors related to OpenAI API operations.
#[derive(Debug, Error)]
pub enum OpenAiError {
    /// Neither the request nor the configuration supplied a key.
    #[error("No OpenAI API key available")]
    MissingApiKey,

    /// API request failed with an HTTP error status.
    #[error("OpenAI API request to {path} failed with status {status}: {message}")]
    ApiRequestFailed {
        /// HTTP status code
        status: u16,
        /// The endpoint path that was requested
        path: String,
        /// Provider-supplied error message, if any
        message: String,
    },

    /// API returned an invalid or unexpected response.
    #[error("Invalid response from OpenAI API: {message}")]
    InvalidResponse {
        /// Description of what was invalid
        message: String,
    },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl OpenAiError {
    /// Whether the failure means the credential was missing or rejected.
    pub const fn is_auth(&self) -> bool {
        match self {
            Self::MissingApiKey => true,
            Self::ApiRequestFailed { status, .. } => *status == 401 || *status == 403,
            _ => false,
        }
    }
}
