//! Port trait implementations for `OpenAiClient`.
//!
//! Maps internal `OpenAiError`s onto the core's `CollaboratorError` so the
//! pipeline never sees HTTP details.

use async_trait::async_trait;
use calmwave_core::{
    CollaboratorError, CollaboratorKind, Credential, ScriptGenerator, ScriptPrompt,
    SpeechSynthesizer,
};
use tracing::warn;

use crate::client::OpenAiClient;
use crate::error::OpenAiError;
use crate::http::HttpBackend;

// ============================================================================
// Error Mapping
// ============================================================================

/// Convert an internal `OpenAiError` to a core `CollaboratorError`.
fn map_error(kind: CollaboratorKind, err: OpenAiError) -> CollaboratorError {
    warn!(%kind, error = %err, "OpenAI request failed");
    if err.is_auth() {
        CollaboratorError::unauthorized(kind, err.to_string())
    } else {
        CollaboratorError::new(kind, err.to_string())
    }
}

// ============================================================================
// Port Implementations
// ============================================================================

#[async_trait]
impl<B: HttpBackend> ScriptGenerator for OpenAiClient<B> {
    async fn generate_script(
        &self,
        prompt: &ScriptPrompt,
        credential: Option<&Credential>,
    ) -> Result<String, CollaboratorError> {
        self.complete_script(prompt, credential)
            .await
            .map_err(|e| map_error(CollaboratorKind::ScriptGeneration, e))
    }
}

#[async_trait]
impl<B: HttpBackend> SpeechSynthesizer for OpenAiClient<B> {
    async fn synthesize(
        &self,
        text: &str,
        credential: Option<&Credential>,
    ) -> Result<Vec<u8>, CollaboratorError> {
        self.speak(text, credential)
            .await
            .map_err(|e| map_error(CollaboratorKind::SpeechSynthesis, e))
    }
}
