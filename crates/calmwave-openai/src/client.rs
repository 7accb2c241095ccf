//! OpenAI client for script completion and speech synthesis.

use calmwave_core::{Credential, ScriptPrompt};
use tracing::debug;

use crate::config::OpenAiConfig;
use crate::error::{OpenAiError, OpenAiResult};
use crate::http::{HttpBackend, ReqwestBackend};
use crate::models::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ResponseFormat, SpeechRequest,
};

const CHAT_PATH: &str = "/chat/completions";
const SPEECH_PATH: &str = "/audio/speech";

// ============================================================================
// Type Aliases
// ============================================================================

/// Default OpenAI client using the reqwest HTTP backend.
pub type DefaultOpenAiClient = OpenAiClient<ReqwestBackend>;

// ============================================================================
// Client
// ============================================================================

/// Client for the chat-completion and speech endpoints.
///
/// Generic over the HTTP backend so tests can substitute canned replies.
/// Use [`DefaultOpenAiClient`] in production and reach it through the
/// `ScriptGenerator` and `SpeechSynthesizer` ports.
pub struct OpenAiClient<B: HttpBackend> {
    pub(crate) backend: B,
    pub(crate) config: OpenAiConfig,
}

impl DefaultOpenAiClient {
    /// Create a client with the given configuration.
    pub fn new(config: OpenAiConfig) -> OpenAiResult<Self> {
        let backend = ReqwestBackend::new(&config)?;
        Ok(Self { backend, config })
    }
}

impl<B: HttpBackend> OpenAiClient<B> {
    /// Create a client with a custom backend.
    #[cfg(test)]
    pub(crate) const fn with_backend(config: OpenAiConfig, backend: B) -> Self {
        Self { backend, config }
    }

    /// The per-request credential wins; the shared key is the fallback.
    fn resolve_key<'a>(&'a self, credential: Option<&'a Credential>) -> OpenAiResult<&'a str> {
        credential
            .map(Credential::expose)
            .or(self.config.api_key.as_deref())
            .ok_or(OpenAiError::MissingApiKey)
    }

    /// Request a script and return the model's JSON text unparsed.
    pub(crate) async fn complete_script(
        &self,
        prompt: &ScriptPrompt,
        credential: Option<&Credential>,
    ) -> OpenAiResult<String> {
        let key = self.resolve_key(credential)?;
        let request = ChatCompletionRequest {
            model: &self.config.chat_model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            response_format: ResponseFormat::json_object(),
        };

        let body = self
            .backend
            .post_json(CHAT_PATH, key, &serde_json::to_value(&request)?)
            .await?;
        let response: ChatCompletionResponse = serde_json::from_slice(&body)?;
        let content = response
            .into_content()
            .ok_or_else(|| OpenAiError::InvalidResponse {
                message: "completion contained no message content".to_string(),
            })?;
        debug!(chars = content.len(), "Script completion received");
        Ok(content)
    }

    /// Synthesize `text` to MP3 bytes.
    pub(crate) async fn speak(&self, text: &str, credential: Option<&Credential>) -> OpenAiResult<Vec<u8>> {
        let key = self.resolve_key(credential)?;
        let request = SpeechRequest {
            model: &self.config.tts_model,
            voice: &self.config.voice,
            input: text,
            response_format: "mp3",
        };

        let audio = self
            .backend
            .post_json(SPEECH_PATH, key, &serde_json::to_value(&request)?)
            .await?;
        if audio.is_empty() {
            return Err(OpenAiError::InvalidResponse {
                message: "speech response was empty".to_string(),
            });
        }
        debug!(bytes = audio.len(), "Speech received");
        Ok(audio)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::http::testing::FakeBackend;

    fn prompt() -> ScriptPrompt {
        ScriptPrompt {
            system: "Return ONLY valid JSON".to_string(),
            user: "I feel restless".to_string(),
        }
    }

    fn completion(content: &str) -> serde_json::Value {
        json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] })
    }

    #[tokio::test]
    async fn test_request_credential_overrides_shared_key() {
        let backend = FakeBackend::new().reply_json(CHAT_PATH, &completion("{\"title\":\"x\"}"));
        let client = OpenAiClient::with_backend(OpenAiConfig::new().with_api_key("sk-shared"), backend);

        let credential = Credential::new("sk-caller");
        let text = client.complete_script(&prompt(), Some(&credential)).await.unwrap();

        assert_eq!(text, "{\"title\":\"x\"}");
        let calls = client.backend.recorded();
        assert_eq!(calls[0].api_key, "sk-caller");
        assert_eq!(calls[0].body["model"], "gpt-4o-mini");
        assert_eq!(calls[0].body["messages"][0]["content"], "Return ONLY valid JSON");
        assert_eq!(calls[0].body["messages"][1]["content"], "I feel restless");
    }

    #[tokio::test]
    async fn test_shared_key_used_without_credential() {
        let backend = FakeBackend::new().reply(SPEECH_PATH, vec![0xFF, 0xFB, 0x90]);
        let client = OpenAiClient::with_backend(OpenAiConfig::new().with_api_key("sk-shared"), backend);

        let audio = client.speak("Breathe in.", None).await.unwrap();

        assert_eq!(audio, vec![0xFF, 0xFB, 0x90]);
        let calls = client.backend.recorded();
        assert_eq!(calls[0].api_key, "sk-shared");
        assert_eq!(calls[0].body["model"], "tts-1");
        assert_eq!(calls[0].body["voice"], "alloy");
        assert_eq!(calls[0].body["input"], "Breathe in.");
    }

    #[tokio::test]
    async fn test_missing_key_makes_no_request() {
        let client = OpenAiClient::with_backend(OpenAiConfig::new(), FakeBackend::new());

        let err = client.speak("Breathe out.", None).await.unwrap_err();

        assert!(matches!(err, OpenAiError::MissingApiKey));
        assert!(client.backend.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_empty_completion_is_invalid() {
        let backend = FakeBackend::new().reply_json(CHAT_PATH, &json!({ "choices": [] }));
        let client = OpenAiClient::with_backend(OpenAiConfig::new().with_api_key("sk-shared"), backend);

        let err = client.complete_script(&prompt(), None).await.unwrap_err();
        assert!(matches!(err, OpenAiError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn test_empty_audio_is_invalid() {
        let backend = FakeBackend::new().reply(SPEECH_PATH, Vec::new());
        let client = OpenAiClient::with_backend(OpenAiConfig::new().with_api_key("sk-shared"), backend);

        let err = client.speak("Rest.", None).await.unwrap_err();
        assert!(matches!(err, OpenAiError::InvalidResponse { .. }));
    }
}
