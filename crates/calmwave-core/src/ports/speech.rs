//! Speech synthesis port.

use async_trait::async_trait;

use super::CollaboratorError;
use crate::domain::Credential;

/// Turns text into raw audio bytes in the provider's native encoding.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(
        &self,
        text: &str,
        credential: Option<&Credential>,
    ) -> Result<Vec<u8>, CollaboratorError>;
}
