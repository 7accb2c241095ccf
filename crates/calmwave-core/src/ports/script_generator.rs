//! Script generation port.

use async_trait::async_trait;

use super::CollaboratorError;
use crate::domain::Credential;
use crate::timing::ScriptPrompt;

/// Produces a script as raw JSON text from a prompt.
///
/// Parsing and validation happen in the core; implementations only return
/// what the provider produced.
#[async_trait]
pub trait ScriptGenerator: Send + Sync {
    async fn generate_script(
        &self,
        prompt: &ScriptPrompt,
        credential: Option<&Credential>,
    ) -> Result<String, CollaboratorError>;
}
