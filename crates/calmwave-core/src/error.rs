//! Pipeline error taxonomy.
//!
//! Every stage failure funnels into [`PipelineError`]. Adapters map it to
//! their own surfaces; the progress stream only ever sees
//! [`PipelineError::user_message`].

use thiserror::Error;

use crate::domain::ValidationError;
use crate::ports::{CollaboratorError, CollaboratorKind, MediaError, RepositoryError};

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input or generated script rejected before synthesis.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Script or speech provider failed.
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),

    /// An audio tool call failed.
    #[error(transparent)]
    Media(#[from] MediaError),

    /// Storing the finished record failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The request's audio directory could not be prepared.
    #[error("Workspace error: {0}")]
    Workspace(#[source] std::io::Error),

    /// A synthesis task panicked or was cancelled.
    #[error("Synthesis task failed: {0}")]
    Task(String),
}

impl PipelineError {
    /// Human-readable message for the terminal `Error` event.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(ValidationError::EmptyPrompt) => {
                ValidationError::EmptyPrompt.to_string()
            }
            Self::Validation(_) => {
                "The generated meditation script was invalid. Please try again.".to_string()
            }
            Self::Collaborator(e) if e.unauthorized => {
                "Your API key was rejected. Please check your settings.".to_string()
            }
            Self::Collaborator(e) => match e.kind {
                CollaboratorKind::ScriptGeneration => {
                    "Failed to generate meditation script".to_string()
                }
                CollaboratorKind::SpeechSynthesis => "Failed to generate speech audio".to_string(),
            },
            Self::Media(_) => "Failed to process meditation audio".to_string(),
            Self::Repository(_) => "Failed to save meditation".to_string(),
            Self::Workspace(_) | Self::Task(_) => "Failed to generate meditation".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_hide_internals() {
        let err = PipelineError::from(MediaError::ToolFailed {
            operation: "mix",
            detail: "ffmpeg exited with status 1: /srv/audio/secret".to_string(),
        });
        assert_eq!(err.user_message(), "Failed to process meditation audio");

        let err = PipelineError::from(ValidationError::EndsWithPause);
        assert!(err.user_message().contains("invalid"));
    }

    #[test]
    fn test_unauthorized_collaborator_message() {
        let err = PipelineError::from(CollaboratorError::unauthorized(
            CollaboratorKind::SpeechSynthesis,
            "401",
        ));
        assert!(err.user_message().contains("API key"));

        let err = PipelineError::from(CollaboratorError::new(
            CollaboratorKind::ScriptGeneration,
            "timeout",
        ));
        assert_eq!(err.user_message(), "Failed to generate meditation script");
    }
}
