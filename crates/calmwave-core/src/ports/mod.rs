//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the generation pipeline expects from
//! infrastructure. They contain no implementation details and use only
//! domain types.
//!
//! # Design Rules
//!
//! - No provider SDK, `sqlx` or HTTP types in any signature
//! - No tool command lines: media ports speak in paths, durations and gains
//! - Every collaborator failure maps to one of the errors below

mod media;
mod meditation_repository;
mod script_generator;
mod speech;

use std::sync::Arc;

use thiserror::Error;

pub use media::MediaToolkit;
pub use meditation_repository::{MeditationRepository, NoopMeditationRepository};
pub use script_generator::ScriptGenerator;
pub use speech::SpeechSynthesizer;

#[cfg(test)]
pub use meditation_repository::MockMeditationRepository;

/// Which external collaborator failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollaboratorKind {
    ScriptGeneration,
    SpeechSynthesis,
}

impl std::fmt::Display for CollaboratorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ScriptGeneration => f.write_str("script generation"),
            Self::SpeechSynthesis => f.write_str("speech synthesis"),
        }
    }
}

/// An external text or speech provider failed.
#[derive(Debug, Error)]
#[error("{kind} failed: {message}")]
pub struct CollaboratorError {
    pub kind: CollaboratorKind,
    pub message: String,
    /// True when the provider rejected the credential.
    pub unauthorized: bool,
}

impl CollaboratorError {
    pub fn new(kind: CollaboratorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            unauthorized: false,
        }
    }

    /// A failure caused by a missing or rejected credential.
    pub fn unauthorized(kind: CollaboratorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            unauthorized: true,
        }
    }
}

/// Errors from the audio toolkit.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The underlying tool is not installed or not runnable.
    #[error("Media tool unavailable: {0}")]
    Unavailable(String),

    /// The tool ran and reported failure.
    #[error("{operation} failed: {detail}")]
    ToolFailed {
        operation: &'static str,
        detail: String,
    },

    /// The tool's output could not be interpreted.
    #[error("Unexpected output from {operation}: {detail}")]
    InvalidOutput {
        operation: &'static str,
        detail: String,
    },

    /// Reading or writing a media file failed.
    #[error("Media I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Domain-specific errors for repository operations.
///
/// This error type abstracts away storage implementation details (e.g., sqlx errors)
/// and provides a clean interface for services to handle storage failures.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The requested entity was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Storage backend error (database, filesystem, etc.).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Every collaborator the pipeline needs, as trait objects.
///
/// Lives in core so adapters can wire concrete implementations without the
/// pipeline depending on them.
#[derive(Clone)]
pub struct Collaborators {
    pub scripts: Arc<dyn ScriptGenerator>,
    pub speech: Arc<dyn SpeechSynthesizer>,
    pub media: Arc<dyn MediaToolkit>,
    pub meditations: Arc<dyn MeditationRepository>,
}

impl Collaborators {
    pub fn new(
        scripts: Arc<dyn ScriptGenerator>,
        speech: Arc<dyn SpeechSynthesizer>,
        media: Arc<dyn MediaToolkit>,
        meditations: Arc<dyn MeditationRepository>,
    ) -> Self {
        Self {
            scripts,
            speech,
            media,
            meditations,
        }
    }
}
