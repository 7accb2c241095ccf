#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod ports;
pub mod reconcile;
pub mod services;
pub mod timing;
pub mod workspace;

// Re-export commonly used types for convenience
pub use config::PipelineConfig;
pub use domain::{
    AudioFormat, Credential, GenerationInput, GenerationRequest, Meditation, MeditationPage,
    NewMeditation, PauseSegment, Script, ScriptReady, Segment, SegmentArtifact, SegmentKind,
    SpeechSegment, ValidationError,
};
pub use error::PipelineError;
pub use events::{ProgressEmitter, ProgressEvent, ProgressReceiver, ProgressStep, progress_channel};
pub use ports::{
    CollaboratorError, CollaboratorKind, Collaborators, MediaError, MediaToolkit,
    MeditationRepository, NoopMeditationRepository, RepositoryError, ScriptGenerator,
    SpeechSynthesizer,
};
pub use reconcile::{Reconciliation, reconcile_pauses};
pub use services::{MeditationHistoryService, MeditationPipeline, MixedResult};
pub use timing::{ScriptPrompt, TimingPlan, plan_session};
pub use workspace::{RequestWorkspace, TempArtifact};

#[cfg(test)]
use tokio_test as _;
