//! Core domain types.
//!
//! These types represent the pure domain model, independent of any
//! infrastructure concerns (database, filesystem, external providers).
//!
//! # Structure
//!
//! - `request` - Accepted generation request and its clamping rules
//! - `script` - The generated script and its closed `Segment` enum
//! - `audio` - Fixed output format and per-segment artifacts
//! - `meditation` - Persisted meditation records and pages

mod audio;
mod meditation;
mod request;
mod script;

use thiserror::Error;

pub use audio::{AudioFormat, SegmentArtifact, SegmentKind};
pub use meditation::{Meditation, MeditationPage, NewMeditation, ScriptReady};
pub use request::{
    Credential, GenerationInput, GenerationRequest, MAX_DURATION_MINUTES, MIN_DURATION_MINUTES,
    clamp_duration_minutes, clamp_music_volume,
};
pub use script::{PauseSegment, Script, Segment, SpeechSegment};

/// Input rejected before any synthesis work begins.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The user prompt was empty or whitespace.
    #[error("Please describe how you are feeling")]
    EmptyPrompt,

    /// The script collaborator returned something that is not a script.
    #[error("Malformed script: {0}")]
    MalformedScript(String),

    /// A required script field was missing or empty.
    #[error("Script is missing a required field: {0}")]
    MissingField(&'static str),

    /// A segment carried an unusable value.
    #[error("Invalid segment at position {index}: {reason}")]
    InvalidSegment {
        /// Position of the offending segment.
        index: usize,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// The script's last segment is a pause.
    #[error("Script must end with a speech segment")]
    EndsWithPause,
}
