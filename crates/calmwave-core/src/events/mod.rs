//! Progress events streamed to the caller during generation.
//!
//! # Wire Format
//!
//! Events are serialized with a `type` tag, one JSON object per line:
//!
//! ```json
//! {"type":"progress","step":"generating-script","progress":5}
//! {"type":"script","meditation":{"meditationScript":{...},"audioFilePath":null}}
//! {"type":"complete","meditation":{...}}
//! {"type":"error","message":"..."}
//! ```

mod emitter;

use serde::{Deserialize, Serialize};

use crate::domain::{Meditation, ScriptReady};

pub use emitter::{ProgressEmitter, ProgressReceiver, progress_channel};

/// Message sent when the producing task vanished without finishing.
pub const INTERRUPTED_MESSAGE: &str = "Meditation generation was interrupted";

/// Pipeline stage reported by a progress event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressStep {
    GeneratingScript,
    GeneratingSpeech,
    GeneratingSilence,
    CombiningAudio,
    AddingMusic,
}

impl ProgressStep {
    /// Checkpoint percentage at which this step starts.
    pub const fn checkpoint(self) -> u8 {
        match self {
            Self::GeneratingScript => 5,
            Self::GeneratingSpeech => 20,
            Self::GeneratingSilence => 65,
            Self::CombiningAudio => 75,
            Self::AddingMusic => 85,
        }
    }

    /// Wire name of the step.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GeneratingScript => "generating-script",
            Self::GeneratingSpeech => "generating-speech",
            Self::GeneratingSilence => "generating-silence",
            Self::CombiningAudio => "combining-audio",
            Self::AddingMusic => "adding-music",
        }
    }
}

impl std::fmt::Display for ProgressStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Percentage reported after `completed` of `total` speech segments are done.
///
/// Speech progress spans 20% to 60%.
pub fn speech_progress(completed: usize, total: usize) -> u8 {
    let base = ProgressStep::GeneratingSpeech.checkpoint();
    if total == 0 {
        return base;
    }
    let spread = (40.0 * completed.min(total) as f64 / total as f64).round() as u8;
    base + spread
}

/// One event on the progress stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// A pipeline stage checkpoint.
    Progress { step: ProgressStep, progress: u8 },

    /// The validated script, sent before audio work begins.
    Script { meditation: ScriptReady },

    /// Generation finished; carries the stored record.
    Complete { meditation: Box<Meditation> },

    /// Generation failed.
    Error { message: String },
}

impl ProgressEvent {
    /// Returns true for events that close the stream.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Error { .. })
    }

    /// Serialize as a single newline-terminated JSON line.
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}
