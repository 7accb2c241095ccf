//! Track assembly: ordered concatenation and music mixing.
//!
//! Concatenation, music preparation and mixing run strictly in sequence.
//! Intermediates are deleted as soon as the next stage no longer needs them.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use super::synthesizer::artifact_paths;
use crate::domain::{AudioFormat, SegmentArtifact};
use crate::error::PipelineError;
use crate::events::{ProgressEmitter, ProgressStep};
use crate::ports::MediaToolkit;
use crate::workspace::{RequestWorkspace, TempArtifact};

/// The mixed track, still owned by the request until persisted.
#[derive(Debug)]
pub struct AssembledTrack {
    pub file: TempArtifact,
    /// Duration of the concatenated voice track, which the mix matches.
    pub duration_secs: f64,
}

/// Joins segment artifacts and lays the music bed under them.
#[derive(Clone)]
pub struct Assembler {
    media: Arc<dyn MediaToolkit>,
    format: AudioFormat,
    background_music: PathBuf,
}

impl Assembler {
    pub fn new(media: Arc<dyn MediaToolkit>, format: AudioFormat, background_music: PathBuf) -> Self {
        Self {
            media,
            format,
            background_music,
        }
    }

    /// Build the final track from `artifacts`.
    ///
    /// Artifacts are sorted by index here regardless of the order given;
    /// that sort is what fixes the audible segment order.
    pub async fn assemble(
        &self,
        mut artifacts: Vec<SegmentArtifact>,
        workspace: &RequestWorkspace,
        music_volume: f64,
        emitter: &ProgressEmitter,
    ) -> Result<AssembledTrack, PipelineError> {
        artifacts.sort_by_key(SegmentArtifact::index);

        emitter.step(ProgressStep::CombiningAudio);
        let list = workspace.concat_list();
        let voice = workspace.voice_track();
        self.media
            .concat(&artifact_paths(&artifacts), list.path(), voice.path(), &self.format)
            .await?;
        drop(list);
        drop(artifacts);

        let duration_secs = self.media.probe_duration(voice.path()).await?;
        debug!(duration_secs, "Voice track concatenated");

        emitter.step(ProgressStep::AddingMusic);
        let bed = workspace.music_bed();
        self.media
            .fit_to_duration(&self.background_music, duration_secs, bed.path(), &self.format)
            .await?;

        let output = workspace.final_track();
        self.media
            .mix(voice.path(), bed.path(), music_volume, output.path(), &self.format)
            .await?;

        Ok(AssembledTrack {
            file: output,
            duration_secs,
        })
    }
}
