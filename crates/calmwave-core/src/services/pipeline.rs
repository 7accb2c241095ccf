//! The meditation generation pipeline.
//!
//! `MeditationPipeline` drives one request from prompt to stored record:
//! script generation, validation, concurrent synthesis, pause
//! reconciliation, assembly and persistence. Every outcome ends the progress
//! stream with exactly one terminal event.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, warn};

use super::{AssembledTrack, Assembler, SegmentSynthesizer};
use crate::config::PipelineConfig;
use crate::domain::{GenerationRequest, Meditation, NewMeditation, Script, SegmentKind};
use crate::error::PipelineError;
use crate::events::{ProgressEmitter, ProgressReceiver, ProgressStep, progress_channel};
use crate::ports::{Collaborators, MeditationRepository, ScriptGenerator};
use crate::reconcile::reconcile_pauses;
use crate::timing::plan_session;
use crate::workspace::RequestWorkspace;

/// The one artifact that outlives a successful request.
#[derive(Debug, Clone)]
pub struct MixedResult {
    /// Location of the mixed audio on disk.
    pub final_artifact: PathBuf,
    pub script: Script,
    /// Length of the voice track the mix was fitted to.
    pub duration_secs: f64,
    /// The stored record, including the public audio reference.
    pub meditation: Meditation,
}

/// Orchestrates generation for accepted requests.
pub struct MeditationPipeline {
    config: PipelineConfig,
    scripts: Arc<dyn ScriptGenerator>,
    meditations: Arc<dyn MeditationRepository>,
    synthesizer: SegmentSynthesizer,
    assembler: Assembler,
}

impl MeditationPipeline {
    pub fn new(config: PipelineConfig, collaborators: Collaborators) -> Self {
        let synthesizer = SegmentSynthesizer::new(
            collaborators.speech,
            Arc::clone(&collaborators.media),
            config.format,
            config.max_concurrent_synthesis,
        );
        let assembler = Assembler::new(
            collaborators.media,
            config.format,
            config.background_music.clone(),
        );
        Self {
            config,
            scripts: collaborators.scripts,
            meditations: collaborators.meditations,
            synthesizer,
            assembler,
        }
    }

    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run `request` on a background task and return its progress stream.
    ///
    /// The stream always ends with one `Complete` or `Error` event, even if
    /// the task panics.
    pub fn start(self: &Arc<Self>, request: GenerationRequest) -> ProgressReceiver {
        let (emitter, receiver) = progress_channel();
        let pipeline = Arc::clone(self);
        tokio::spawn(async move {
            let _ = pipeline.run(request, &emitter).await;
        });
        receiver
    }

    /// Run `request` to completion, reporting through `emitter`.
    pub async fn run(
        &self,
        request: GenerationRequest,
        emitter: &ProgressEmitter,
    ) -> Result<MixedResult, PipelineError> {
        let started = Instant::now();
        match self.execute(&request, emitter).await {
            Ok(result) => {
                info!(
                    meditation_id = %result.meditation.id,
                    duration_secs = result.duration_secs,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Meditation generated"
                );
                emitter.complete(result.meditation.clone());
                Ok(result)
            }
            Err(e) => {
                error!(error = %e, "Meditation generation failed");
                emitter.fail(e.user_message());
                Err(e)
            }
        }
    }

    async fn execute(
        &self,
        request: &GenerationRequest,
        emitter: &ProgressEmitter,
    ) -> Result<MixedResult, PipelineError> {
        emitter.step(ProgressStep::GeneratingScript);
        let plan = plan_session(request.duration_minutes());
        let prompt = plan.prompt(request.user_input());

        let raw = self
            .scripts
            .generate_script(&prompt, request.credential())
            .await?;
        let mut script = Script::from_json(&raw)?;
        emitter.script_ready(&script);

        let workspace = RequestWorkspace::create(self.config.audio_dir())
            .await
            .map_err(PipelineError::Workspace)?;
        info!(
            base = workspace.base(),
            segments = script.segments.len(),
            duration_minutes = plan.duration_minutes,
            "Synthesizing meditation"
        );

        let rendered = self
            .render_track(&script, plan.total_seconds, request, &workspace, emitter)
            .await;
        if rendered.is_err() {
            workspace.sweep();
        }
        let (track, pauses) = rendered?;
        script.set_pause_durations(&pauses);

        let meditation = self
            .meditations
            .insert(&NewMeditation {
                user_id: request.owner().to_string(),
                user_input: request.user_input().to_string(),
                script: script.clone(),
                audio_file_path: self.config.public_path(workspace.base()),
            })
            .await?;

        let final_artifact = track.file.persist();
        Ok(MixedResult {
            final_artifact,
            script,
            duration_secs: track.duration_secs,
            meditation,
        })
    }

    /// Synthesize, reconcile and assemble.
    ///
    /// Returns the mixed track and the pause durations it was rendered with.
    async fn render_track(
        &self,
        script: &Script,
        target_total: f64,
        request: &GenerationRequest,
        workspace: &RequestWorkspace,
        emitter: &ProgressEmitter,
    ) -> Result<(AssembledTrack, Vec<f64>), PipelineError> {
        emitter.step(ProgressStep::GeneratingSpeech);
        let artifacts = self
            .synthesizer
            .synthesize_all(script, workspace, request.credential(), emitter)
            .await?;
        emitter.step(ProgressStep::GeneratingSilence);

        let speech_secs: Vec<f64> = artifacts
            .iter()
            .filter(|a| a.kind() == SegmentKind::Speech)
            .map(|a| a.duration_secs())
            .collect();
        let declared_pauses = script.declared_pauses();
        let reconciliation = reconcile_pauses(&speech_secs, &declared_pauses, target_total);
        if reconciliation.shortfall > 0.0 {
            warn!(
                base = workspace.base(),
                shortfall_secs = reconciliation.shortfall,
                "Script has no pauses to absorb the remaining time"
            );
        }
        let artifacts = self
            .synthesizer
            .apply_reconciliation(artifacts, &declared_pauses, &reconciliation, workspace)
            .await?;

        let track = self
            .assembler
            .assemble(artifacts, workspace, request.music_volume(), emitter)
            .await?;
        Ok((track, reconciliation.pauses))
    }
}
