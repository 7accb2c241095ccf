//! Concurrent per-segment synthesis.
//!
//! Every segment of a script is rendered in its own task. Speech goes
//! through the speech provider, is transcoded to the output format and
//! probed for its real length; pauses become silence of their declared
//! length. The first failure aborts the remaining tasks, and every artifact
//! produced so far is dropped (and so deleted) before the error is returned.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::debug;

use crate::domain::{AudioFormat, Credential, Script, Segment, SegmentArtifact, SegmentKind};
use crate::error::PipelineError;
use crate::events::{ProgressEmitter, ProgressStep, speech_progress};
use crate::ports::{MediaError, MediaToolkit, SpeechSynthesizer};
use crate::reconcile::Reconciliation;
use crate::workspace::RequestWorkspace;

/// Renders script segments into audio artifacts.
#[derive(Clone)]
pub struct SegmentSynthesizer {
    speech: Arc<dyn SpeechSynthesizer>,
    media: Arc<dyn MediaToolkit>,
    format: AudioFormat,
    max_concurrent: usize,
}

impl SegmentSynthesizer {
    pub fn new(
        speech: Arc<dyn SpeechSynthesizer>,
        media: Arc<dyn MediaToolkit>,
        format: AudioFormat,
        max_concurrent: usize,
    ) -> Self {
        Self {
            speech,
            media,
            format,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Render every segment concurrently. The result is ordered by index.
    ///
    /// Emits a `generating-speech` checkpoint each time a speech segment
    /// finishes.
    pub async fn synthesize_all(
        &self,
        script: &Script,
        workspace: &RequestWorkspace,
        credential: Option<&Credential>,
        emitter: &ProgressEmitter,
    ) -> Result<Vec<SegmentArtifact>, PipelineError> {
        let permits = Arc::new(Semaphore::new(self.max_concurrent));
        let speech_total = script.speech_count();
        let speech_done = Arc::new(AtomicUsize::new(0));

        let mut tasks = JoinSet::new();
        for (index, segment) in script.segments.iter().enumerate() {
            let job = SegmentJob {
                index,
                segment: segment.clone(),
                speech: Arc::clone(&self.speech),
                media: Arc::clone(&self.media),
                format: self.format,
                workspace: workspace.clone(),
                credential: credential.cloned(),
            };
            let permits = Arc::clone(&permits);
            let speech_done = Arc::clone(&speech_done);
            let emitter = emitter.clone();

            tasks.spawn(async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|e| PipelineError::Task(e.to_string()))?;
                let artifact = job.run().await?;
                if artifact.kind() == SegmentKind::Speech {
                    let completed = speech_done.fetch_add(1, Ordering::SeqCst) + 1;
                    emitter.progress(
                        ProgressStep::GeneratingSpeech,
                        speech_progress(completed, speech_total),
                    );
                }
                Ok::<_, PipelineError>(artifact)
            });
        }

        let mut artifacts = Vec::with_capacity(script.segments.len());
        while let Some(joined) = tasks.join_next().await {
            let outcome = joined.map_err(|e| PipelineError::Task(e.to_string()));
            match outcome.and_then(|result| result) {
                Ok(artifact) => artifacts.push(artifact),
                Err(e) => {
                    tasks.abort_all();
                    // Wait for aborted tasks so their temp files are gone before returning.
                    while tasks.join_next().await.is_some() {}
                    return Err(e);
                }
            }
        }

        artifacts.sort_by_key(SegmentArtifact::index);
        Ok(artifacts)
    }

    /// Re-render pauses whose reconciled duration differs from what was rendered.
    ///
    /// `artifacts` must be ordered by index. Returns the updated list, still
    /// ordered.
    pub async fn apply_reconciliation(
        &self,
        artifacts: Vec<SegmentArtifact>,
        declared_pauses: &[f64],
        reconciliation: &Reconciliation,
        workspace: &RequestWorkspace,
    ) -> Result<Vec<SegmentArtifact>, PipelineError> {
        let changed = reconciliation.changed(declared_pauses);
        if changed.is_empty() {
            return Ok(artifacts);
        }

        let mut updated = Vec::with_capacity(artifacts.len());
        let mut pause_position = 0;
        for artifact in artifacts {
            if artifact.kind() != SegmentKind::Pause {
                updated.push(artifact);
                continue;
            }
            let position = pause_position;
            pause_position += 1;
            if !changed.contains(&position) {
                updated.push(artifact);
                continue;
            }

            let index = artifact.index();
            let duration = reconciliation.pauses[position];
            // The old file shares the new one's name; remove it first.
            drop(artifact);
            debug!(index, duration, "Re-rendering reconciled pause");
            updated.push(render_pause(self.media.as_ref(), &self.format, workspace, index, duration).await?);
        }
        Ok(updated)
    }
}

/// Everything one synthesis task needs, owned so it can cross `spawn`.
struct SegmentJob {
    index: usize,
    segment: Segment,
    speech: Arc<dyn SpeechSynthesizer>,
    media: Arc<dyn MediaToolkit>,
    format: AudioFormat,
    workspace: RequestWorkspace,
    credential: Option<Credential>,
}

impl SegmentJob {
    async fn run(self) -> Result<SegmentArtifact, PipelineError> {
        match &self.segment {
            Segment::Speech(speech) => self.render_speech(&speech.content).await,
            Segment::Pause(pause) => {
                render_pause(self.media.as_ref(), &self.format, &self.workspace, self.index, pause.duration).await
            }
        }
    }

    async fn render_speech(&self, content: &str) -> Result<SegmentArtifact, PipelineError> {
        let bytes = self
            .speech
            .synthesize(content, self.credential.as_ref())
            .await?;

        let raw = self.workspace.raw_speech(self.index);
        tokio::fs::write(raw.path(), &bytes)
            .await
            .map_err(MediaError::Io)?;

        let output = self.workspace.segment(self.index);
        self.media
            .transcode(raw.path(), output.path(), &self.format)
            .await?;
        drop(raw);

        let duration = self.media.probe_duration(output.path()).await?;
        debug!(index = self.index, duration, "Speech segment ready");
        Ok(SegmentArtifact::new(self.index, SegmentKind::Speech, output, duration))
    }
}

async fn render_pause(
    media: &dyn MediaToolkit,
    format: &AudioFormat,
    workspace: &RequestWorkspace,
    index: usize,
    duration: f64,
) -> Result<SegmentArtifact, PipelineError> {
    let output = workspace.segment(index);
    media.render_silence(duration, output.path(), format).await?;
    debug!(index, duration, "Pause segment ready");
    Ok(SegmentArtifact::new(index, SegmentKind::Pause, output, duration))
}

/// Paths of `artifacts` in their current order.
pub fn artifact_paths(artifacts: &[SegmentArtifact]) -> Vec<PathBuf> {
    artifacts.iter().map(|a| a.path().to_path_buf()).collect()
}
