//! Generate command handler: one local run of the pipeline.

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use calmwave_core::{
    Collaborators, GenerationInput, GenerationRequest, MeditationPipeline,
    NoopMeditationRepository, ProgressEvent, progress_channel,
};
use calmwave_media::FfmpegToolkit;
use calmwave_openai::DefaultOpenAiClient;

use crate::commands::GenerateArgs;

/// Owner recorded on locally generated meditations.
const LOCAL_USER: &str = "local";

/// Human-readable rendering of one progress event.
pub fn describe(event: &ProgressEvent) -> String {
    match event {
        ProgressEvent::Progress { step, progress } => format!("[{progress:>3}%] {step}"),
        ProgressEvent::Script { meditation } => format!(
            "Script ready: \"{}\" ({} segments)",
            meditation.meditation_script.title,
            meditation.meditation_script.segments.len()
        ),
        ProgressEvent::Complete { meditation } => format!(
            "Complete: {}",
            meditation.audio_file_path.as_deref().unwrap_or("no audio")
        ),
        ProgressEvent::Error { message } => format!("Error: {message}"),
    }
}

/// Generate a meditation and print progress as it arrives.
pub async fn execute(args: &GenerateArgs) -> Result<()> {
    let config = args.pipeline.pipeline_config();

    let media = FfmpegToolkit::new();
    media
        .check_available()
        .await
        .context("ffmpeg and ffprobe must be installed and on PATH")?;

    let openai_config = args.pipeline.openai_config();
    if !openai_config.has_shared_key() {
        return Err(anyhow!("Set OPENAI_API_KEY or pass --openai-api-key"));
    }
    let openai = Arc::new(DefaultOpenAiClient::new(openai_config).context("failed to build OpenAI client")?);

    let request = GenerationRequest::accept(
        LOCAL_USER,
        GenerationInput {
            user_input: args.prompt.clone(),
            music_volume: args.music_volume,
            duration_minutes: args.duration,
        },
        None,
        &config,
    )?;

    let pipeline = MeditationPipeline::new(
        config,
        Collaborators::new(
            openai.clone(),
            openai,
            Arc::new(media),
            Arc::new(NoopMeditationRepository),
        ),
    );

    let (emitter, mut receiver) = progress_channel();
    let json = args.json;
    let printer = tokio::spawn(async move {
        while let Some(event) = receiver.recv().await {
            if json {
                match event.to_line() {
                    Ok(line) => print!("{line}"),
                    Err(e) => tracing::error!(error = %e, "Failed to serialize progress event"),
                }
            } else {
                println!("{}", describe(&event));
            }
        }
    });

    let outcome = pipeline.run(request, &emitter).await;
    drop(emitter);
    printer.await?;

    let result = outcome.map_err(|e| anyhow!(e.user_message()))?;
    if !json {
        println!(
            "Saved {:.1}s of audio to {}",
            result.duration_secs,
            result.final_artifact.display()
        );
    }
    Ok(())
}
