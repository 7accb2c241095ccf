//! `MediaToolkit` backed by the `ffmpeg` and `ffprobe` binaries.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};

use async_trait::async_trait;
use calmwave_core::{AudioFormat, MediaError, MediaToolkit};
use tokio::process::Command;
use tracing::{debug, info};

use crate::args;

/// Stderr lines kept in a failure message.
const STDERR_TAIL_LINES: usize = 5;

/// Versions reported by the binaries at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolVersions {
    pub ffmpeg: String,
    pub ffprobe: String,
}

/// Runs audio operations through `ffmpeg`/`ffprobe` child processes.
#[derive(Debug, Clone)]
pub struct FfmpegToolkit {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
}

impl Default for FfmpegToolkit {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegToolkit {
    /// Use `ffmpeg` and `ffprobe` from `PATH`.
    pub fn new() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
        }
    }

    /// Use explicit binary locations.
    pub fn with_binaries(ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }

    /// Confirm both binaries run, returning their version banners.
    pub async fn check_available(&self) -> Result<ToolVersions, MediaError> {
        let ffmpeg = self.version_of(&self.ffmpeg).await?;
        let ffprobe = self.version_of(&self.ffprobe).await?;
        info!(%ffmpeg, %ffprobe, "Media tools available");
        Ok(ToolVersions { ffmpeg, ffprobe })
    }

    async fn version_of(&self, binary: &Path) -> Result<String, MediaError> {
        let output = run(binary, "version check", vec![OsString::from("-version")]).await?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().next().unwrap_or_default().trim().to_string())
    }

    async fn ffmpeg(&self, operation: &'static str, args: Vec<OsString>) -> Result<(), MediaError> {
        run(&self.ffmpeg, operation, args).await.map(|_| ())
    }
}

/// Run `binary` to completion; non-zero exit becomes `ToolFailed`.
///
/// The child is killed if the future is dropped.
async fn run(binary: &Path, operation: &'static str, args: Vec<OsString>) -> Result<Output, MediaError> {
    debug!(binary = %binary.display(), operation, ?args, "Running media tool");
    let output = Command::new(binary)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => {
                MediaError::Unavailable(format!("{} not found", binary.display()))
            }
            _ => MediaError::Io(e),
        })?;

    if !output.status.success() {
        return Err(MediaError::ToolFailed {
            operation,
            detail: failure_detail(&output),
        });
    }
    Ok(output)
}

fn failure_detail(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    let tail = lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..].join("\n");
    if tail.is_empty() {
        format!("exited with {}", output.status)
    } else {
        format!("exited with {}: {tail}", output.status)
    }
}

#[async_trait]
impl MediaToolkit for FfmpegToolkit {
    async fn transcode(&self, input: &Path, output: &Path, format: &AudioFormat) -> Result<(), MediaError> {
        self.ffmpeg("transcode", args::transcode(input, output, format))
            .await
    }

    async fn render_silence(&self, duration_secs: f64, output: &Path, format: &AudioFormat) -> Result<(), MediaError> {
        self.ffmpeg("silence", args::silence(duration_secs, output, format))
            .await
    }

    async fn concat(
        &self,
        inputs: &[PathBuf],
        scratch: &Path,
        output: &Path,
        _format: &AudioFormat,
    ) -> Result<(), MediaError> {
        tokio::fs::write(scratch, args::concat_list(inputs)).await?;
        self.ffmpeg("concat", args::concat(scratch, output))
            .await
    }

    async fn fit_to_duration(
        &self,
        source: &Path,
        duration_secs: f64,
        output: &Path,
        format: &AudioFormat,
    ) -> Result<(), MediaError> {
        self.ffmpeg(
            "music bed",
            args::fit_to_duration(source, duration_secs, output, format),
        )
        .await
    }

    async fn mix(
        &self,
        voice: &Path,
        music: &Path,
        music_gain: f64,
        output: &Path,
        format: &AudioFormat,
    ) -> Result<(), MediaError> {
        self.ffmpeg("mix", args::mix(voice, music, music_gain, output, format))
            .await
    }

    async fn probe_duration(&self, input: &Path) -> Result<f64, MediaError> {
        let output = run(&self.ffprobe, "probe", args::probe_duration(input)).await?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        args::parse_duration(&stdout).ok_or_else(|| MediaError::InvalidOutput {
            operation: "probe",
            detail: stdout.trim().to_string(),
        })
    }
}
