//! Audio toolkit port.
//!
//! Every operation reads and writes files at caller-owned paths and renders
//! at an explicit [`AudioFormat`]. Implementations decide how; the core never
//! sees a command line.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::MediaError;
use crate::domain::AudioFormat;

#[async_trait]
pub trait MediaToolkit: Send + Sync {
    /// Re-encode `input` into `output` at `format`.
    async fn transcode(&self, input: &Path, output: &Path, format: &AudioFormat) -> Result<(), MediaError>;

    /// Render `duration_secs` of silence into `output`.
    async fn render_silence(&self, duration_secs: f64, output: &Path, format: &AudioFormat) -> Result<(), MediaError>;

    /// Join `inputs` in order into `output`.
    ///
    /// `scratch` is a request-owned path the implementation may use for an
    /// auxiliary file such as a concat list.
    async fn concat(
        &self,
        inputs: &[PathBuf],
        scratch: &Path,
        output: &Path,
        format: &AudioFormat,
    ) -> Result<(), MediaError>;

    /// Write exactly `duration_secs` of `source` to `output`, looping if the
    /// source is shorter and trimming if it is longer.
    async fn fit_to_duration(
        &self,
        source: &Path,
        duration_secs: f64,
        output: &Path,
        format: &AudioFormat,
    ) -> Result<(), MediaError>;

    /// Mix `voice` at unity gain with `music` at `music_gain`; the result is
    /// as long as the longer input.
    async fn mix(
        &self,
        voice: &Path,
        music: &Path,
        music_gain: f64,
        output: &Path,
        format: &AudioFormat,
    ) -> Result<(), MediaError>;

    /// Duration of `input` in seconds.
    async fn probe_duration(&self, input: &Path) -> Result<f64, MediaError>;
}
