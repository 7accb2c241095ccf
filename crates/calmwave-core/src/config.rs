//! Pipeline configuration.
//!
//! Every tunable the pipeline reads comes from [`PipelineConfig`], which is
//! passed into the pipeline entry point. Core logic holds no process-wide
//! defaults of its own.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{AudioFormat, clamp_duration_minutes, clamp_music_volume};

/// Default linear gain of the background music bed.
pub const DEFAULT_MUSIC_VOLUME: f64 = 0.3;

/// Default session length in minutes.
pub const DEFAULT_DURATION_MINUTES: u32 = 5;

/// Default cap on concurrent synthesis tasks per request.
pub const DEFAULT_MAX_CONCURRENT_SYNTHESIS: usize = 8;

/// Default URL prefix under which finished audio is served.
pub const DEFAULT_PUBLIC_PREFIX: &str = "/audio";

/// Configuration for one pipeline instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineConfig {
    /// Directory that holds request temp files and finished audio.
    pub audio_dir: PathBuf,
    /// Source track for the background music bed.
    pub background_music: PathBuf,
    /// URL prefix used to build the public audio reference.
    pub public_prefix: String,
    /// Encoding every rendered file uses.
    pub format: AudioFormat,
    /// Music gain used when the request does not specify one.
    pub default_music_volume: f64,
    /// Session length used when the request does not specify one.
    pub default_duration_minutes: u32,
    /// Upper bound on in-flight synthesis tasks per request.
    pub max_concurrent_synthesis: usize,
}

impl PipelineConfig {
    /// Create a configuration with default tunables.
    pub fn new(audio_dir: impl Into<PathBuf>, background_music: impl Into<PathBuf>) -> Self {
        Self {
            audio_dir: audio_dir.into(),
            background_music: background_music.into(),
            public_prefix: DEFAULT_PUBLIC_PREFIX.to_string(),
            format: AudioFormat::default(),
            default_music_volume: DEFAULT_MUSIC_VOLUME,
            default_duration_minutes: DEFAULT_DURATION_MINUTES,
            max_concurrent_synthesis: DEFAULT_MAX_CONCURRENT_SYNTHESIS,
        }
    }

    /// Set the public URL prefix. Trailing slashes are dropped.
    #[must_use]
    pub fn with_public_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.public_prefix = prefix.trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub const fn with_format(mut self, format: AudioFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the default music volume, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_default_music_volume(mut self, volume: f64) -> Self {
        self.default_music_volume = clamp_music_volume(volume);
        self
    }

    /// Set the default duration, clamped to the supported range.
    #[must_use]
    pub fn with_default_duration_minutes(mut self, minutes: u32) -> Self {
        self.default_duration_minutes = clamp_duration_minutes(f64::from(minutes));
        self
    }

    /// Set the synthesis concurrency cap. Zero is treated as one.
    #[must_use]
    pub fn with_max_concurrent_synthesis(mut self, limit: usize) -> Self {
        self.max_concurrent_synthesis = limit.max(1);
        self
    }

    pub fn audio_dir(&self) -> &Path {
        &self.audio_dir
    }

    /// Public reference for a finished file named `<base>.mp3`.
    pub fn public_path(&self, base: &str) -> String {
        format!("{}/{base}.mp3", self.public_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::new("/data/audio", "/data/music.mp3");
        assert_eq!(config.audio_dir(), Path::new("/data/audio"));
        assert!((config.default_music_volume - 0.3).abs() < f64::EPSILON);
        assert_eq!(config.default_duration_minutes, 5);
        assert_eq!(config.max_concurrent_synthesis, 8);
        assert_eq!(config.format, AudioFormat::default());
    }

    #[test]
    fn test_builders_clamp() {
        let config = PipelineConfig::new("a", "b")
            .with_default_music_volume(4.0)
            .with_default_duration_minutes(60)
            .with_max_concurrent_synthesis(0);
        assert!((config.default_music_volume - 1.0).abs() < f64::EPSILON);
        assert_eq!(config.default_duration_minutes, 10);
        assert_eq!(config.max_concurrent_synthesis, 1);
    }

    #[test]
    fn test_public_path() {
        let config = PipelineConfig::new("a", "b");
        assert_eq!(config.public_path("meditation-1"), "/audio/meditation-1.mp3");

        let config = config.with_public_prefix("https://cdn.example.com/audio/");
        assert_eq!(
            config.public_path("meditation-1"),
            "https://cdn.example.com/audio/meditation-1.mp3"
        );
    }
}
