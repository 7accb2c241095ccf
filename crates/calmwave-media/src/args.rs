//! `ffmpeg`/`ffprobe` argument construction.
//!
//! Every function here is pure: it turns paths, durations and an
//! [`AudioFormat`] into an argument vector. Execution lives in `toolkit`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use calmwave_core::AudioFormat;

/// Builder for an `ffmpeg` invocation.
///
/// Global flags keep output quiet, never read stdin, and overwrite outputs.
///
/// # Example
///
/// ```rust,ignore
/// let args = FfmpegArgs::new()
///     .input(voice)
///     .encode(&AudioFormat::default())
///     .output(out)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct FfmpegArgs {
    args: Vec<OsString>,
}

impl Default for FfmpegArgs {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegArgs {
    pub fn new() -> Self {
        Self {
            args: ["-hide_banner", "-nostdin", "-loglevel", "error", "-y"]
                .into_iter()
                .map(OsString::from)
                .collect(),
        }
    }

    /// Append a raw argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append a flag followed by its value.
    #[must_use]
    pub fn flag(self, key: &str, value: impl Into<OsString>) -> Self {
        self.arg(key).arg(value)
    }

    /// Add an input file.
    #[must_use]
    pub fn input(self, path: &Path) -> Self {
        self.flag("-i", path)
    }

    /// Encode the output at `format`.
    #[must_use]
    pub fn encode(self, format: &AudioFormat) -> Self {
        self.flag("-ar", format.sample_rate.to_string())
            .flag("-ac", format.channels.to_string())
            .flag("-b:a", format!("{}k", format.bitrate_kbps))
    }

    /// Set the output file. Must come last.
    #[must_use]
    pub fn output(self, path: &Path) -> Self {
        self.arg(path)
    }

    pub fn build(self) -> Vec<OsString> {
        self.args
    }
}

/// Durations are passed with millisecond precision.
fn seconds(duration: f64) -> String {
    format!("{:.3}", duration.max(0.0))
}

fn channel_layout(channels: u16) -> String {
    match channels {
        1 => "mono".to_string(),
        2 => "stereo".to_string(),
        n => format!("{n}c"),
    }
}

/// Re-encode provider audio at the fixed format.
pub fn transcode(input: &Path, output: &Path, format: &AudioFormat) -> Vec<OsString> {
    FfmpegArgs::new().input(input).encode(format).output(output).build()
}

/// Render silence from the `anullsrc` generator.
pub fn silence(duration: f64, output: &Path, format: &AudioFormat) -> Vec<OsString> {
    let source = format!(
        "anullsrc=r={}:cl={}",
        format.sample_rate,
        channel_layout(format.channels)
    );
    FfmpegArgs::new()
        .flag("-f", "lavfi")
        .flag("-i", source)
        .flag("-t", seconds(duration))
        .encode(format)
        .output(output)
        .build()
}

/// Join the files named in a concat-demuxer list.
///
/// Inputs are already encoded at the session format, so streams are copied.
pub fn concat(list: &Path, output: &Path) -> Vec<OsString> {
    FfmpegArgs::new()
        .flag("-f", "concat")
        .flag("-safe", "0")
        .input(list)
        .flag("-c", "copy")
        .output(output)
        .build()
}

/// Loop `source` indefinitely and cut it at `duration`.
pub fn fit_to_duration(source: &Path, duration: f64, output: &Path, format: &AudioFormat) -> Vec<OsString> {
    FfmpegArgs::new()
        .flag("-stream_loop", "-1")
        .input(source)
        .flag("-t", seconds(duration))
        .encode(format)
        .output(output)
        .build()
}

/// Mix voice at unity gain with music at `music_gain`.
pub fn mix(voice: &Path, music: &Path, music_gain: f64, output: &Path, format: &AudioFormat) -> Vec<OsString> {
    let filter = format!(
        "[1:a]volume={:.3}[m];[0:a][m]amix=inputs=2:duration=longest:normalize=0",
        music_gain.clamp(0.0, 1.0)
    );
    FfmpegArgs::new()
        .input(voice)
        .input(music)
        .flag("-filter_complex", filter)
        .encode(format)
        .output(output)
        .build()
}

/// Ask `ffprobe` for the container duration only.
pub fn probe_duration(input: &Path) -> Vec<OsString> {
    [
        "-v",
        "error",
        "-show_entries",
        "format=duration",
        "-of",
        "default=noprint_wrappers=1:nokey=1",
    ]
    .into_iter()
    .map(OsString::from)
    .chain(std::iter::once(input.as_os_str().to_owned()))
    .collect()
}

/// Contents of a concat-demuxer list for `inputs`, in order.
pub fn concat_list(inputs: &[PathBuf]) -> String {
    inputs
        .iter()
        .map(|path| {
            let escaped = path.to_string_lossy().replace('\'', r"'\''");
            format!("file '{escaped}'\n")
        })
        .collect()
}

/// Parse `ffprobe`'s duration output.
pub fn parse_duration(stdout: &str) -> Option<f64> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .and_then(|line| line.parse::<f64>().ok())
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
}
