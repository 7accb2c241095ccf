//! Audio output format and per-segment artifacts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::workspace::TempArtifact;

/// Fixed encoding every segment, intermediate and final track is rendered at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioFormat {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
    /// Constant bitrate in kbit/s.
    pub bitrate_kbps: u32,
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            channels: 2,
            bitrate_kbps: 192,
        }
    }
}

/// Whether an artifact holds voice or silence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Speech,
    Pause,
}

/// One rendered segment, tagged with its position in the script.
///
/// The backing file is a request-scoped [`TempArtifact`] and is deleted when
/// the artifact is dropped.
#[derive(Debug)]
pub struct SegmentArtifact {
    index: usize,
    kind: SegmentKind,
    file: TempArtifact,
    duration_secs: f64,
}

impl SegmentArtifact {
    pub const fn new(index: usize, kind: SegmentKind, file: TempArtifact, duration_secs: f64) -> Self {
        Self {
            index,
            kind,
            file,
            duration_secs,
        }
    }

    /// Position of the segment in `Script::segments`.
    pub const fn index(&self) -> usize {
        self.index
    }

    pub const fn kind(&self) -> SegmentKind {
        self.kind
    }

    /// Location of the rendered audio.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Measured duration for speech, rendered duration for pauses.
    pub const fn duration_secs(&self) -> f64 {
        self.duration_secs
    }
}
