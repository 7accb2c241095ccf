//! Request-scoped file lifecycle.
//!
//! Every file a request creates is reserved through its [`RequestWorkspace`]
//! as a [`TempArtifact`]. Dropping the guard deletes the file, so every exit
//! path (success, error, cancellation, panic unwinding) leaves the audio
//! directory clean. Only an explicitly persisted final track survives.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

/// Owned path that is deleted on drop unless persisted.
#[derive(Debug)]
pub struct TempArtifact {
    path: PathBuf,
    armed: bool,
}

impl TempArtifact {
    /// Take ownership of `path`. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            armed: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Keep the file and hand back its path.
    pub fn persist(mut self) -> PathBuf {
        self.armed = false;
        std::mem::take(&mut self.path)
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed temp file"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to remove temp file"),
        }
    }
}

/// Naming authority for one request's files.
///
/// All files share the prefix `meditation-<uuid>`.
#[derive(Debug, Clone)]
pub struct RequestWorkspace {
    dir: PathBuf,
    base: String,
}

impl RequestWorkspace {
    /// Ensure `dir` exists and allocate a fresh base name in it.
    pub async fn create(dir: &Path) -> io::Result<Self> {
        tokio::fs::create_dir_all(dir).await?;
        Ok(Self {
            dir: dir.to_path_buf(),
            base: format!("meditation-{}", Uuid::new_v4()),
        })
    }

    /// Shared file name prefix.
    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn reserve(&self, suffix: &str) -> TempArtifact {
        TempArtifact::new(self.dir.join(format!("{}{suffix}", self.base)))
    }

    /// Raw provider bytes for speech segment `index`.
    pub fn raw_speech(&self, index: usize) -> TempArtifact {
        self.reserve(&format!("-temp-{index}.mp3"))
    }

    /// Rendered audio for segment `index`.
    pub fn segment(&self, index: usize) -> TempArtifact {
        self.reserve(&format!("-segment-{index}.mp3"))
    }

    /// Auxiliary file for concatenation.
    pub fn concat_list(&self) -> TempArtifact {
        self.reserve("-list.txt")
    }

    /// Concatenated voice track.
    pub fn voice_track(&self) -> TempArtifact {
        self.reserve("-meditation.mp3")
    }

    /// Looped or trimmed background music.
    pub fn music_bed(&self) -> TempArtifact {
        self.reserve("-music.mp3")
    }

    /// The mixed result, `<base>.mp3`.
    pub fn final_track(&self) -> TempArtifact {
        self.reserve(".mp3")
    }

    /// Remove every file carrying this request's prefix.
    ///
    /// Catches writes that landed after their guard was dropped, e.g. from a
    /// cancelled task whose I/O was already in flight.
    pub fn sweep(&self) {
        let Ok(files) = self.leftover_files() else {
            return;
        };
        for path in files {
            if let Err(e) = std::fs::remove_file(&path) {
                warn!(path = %path.display(), error = %e, "Failed to sweep request file");
            }
        }
    }

    /// Files in the directory that carry this request's prefix.
    pub fn leftover_files(&self) -> io::Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            if entry.file_name().to_string_lossy().starts_with(&self.base) {
                found.push(entry.path());
            }
        }
        found.sort();
        Ok(found)
    }
}
