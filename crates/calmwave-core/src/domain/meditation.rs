//! Persisted meditation records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Script;

/// A finished meditation as stored and returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meditation {
    pub id: Uuid,
    pub user_id: String,
    pub user_input: String,
    pub meditation_script: Script,
    /// Public reference to the mixed audio, e.g. `/audio/meditation-<id>.mp3`.
    pub audio_file_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data needed to store a new meditation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMeditation {
    pub user_id: String,
    pub user_input: String,
    pub script: Script,
    pub audio_file_path: String,
}

impl NewMeditation {
    /// Materialize the record with a fresh id and timestamps.
    pub fn into_meditation(self) -> Meditation {
        let now = Utc::now();
        Meditation {
            id: Uuid::new_v4(),
            user_id: self.user_id,
            user_input: self.user_input,
            meditation_script: self.script,
            audio_file_path: Some(self.audio_file_path),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Payload of the early "script ready" event: the script with no audio yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptReady {
    pub meditation_script: Script,
    pub audio_file_path: Option<String>,
}

impl ScriptReady {
    pub const fn new(script: Script) -> Self {
        Self {
            meditation_script: script,
            audio_file_path: None,
        }
    }
}

/// One page of a user's meditation history, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeditationPage {
    pub meditations: Vec<Meditation>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl MeditationPage {
    /// Number of pages needed for `total` records at `limit` per page.
    pub const fn total_pages(&self) -> u64 {
        if self.limit == 0 {
            0
        } else {
            self.total.div_ceil(self.limit as u64)
        }
    }
}
