//! In-process fakes for the pipeline ports.
//!
//! `FakeMedia` stores each file's duration as its text content, so probing a
//! file reads back exactly what was rendered into it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{AudioFormat, Credential};
use crate::ports::{
    CollaboratorError, CollaboratorKind, MediaError, MediaToolkit, ScriptGenerator,
    SpeechSynthesizer,
};
use crate::timing::ScriptPrompt;

pub struct FakeScripts {
    pub response: Result<String, String>,
    pub prompts: Mutex<Vec<ScriptPrompt>>,
}

impl FakeScripts {
    pub fn returning(json: &str) -> Self {
        Self {
            response: Ok(json.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ScriptGenerator for FakeScripts {
    async fn generate_script(
        &self,
        prompt: &ScriptPrompt,
        _credential: Option<&Credential>,
    ) -> Result<String, CollaboratorError> {
        self.prompts.lock().unwrap().push(prompt.clone());
        self.response
            .clone()
            .map_err(|m| CollaboratorError::new(CollaboratorKind::ScriptGeneration, m))
    }
}

/// Speaks `seconds_per_word` per word of content.
pub struct FakeSpeech {
    pub seconds_per_word: f64,
    pub fail_containing: Option<String>,
    pub delays: HashMap<String, Duration>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeSpeech {
    pub fn new(seconds_per_word: f64) -> Self {
        Self {
            seconds_per_word,
            fail_containing: None,
            delays: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on(mut self, needle: &str) -> Self {
        self.fail_containing = Some(needle.to_string());
        self
    }

    pub fn with_delay(mut self, text: &str, delay: Duration) -> Self {
        self.delays.insert(text.to_string(), delay);
        self
    }
}

#[async_trait]
impl SpeechSynthesizer for FakeSpeech {
    async fn synthesize(
        &self,
        text: &str,
        _credential: Option<&Credential>,
    ) -> Result<Vec<u8>, CollaboratorError> {
        self.calls.lock().unwrap().push(text.to_string());
        if let Some(delay) = self.delays.get(text) {
            tokio::time::sleep(*delay).await;
        }
        if self
            .fail_containing
            .as_deref()
            .is_some_and(|needle| text.contains(needle))
        {
            return Err(CollaboratorError::new(
                CollaboratorKind::SpeechSynthesis,
                "provider returned 500",
            ));
        }
        let words = text.split_whitespace().count() as f64;
        Ok((words * self.seconds_per_word).to_string().into_bytes())
    }
}

#[derive(Default)]
pub struct FakeMedia {
    pub concat_inputs: Mutex<Vec<PathBuf>>,
    pub silences: Mutex<Vec<f64>>,
    pub mix_gain: Mutex<Option<f64>>,
}

impl FakeMedia {
    async fn write_duration(path: &Path, secs: f64) -> Result<(), MediaError> {
        tokio::fs::write(path, secs.to_string()).await?;
        Ok(())
    }

    async fn read_duration(path: &Path) -> Result<f64, MediaError> {
        let text = tokio::fs::read_to_string(path).await?;
        text.trim().parse().map_err(|_| MediaError::InvalidOutput {
            operation: "probe",
            detail: text,
        })
    }
}

#[async_trait]
impl MediaToolkit for FakeMedia {
    async fn transcode(&self, input: &Path, output: &Path, _format: &AudioFormat) -> Result<(), MediaError> {
        let secs = Self::read_duration(input).await?;
        Self::write_duration(output, secs).await
    }

    async fn render_silence(&self, duration_secs: f64, output: &Path, _format: &AudioFormat) -> Result<(), MediaError> {
        self.silences.lock().unwrap().push(duration_secs);
        Self::write_duration(output, duration_secs).await
    }

    async fn concat(
        &self,
        inputs: &[PathBuf],
        scratch: &Path,
        output: &Path,
        _format: &AudioFormat,
    ) -> Result<(), MediaError> {
        tokio::fs::write(scratch, format!("{inputs:?}")).await?;
        let mut total = 0.0;
        for input in inputs {
            total += Self::read_duration(input).await?;
        }
        *self.concat_inputs.lock().unwrap() = inputs.to_vec();
        Self::write_duration(output, total).await
    }

    async fn fit_to_duration(
        &self,
        _source: &Path,
        duration_secs: f64,
        output: &Path,
        _format: &AudioFormat,
    ) -> Result<(), MediaError> {
        Self::write_duration(output, duration_secs).await
    }

    async fn mix(
        &self,
        voice: &Path,
        music: &Path,
        music_gain: f64,
        output: &Path,
        _format: &AudioFormat,
    ) -> Result<(), MediaError> {
        *self.mix_gain.lock().unwrap() = Some(music_gain);
        let longest = Self::read_duration(voice)
            .await?
            .max(Self::read_duration(music).await?);
        Self::write_duration(output, longest).await
    }

    async fn probe_duration(&self, input: &Path) -> Result<f64, MediaError> {
        Self::read_duration(input).await
    }
}

/// Segment index encoded in a `-segment-<i>.mp3` file name.
pub fn segment_index(path: &Path) -> usize {
    let name = path.file_name().unwrap().to_string_lossy();
    let start = name.rfind("-segment-").unwrap() + "-segment-".len();
    name[start..].trim_end_matches(".mp3").parse().unwrap()
}
