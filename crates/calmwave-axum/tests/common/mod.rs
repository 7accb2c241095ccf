//! Shared test fixtures: in-process fakes for every port and a router
//! wired to them with an in-memory database.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use calmwave_axum::{AxumContext, CorsConfig, create_router};
use calmwave_core::{
    AudioFormat, CollaboratorError, CollaboratorKind, Collaborators, Credential, MediaError,
    MediaToolkit, MeditationHistoryService, MeditationPipeline, PipelineConfig, ScriptGenerator,
    ScriptPrompt, SpeechSynthesizer,
};
use calmwave_db::{RepositoryFactory, setup_test_database};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

/// A one-minute script: two spoken lines around a single pause.
pub const SCRIPT_JSON: &str = r#"{
    "title": "Before the Talk",
    "targetWordCount": 100,
    "actualWordCount": 8,
    "durationMinutes": 1,
    "segments": [
        {"type": "speech", "content": "Notice your feet on the floor.", "wordCount": 6, "duration": 3},
        {"type": "pause", "duration": 30},
        {"type": "speech", "content": "You are ready.", "wordCount": 3, "duration": 2}
    ]
}"#;

/// Returns a canned script and records which key each call carried.
pub struct FakeScripts {
    response: Result<String, String>,
    pub credentials: Mutex<Vec<Option<String>>>,
}

impl FakeScripts {
    pub fn returning(json: &str) -> Self {
        Self {
            response: Ok(json.to_string()),
            credentials: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            credentials: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ScriptGenerator for FakeScripts {
    async fn generate_script(
        &self,
        _prompt: &ScriptPrompt,
        credential: Option<&Credential>,
    ) -> Result<String, CollaboratorError> {
        self.credentials
            .lock()
            .unwrap()
            .push(credential.map(|c| c.expose().to_string()));
        self.response
            .clone()
            .map_err(|m| CollaboratorError::new(CollaboratorKind::ScriptGeneration, m))
    }
}

/// "Audio" is the spoken text itself.
pub struct FakeSpeech;

#[async_trait]
impl SpeechSynthesizer for FakeSpeech {
    async fn synthesize(
        &self,
        text: &str,
        _credential: Option<&Credential>,
    ) -> Result<Vec<u8>, CollaboratorError> {
        Ok(text.as_bytes().to_vec())
    }
}

/// Every rendered file holds its duration as text; speech runs half a
/// second per word.
pub struct FakeMedia;

async fn read_secs(path: &Path) -> Result<f64, MediaError> {
    let text = tokio::fs::read_to_string(path).await?;
    text.trim().parse().map_err(|_| MediaError::InvalidOutput {
        operation: "probe",
        detail: text,
    })
}

#[async_trait]
impl MediaToolkit for FakeMedia {
    async fn transcode(&self, input: &Path, output: &Path, _format: &AudioFormat) -> Result<(), MediaError> {
        let text = tokio::fs::read_to_string(input).await?;
        let secs = text.split_whitespace().count() as f64 * 0.5;
        tokio::fs::write(output, secs.to_string()).await?;
        Ok(())
    }

    async fn render_silence(&self, duration_secs: f64, output: &Path, _format: &AudioFormat) -> Result<(), MediaError> {
        tokio::fs::write(output, duration_secs.to_string()).await?;
        Ok(())
    }

    async fn concat(
        &self,
        inputs: &[PathBuf],
        scratch: &Path,
        output: &Path,
        _format: &AudioFormat,
    ) -> Result<(), MediaError> {
        tokio::fs::write(scratch, "list").await?;
        let mut total = 0.0;
        for input in inputs {
            total += read_secs(input).await?;
        }
        tokio::fs::write(output, total.to_string()).await?;
        Ok(())
    }

    async fn fit_to_duration(
        &self,
        _source: &Path,
        duration_secs: f64,
        output: &Path,
        _format: &AudioFormat,
    ) -> Result<(), MediaError> {
        tokio::fs::write(output, duration_secs.to_string()).await?;
        Ok(())
    }

    async fn mix(
        &self,
        voice: &Path,
        _music: &Path,
        _music_gain: f64,
        output: &Path,
        _format: &AudioFormat,
    ) -> Result<(), MediaError> {
        tokio::fs::copy(voice, output).await?;
        Ok(())
    }

    async fn probe_duration(&self, input: &Path) -> Result<f64, MediaError> {
        read_secs(input).await
    }
}

/// Router plus the handles tests inspect afterwards.
pub struct TestApp {
    pub router: Router,
    pub audio_dir: PathBuf,
    pub scripts: Arc<FakeScripts>,
    _dir: TempDir,
}

impl TestApp {
    pub async fn new(scripts: FakeScripts, shared_key_configured: bool) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let audio_dir = dir.path().join("audio");
        let music = dir.path().join("background-music.mp3");
        std::fs::write(&music, "600").unwrap();

        let scripts = Arc::new(scripts);
        let meditations = RepositoryFactory::meditation_repository(setup_test_database().await.unwrap());
        let collaborators = Collaborators::new(
            scripts.clone(),
            Arc::new(FakeSpeech),
            Arc::new(FakeMedia),
            Arc::clone(&meditations),
        );
        let pipeline = Arc::new(MeditationPipeline::new(
            PipelineConfig::new(&audio_dir, &music),
            collaborators,
        ));
        let ctx = AxumContext::new(
            pipeline,
            MeditationHistoryService::new(meditations),
            shared_key_configured,
        );

        Self {
            router: create_router(ctx, &CorsConfig::AllowAll),
            audio_dir,
            scripts,
            _dir: dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Files currently in the audio directory.
    pub fn audio_files(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.audio_dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

pub fn generate_request(user: Option<&str>, key: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/generate-meditation")
        .header("content-type", "application/json");
    if let Some(user) = user {
        builder = builder.header("x-user-id", user);
    }
    if let Some(key) = key {
        builder = builder.header("x-openai-key", key);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get_request(uri: &str, user: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(user) = user {
        builder = builder.header("x-user-id", user);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Parse a progress stream into one JSON value per line.
pub async fn body_events(response: Response<Body>) -> Vec<serde_json::Value> {
    let bytes = body_bytes(response).await;
    String::from_utf8(bytes)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}
