//! Axum server bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the web adapter. All concrete implementations are instantiated here.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use calmwave_core::config::DEFAULT_MAX_CONCURRENT_SYNTHESIS;
use calmwave_core::{
    Collaborators, MeditationHistoryService, MeditationPipeline, PipelineConfig,
};
use calmwave_db::{RepositoryFactory, setup_database};
use calmwave_media::FfmpegToolkit;
use calmwave_openai::{DefaultOpenAiClient, OpenAiConfig};
use tokio::net::TcpListener;
use tracing::{info, warn};

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default)]
pub enum CorsConfig {
    /// Allow all origins (development mode).
    #[default]
    AllowAll,
    /// Allow specific origins (production mode).
    AllowOrigins(Vec<String>),
}

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port for the HTTP server.
    pub port: u16,
    /// Where request files and finished audio live; served under `/audio`.
    pub audio_dir: PathBuf,
    /// Source track for the music bed.
    pub background_music: PathBuf,
    /// `SQLite` database file.
    pub db_path: PathBuf,
    /// Upper bound on concurrent speech requests per generation.
    pub max_concurrent_synthesis: usize,
    /// OpenAI client settings, including the optional shared key.
    pub openai: OpenAiConfig,
    /// CORS configuration.
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            audio_dir: PathBuf::from("public/audio"),
            background_music: PathBuf::from("public/background/background-music.mp3"),
            db_path: PathBuf::from("data/calmwave.db"),
            max_concurrent_synthesis: DEFAULT_MAX_CONCURRENT_SYNTHESIS,
            openai: OpenAiConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Set CORS to allow specific origins.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors = CorsConfig::AllowOrigins(origins);
        self
    }

    /// Pipeline settings derived from this server configuration.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::new(&self.audio_dir, &self.background_music)
            .with_max_concurrent_synthesis(self.max_concurrent_synthesis)
    }
}

/// Application context for the Axum adapter.
pub struct AxumContext {
    /// Generation pipeline shared by every request.
    pub pipeline: Arc<MeditationPipeline>,
    /// Read access to stored meditations.
    pub history: MeditationHistoryService,
    /// Whether a shared OpenAI key is available for callers without their own.
    pub shared_key_configured: bool,
}

impl AxumContext {
    pub const fn new(
        pipeline: Arc<MeditationPipeline>,
        history: MeditationHistoryService,
        shared_key_configured: bool,
    ) -> Self {
        Self {
            pipeline,
            history,
            shared_key_configured,
        }
    }
}

/// Wire the database, media tools and OpenAI client into a context.
pub async fn bootstrap(config: ServerConfig) -> Result<AxumContext> {
    info!(
        target: "calmwave.paths",
        audio_dir = %config.audio_dir.display(),
        background_music = %config.background_music.display(),
        db_path = %config.db_path.display(),
        "Axum bootstrap resolved paths"
    );

    // 1. Media tools must be present before anything is accepted
    let media = FfmpegToolkit::new();
    media
        .check_available()
        .await
        .context("ffmpeg and ffprobe must be installed and on PATH")?;

    if !config.background_music.is_file() {
        warn!(
            path = %config.background_music.display(),
            "Background music not found; generations will fail at the mixing step"
        );
    }

    // 2. Database
    let pool = setup_database(&config.db_path).await?;
    let meditations = RepositoryFactory::meditation_repository(pool);

    // 3. OpenAI serves both text and speech
    let shared_key_configured = config.openai.has_shared_key();
    if !shared_key_configured {
        warn!("No shared OpenAI key configured; callers must send x-openai-key");
    }
    let openai = Arc::new(
        DefaultOpenAiClient::new(config.openai.clone()).context("failed to build OpenAI client")?,
    );

    // 4. Pipeline and history
    let collaborators = Collaborators::new(
        openai.clone(),
        openai,
        Arc::new(media),
        Arc::clone(&meditations),
    );
    let pipeline = Arc::new(MeditationPipeline::new(config.pipeline_config(), collaborators));
    let history = MeditationHistoryService::new(meditations);

    Ok(AxumContext::new(pipeline, history, shared_key_configured))
}

/// Bootstrap and serve until Ctrl-C.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    let ctx = bootstrap(config.clone()).await?;
    let app = crate::routes::create_router(ctx, &config.cors);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("calmwave server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("calmwave server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
