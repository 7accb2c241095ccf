//! Subcommands and their arguments.

use std::path::PathBuf;

use calmwave_axum::{CorsConfig, ServerConfig};
use calmwave_core::PipelineConfig;
use calmwave_core::config::DEFAULT_MAX_CONCURRENT_SYNTHESIS;
use calmwave_openai::{DEFAULT_BASE_URL, OpenAiConfig};
use clap::{Args, Subcommand};

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Generate one meditation locally and print its progress
    Generate(GenerateArgs),
}

/// Settings shared by every command that runs the pipeline.
#[derive(Args, Debug, Clone)]
pub struct PipelineArgs {
    /// Directory for request files and finished audio
    #[arg(long, env = "CALMWAVE_AUDIO_DIR", default_value = "public/audio")]
    pub audio_dir: PathBuf,

    /// Track looped or trimmed under the voice
    #[arg(
        long,
        env = "CALMWAVE_BACKGROUND_MUSIC",
        default_value = "public/background/background-music.mp3"
    )]
    pub background_music: PathBuf,

    /// Concurrent speech requests per generation
    #[arg(long, env = "CALMWAVE_MAX_CONCURRENT_SYNTHESIS", default_value_t = DEFAULT_MAX_CONCURRENT_SYNTHESIS)]
    pub max_concurrent_synthesis: usize,

    /// Shared OpenAI key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// OpenAI API root
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub openai_base_url: String,

    /// Speech voice
    #[arg(long, env = "CALMWAVE_VOICE", default_value = "alloy")]
    pub voice: String,
}

impl PipelineArgs {
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::new(&self.audio_dir, &self.background_music)
            .with_max_concurrent_synthesis(self.max_concurrent_synthesis)
    }

    pub fn openai_config(&self) -> OpenAiConfig {
        OpenAiConfig::new()
            .with_base_url(self.openai_base_url.clone())
            .with_voice(self.voice.clone())
            .with_optional_api_key(self.openai_api_key.clone())
    }
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub pipeline: PipelineArgs,

    /// Interface to bind
    #[arg(long, env = "CALMWAVE_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "CALMWAVE_PORT", default_value_t = 3000)]
    pub port: u16,

    /// `SQLite` database file
    #[arg(long, env = "CALMWAVE_DB_PATH", default_value = "data/calmwave.db")]
    pub db_path: PathBuf,

    /// Allowed CORS origins, comma separated; any origin when empty
    #[arg(long, env = "CALMWAVE_ALLOWED_ORIGINS", value_delimiter = ',')]
    pub allowed_origins: Vec<String>,
}

impl ServeArgs {
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
            audio_dir: self.pipeline.audio_dir.clone(),
            background_music: self.pipeline.background_music.clone(),
            db_path: self.db_path.clone(),
            max_concurrent_synthesis: self.pipeline.max_concurrent_synthesis,
            openai: self.pipeline.openai_config(),
            cors: if self.allowed_origins.is_empty() {
                CorsConfig::AllowAll
            } else {
                CorsConfig::AllowOrigins(self.allowed_origins.clone())
            },
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub pipeline: PipelineArgs,

    /// How you are feeling, in your own words
    pub prompt: String,

    /// Session length in minutes (1-10)
    #[arg(short, long)]
    pub duration: Option<f64>,

    /// Background music volume (0-1)
    #[arg(short, long)]
    pub music_volume: Option<f64>,

    /// Print raw progress lines instead of a summary
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use crate::parser::Cli;

    use super::*;

    #[test]
    fn test_serve_args() {
        let cli = Cli::parse_from([
            "calmwave",
            "serve",
            "--port",
            "8080",
            "--allowed-origins",
            "https://a.example,https://b.example",
            "--audio-dir",
            "/srv/audio",
        ]);
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        let config = args.server_config();
        assert_eq!(config.port, 8080);
        assert_eq!(config.audio_dir, PathBuf::from("/srv/audio"));
        assert!(matches!(config.cors, CorsConfig::AllowOrigins(ref o) if o.len() == 2));
    }

    #[test]
    fn test_generate_args() {
        let cli = Cli::parse_from([
            "calmwave",
            "generate",
            "I'm anxious before a talk",
            "--duration",
            "2",
            "--music-volume",
            "0.3",
            "--json",
        ]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.prompt, "I'm anxious before a talk");
        assert_eq!(args.duration, Some(2.0));
        assert_eq!(args.music_volume, Some(0.3));
        assert!(args.json);
        assert_eq!(args.pipeline.pipeline_config().public_prefix, "/audio");
    }
}
