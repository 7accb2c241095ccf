//! Generation request: the accepted, clamped input to the pipeline.
//!
//! Raw caller input arrives as a [`GenerationInput`] (the JSON body shape).
//! It is turned into an immutable [`GenerationRequest`] exactly once, at the
//! boundary, using the defaults carried by [`PipelineConfig`].

use std::fmt;

use serde::Deserialize;

use crate::config::PipelineConfig;
use crate::domain::ValidationError;

/// Shortest session the pipeline will generate, in minutes.
pub const MIN_DURATION_MINUTES: u32 = 1;

/// Longest session the pipeline will generate, in minutes.
pub const MAX_DURATION_MINUTES: u32 = 10;

/// Opaque per-caller credential handed to the external collaborators.
///
/// The value is never printed; `Debug` shows a redacted form.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw credential value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Expose the raw value to an adapter that needs to send it.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Raw request body as posted by a client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationInput {
    /// Free-text description of how the user feels.
    #[serde(default)]
    pub user_input: String,
    /// Background music gain, clamped to `[0, 1]` on acceptance.
    pub music_volume: Option<f64>,
    /// Session length, rounded and clamped to `[1, 10]` on acceptance.
    pub duration_minutes: Option<f64>,
}

/// An accepted generation request. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    owner: String,
    user_input: String,
    music_volume: f64,
    duration_minutes: u32,
    credential: Option<Credential>,
}

impl GenerationRequest {
    /// Validate and clamp raw input into a request owned by `owner`.
    ///
    /// Missing optional fields fall back to the defaults in `config`.
    pub fn accept(
        owner: impl Into<String>,
        input: GenerationInput,
        credential: Option<Credential>,
        config: &PipelineConfig,
    ) -> Result<Self, ValidationError> {
        let user_input = input.user_input.trim().to_string();
        if user_input.is_empty() {
            return Err(ValidationError::EmptyPrompt);
        }

        let music_volume = input
            .music_volume
            .map_or(config.default_music_volume, clamp_music_volume);
        let duration_minutes = input
            .duration_minutes
            .map_or(config.default_duration_minutes, clamp_duration_minutes);

        Ok(Self {
            owner: owner.into(),
            user_input,
            music_volume,
            duration_minutes,
            credential,
        })
    }

    /// Identity of the caller the finished record belongs to.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// The user's prompt, trimmed.
    pub fn user_input(&self) -> &str {
        &self.user_input
    }

    /// Linear gain applied to the music bed.
    pub const fn music_volume(&self) -> f64 {
        self.music_volume
    }

    /// Requested session length in minutes.
    pub const fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    /// Requested session length in seconds.
    pub fn target_total_seconds(&self) -> f64 {
        f64::from(self.duration_minutes) * 60.0
    }

    /// Per-caller credential, if one was resolved upstream.
    pub const fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }
}

/// Clamp a music volume to `[0, 1]`. Non-finite values become silence.
pub fn clamp_music_volume(volume: f64) -> f64 {
    if volume.is_finite() {
        volume.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Round and clamp a duration to `[MIN_DURATION_MINUTES, MAX_DURATION_MINUTES]`.
pub fn clamp_duration_minutes(minutes: f64) -> u32 {
    if !minutes.is_finite() {
        return MIN_DURATION_MINUTES;
    }
    let rounded = minutes.round().clamp(
        f64::from(MIN_DURATION_MINUTES),
        f64::from(MAX_DURATION_MINUTES),
    );
    rounded as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(text: &str) -> GenerationInput {
        GenerationInput {
            user_input: text.to_string(),
            music_volume: None,
            duration_minutes: None,
        }
    }

    #[test]
    fn test_music_volume_is_clamped() {
        assert_eq!(clamp_music_volume(-1.0), 0.0);
        assert_eq!(clamp_music_volume(0.5), 0.5);
        assert_eq!(clamp_music_volume(2.0), 1.0);
        assert_eq!(clamp_music_volume(f64::NAN), 0.0);
    }

    #[test]
    fn test_duration_is_rounded_and_clamped() {
        assert_eq!(clamp_duration_minutes(0.0), 1);
        assert_eq!(clamp_duration_minutes(2.4), 2);
        assert_eq!(clamp_duration_minutes(4.6), 5);
        assert_eq!(clamp_duration_minutes(45.0), 10);
        assert_eq!(clamp_duration_minutes(f64::INFINITY), 1);
    }

    #[test]
    fn test_accept_applies_config_defaults() {
        let config = PipelineConfig::new("/tmp/audio", "/tmp/music.mp3");
        let request = GenerationRequest::accept("user-1", input("  tired  "), None, &config)
            .expect("valid input");

        assert_eq!(request.owner(), "user-1");
        assert_eq!(request.user_input(), "tired");
        assert!((request.music_volume() - config.default_music_volume).abs() < f64::EPSILON);
        assert_eq!(request.duration_minutes(), config.default_duration_minutes);
        assert!(request.credential().is_none());
    }

    #[test]
    fn test_accept_clamps_explicit_values() {
        let config = PipelineConfig::new("/tmp/audio", "/tmp/music.mp3");
        let raw = GenerationInput {
            user_input: "anxious".to_string(),
            music_volume: Some(2.0),
            duration_minutes: Some(-3.0),
        };
        let request = GenerationRequest::accept("u", raw, None, &config).unwrap();

        assert!((request.music_volume() - 1.0).abs() < f64::EPSILON);
        assert_eq!(request.duration_minutes(), 1);
        assert!((request.target_total_seconds() - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_accept_rejects_blank_prompt() {
        let config = PipelineConfig::new("/tmp/audio", "/tmp/music.mp3");
        let err = GenerationRequest::accept("u", input("   "), None, &config).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyPrompt));
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let credential = Credential::new("sk-secret");
        assert_eq!(format!("{credential:?}"), "Credential(***)");
        assert_eq!(credential.expose(), "sk-secret");
    }

    #[test]
    fn test_input_deserializes_camel_case() {
        let raw: GenerationInput = serde_json::from_str(
            r#"{"userInput":"calm","musicVolume":0.3,"durationMinutes":2}"#,
        )
        .unwrap();
        assert_eq!(raw.user_input, "calm");
        assert_eq!(raw.music_volume, Some(0.3));
        assert_eq!(raw.duration_minutes, Some(2.0));
    }
}
