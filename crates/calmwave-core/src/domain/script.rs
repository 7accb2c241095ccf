//! The generated meditation script.
//!
//! A script is an ordered list of [`Segment`]s. It is parsed and validated
//! once, when the script collaborator's JSON comes back; everything
//! downstream relies on the invariants checked here.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::ValidationError;

/// A spoken segment of the script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechSegment {
    /// Text handed to speech synthesis.
    pub content: String,
    /// Word count as declared by the script author.
    #[serde(default, deserialize_with = "advisory_count")]
    pub word_count: u32,
    /// Declared duration in seconds. Advisory only.
    #[serde(default)]
    pub duration: f64,
}

/// A silent segment of the script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauseSegment {
    /// Declared duration in seconds, subject to reconciliation.
    pub duration: f64,
}

/// One typed block of a script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Segment {
    Speech(SpeechSegment),
    Pause(PauseSegment),
}

impl Segment {
    /// Returns true for pause segments.
    pub const fn is_pause(&self) -> bool {
        matches!(self, Self::Pause(_))
    }

    /// Declared duration in seconds.
    pub const fn declared_duration(&self) -> f64 {
        match self {
            Self::Speech(speech) => speech.duration,
            Self::Pause(pause) => pause.duration,
        }
    }
}

/// Read an advisory count leniently.
///
/// Models write `42`, `42.0`, `"42"` or `null` interchangeably. Anything that
/// is not a non-negative finite number reads as 0.
fn advisory_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let count = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(count
        .filter(|c| c.is_finite() && *c > 0.0)
        .map_or(0, |c| c.round().min(f64::from(u32::MAX)) as u32))
}

/// A validated meditation script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    pub title: String,
    #[serde(default, deserialize_with = "advisory_count")]
    pub target_word_count: u32,
    #[serde(default, deserialize_with = "advisory_count")]
    pub actual_word_count: u32,
    #[serde(default, deserialize_with = "advisory_count")]
    pub duration_minutes: u32,
    pub segments: Vec<Segment>,
}

impl Script {
    /// Parse and validate the script collaborator's JSON output.
    pub fn from_json(raw: &str) -> Result<Self, ValidationError> {
        let script: Self = serde_json::from_str(raw.trim())
            .map_err(|e| ValidationError::MalformedScript(e.to_string()))?;
        script.validate()?;
        Ok(script)
    }

    /// Check the structural invariants of a script.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title"));
        }
        if self.segments.is_empty() {
            return Err(ValidationError::MissingField("segments"));
        }

        for (index, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Speech(speech) => {
                    if speech.content.trim().is_empty() {
                        return Err(ValidationError::InvalidSegment {
                            index,
                            reason: "speech content is empty",
                        });
                    }
                    if !speech.duration.is_finite() || speech.duration < 0.0 {
                        return Err(ValidationError::InvalidSegment {
                            index,
                            reason: "speech duration is not a valid number of seconds",
                        });
                    }
                }
                Segment::Pause(pause) => {
                    if !pause.duration.is_finite() || pause.duration < 0.0 {
                        return Err(ValidationError::InvalidSegment {
                            index,
                            reason: "pause duration is not a valid number of seconds",
                        });
                    }
                }
            }
        }

        if self.segments.last().is_some_and(Segment::is_pause) {
            return Err(ValidationError::EndsWithPause);
        }

        Ok(())
    }

    /// Number of speech segments.
    pub fn speech_count(&self) -> usize {
        self.segments.iter().filter(|s| !s.is_pause()).count()
    }

    /// Number of pause segments.
    pub fn pause_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_pause()).count()
    }

    /// Overwrite pause durations in script order.
    ///
    /// Extra durations are ignored; pauses without one keep their value.
    pub fn set_pause_durations(&mut self, durations: &[f64]) {
        let pauses = self.segments.iter_mut().filter_map(|segment| match segment {
            Segment::Pause(pause) => Some(pause),
            Segment::Speech(_) => None,
        });
        for (pause, duration) in pauses.zip(durations) {
            pause.duration = *duration;
        }
    }

    /// Declared pause durations, in script order.
    pub fn declared_pauses(&self) -> Vec<f64> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Pause(pause) => Some(pause.duration),
                Segment::Speech(_) => None,
            })
            .collect()
    }
}
