//! Session timing policy.
//!
//! Maps a requested session length to the word and silence budgets the
//! script should hit, plus a structural outline that shapes the prompt sent
//! to the script collaborator. Everything here is pure.

use std::fmt::Write as _;

use serde::Serialize;

use crate::domain::{MAX_DURATION_MINUTES, MIN_DURATION_MINUTES};

/// Share of the total session that must be silence.
const SILENCE_SHARE: f64 = 0.5;

/// Width of the suggested per-block range around its share.
const BLOCK_TOLERANCE: f64 = 0.2;

/// Whether an outline block is spoken or silent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Speech,
    Pause,
}

/// One suggested block in the session outline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlineBlock {
    pub kind: BlockKind,
    pub purpose: &'static str,
    pub min_seconds: f64,
    pub max_seconds: f64,
}

/// Budgets and outline derived from a session length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingPlan {
    pub duration_minutes: u32,
    pub words_per_minute: u32,
    pub target_word_count: u32,
    pub total_seconds: f64,
    pub silence_seconds: f64,
    pub outline: Vec<OutlineBlock>,
}

/// Instructions for the script collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptPrompt {
    /// System instruction: JSON shape, budgets, outline.
    pub system: String,
    /// The user's own words.
    pub user: String,
}

/// Speaking rate for a session length. Short sessions favour concision.
pub const fn words_per_minute(duration_minutes: u32) -> u32 {
    match duration_minutes {
        0..=2 => 100,
        3..=4 => 125,
        _ => 150,
    }
}

fn outline_shape(duration_minutes: u32) -> &'static [(BlockKind, &'static str)] {
    use BlockKind::{Pause, Speech};

    match duration_minutes {
        0..=2 => &[
            (Speech, "welcome and initial guidance"),
            (Pause, "settle into the breath"),
            (Speech, "closing guidance and positive reinforcement"),
        ],
        3..=4 => &[
            (Speech, "welcome and initial guidance"),
            (Pause, "settle into the breath"),
            (Speech, "deeper meditation instruction"),
            (Pause, "rest in stillness"),
            (Speech, "closing guidance and positive reinforcement"),
        ],
        _ => &[
            (Speech, "welcome and initial guidance"),
            (Pause, "settle into the breath"),
            (Speech, "breath focus"),
            (Pause, "follow the breath"),
            (Speech, "body scan"),
            (Pause, "rest in stillness"),
            (Speech, "closing guidance and positive reinforcement"),
        ],
    }
}

/// Build the timing plan for a session of `duration_minutes`.
///
/// Out-of-range input is clamped to the supported range.
pub fn plan_session(duration_minutes: u32) -> TimingPlan {
    let duration_minutes = duration_minutes.clamp(MIN_DURATION_MINUTES, MAX_DURATION_MINUTES);
    let words_per_minute = words_per_minute(duration_minutes);
    let total_seconds = f64::from(duration_minutes) * 60.0;
    let silence_seconds = total_seconds * SILENCE_SHARE;
    let speech_seconds = total_seconds - silence_seconds;

    let shape = outline_shape(duration_minutes);
    let pauses = shape.iter().filter(|(k, _)| *k == BlockKind::Pause).count();
    let speeches = shape.len() - pauses;

    let outline = shape
        .iter()
        .map(|&(kind, purpose)| {
            let share = match kind {
                BlockKind::Pause => silence_seconds / pauses as f64,
                BlockKind::Speech => speech_seconds / speeches as f64,
            };
            OutlineBlock {
                kind,
                purpose,
                min_seconds: (share * (1.0 - BLOCK_TOLERANCE)).round(),
                max_seconds: (share * (1.0 + BLOCK_TOLERANCE)).round(),
            }
        })
        .collect();

    TimingPlan {
        duration_minutes,
        words_per_minute,
        target_word_count: words_per_minute * duration_minutes,
        total_seconds,
        silence_seconds,
        outline,
    }
}

impl TimingPlan {
    /// Render the script collaborator instructions for `user_input`.
    pub fn prompt(&self, user_input: &str) -> ScriptPrompt {
        let mut system = String::from(
            "You are a meditation guide. Generate a structured meditation script based on \
             the user's current emotional state or needs.\n\
             The script must be a JSON object with this structure:\n\
             {\"title\": string, \"targetWordCount\": number, \"actualWordCount\": number, \
             \"durationMinutes\": number, \"segments\": [\
             {\"type\": \"speech\", \"content\": string, \"wordCount\": number, \"duration\": number}, \
             {\"type\": \"pause\", \"duration\": number}]}\n\
             Rules:\n",
        );

        let _ = writeln!(
            system,
            "- Generate a {}-minute meditation ({} total words, about {} words per minute of speech)",
            self.duration_minutes, self.target_word_count, self.words_per_minute
        );
        let _ = writeln!(
            system,
            "- EXACTLY 50% of the time ({} seconds) must be silence, distributed across pause segments",
            self.silence_seconds
        );
        system.push_str(
            "- Before each pause, end the speech segment with \"Now, let's take a [X] second pause to [purpose]\"\n\
             - Structure the segments in this pattern:\n",
        );
        for (position, block) in self.outline.iter().enumerate() {
            let label = match block.kind {
                BlockKind::Speech => "speech",
                BlockKind::Pause => "pause",
            };
            let _ = writeln!(
                system,
                "  {}. {label}: {} ({}-{} seconds)",
                position + 1,
                block.purpose,
                block.min_seconds,
                block.max_seconds
            );
        }
        system.push_str(
            "- The final segment must be speech, never a pause\n\
             - Speech segments should be calming and focused on breathing and mindfulness\n\
             - Address their specific situation in the content\n\
             - End with a gentle positive reinforcement that makes the user feel accomplished\n\
             - Return ONLY valid JSON, no other text",
        );

        ScriptPrompt {
            system,
            user: user_input.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_is_exactly_half_for_every_duration() {
        for minutes in MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES {
            let plan = plan_session(minutes);
            assert_eq!(plan.silence_seconds, f64::from(minutes) * 60.0 / 2.0);
            assert_eq!(plan.total_seconds, f64::from(minutes) * 60.0);
        }
    }

    #[test]
    fn test_word_rate_brackets() {
        assert_eq!(plan_session(1).words_per_minute, 100);
        assert_eq!(plan_session(2).words_per_minute, 100);
        assert_eq!(plan_session(3).words_per_minute, 125);
        assert_eq!(plan_session(5).words_per_minute, 150);
        assert_eq!(plan_session(10).target_word_count, 1500);
        assert_eq!(plan_session(2).target_word_count, 200);
    }

    #[test]
    fn test_outline_sizes_and_ending() {
        assert_eq!(plan_session(2).outline.len(), 3);
        assert_eq!(plan_session(4).outline.len(), 5);
        assert_eq!(plan_session(8).outline.len(), 7);

        for minutes in MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES {
            let plan = plan_session(minutes);
            assert_eq!(plan.outline.last().map(|b| b.kind), Some(BlockKind::Speech));
        }
    }

    #[test]
    fn test_short_outline_ranges() {
        let plan = plan_session(2);
        let pause = &plan.outline[1];
        assert_eq!(pause.kind, BlockKind::Pause);
        assert_eq!((pause.min_seconds, pause.max_seconds), (48.0, 72.0));

        let welcome = &plan.outline[0];
        assert_eq!((welcome.min_seconds, welcome.max_seconds), (24.0, 36.0));
    }

    #[test]
    fn test_out_of_range_duration_is_clamped() {
        assert_eq!(plan_session(0).duration_minutes, 1);
        assert_eq!(plan_session(99).duration_minutes, 10);
    }

    #[test]
    fn test_prompt_mentions_budgets() {
        let prompt = plan_session(2).prompt("I'm anxious before a talk");
        assert_eq!(prompt.user, "I'm anxious before a talk");
        assert!(prompt.system.contains("2-minute meditation (200 total words"));
        assert!(prompt.system.contains("(60 seconds) must be silence"));
        assert!(prompt.system.contains("pause: settle into the breath (48-72 seconds)"));
        assert!(prompt.system.contains("Return ONLY valid JSON"));
    }
}
