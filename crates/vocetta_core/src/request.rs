//! Raw and validated request types.

use crate::{AudioFormat, Language, Voice};
use serde::Deserialize;

/// Raw synthesis parameters as they arrive on the wire.
///
/// Every field is optional text; nothing is trusted until
/// [`validate`](crate::validate) has run. The `prompt` wire name maps to
/// [`instructions`](SpeechParams::instructions).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpeechParams {
    /// Text to synthesize
    pub input: Option<String>,
    /// Requested voice identifier
    pub voice: Option<String>,
    /// Requested playback speed
    pub speed: Option<String>,
    /// Requested audio format identifier
    pub format: Option<String>,
    /// Free-form delivery instructions
    #[serde(rename = "prompt")]
    pub instructions: Option<String>,
}

/// Synthesis request that has passed every validation rule.
///
/// Produced exclusively by [`validate`](crate::validate); the fields the
/// gateway derives (character count, detected language) travel with the
/// request so later stages never recompute them.
#[derive(Debug, Clone, PartialEq, derive_getters::Getters)]
pub struct ValidatedRequest {
    /// Trimmed input text
    input: String,
    /// Accepted voice
    voice: Voice,
    /// Accepted playback speed
    speed: f64,
    /// Accepted audio format
    format: AudioFormat,
    /// Trimmed non-empty instructions, if any were supplied
    instructions: Option<String>,
    /// Count of non-whitespace characters, used for quota accounting
    character_count: u64,
    /// Detected language of the input
    language: Language,
}

impl ValidatedRequest {
    pub(crate) fn new(
        input: String,
        voice: Voice,
        speed: f64,
        format: AudioFormat,
        instructions: Option<String>,
        character_count: u64,
        language: Language,
    ) -> Self {
        Self {
            input,
            voice,
            speed,
            format,
            instructions,
            character_count,
            language,
        }
    }
}
