//! Upstream endpoint and retry configuration.

use serde::{Deserialize, Serialize};

/// Where and how to reach the speech provider.
///
/// # Examples
///
/// ```
/// use vocetta_synthesis::SynthesisConfig;
///
/// let config = SynthesisConfig::default();
/// assert_eq!(config.model(), "gpt-4o-mini-tts");
/// assert_eq!(*config.max_retries(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(deny_unknown_fields, default)]
pub struct SynthesisConfig {
    /// Endpoint receiving speech requests
    api_url: String,
    /// Provider model identifier sent with every request
    model: String,
    /// Further attempts after the first failure
    max_retries: u32,
    /// Delay before the first retry; attempt N waits N times this
    base_delay_ms: u64,
}

impl SynthesisConfig {
    /// Create a config with explicit values.
    pub fn new(api_url: &str, model: &str, max_retries: u32, base_delay_ms: u64) -> Self {
        Self {
            api_url: api_url.to_string(),
            model: model.to_string(),
            max_retries,
            base_delay_ms,
        }
    }
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1/audio/speech".to_string(),
            model: "gpt-4o-mini-tts".to_string(),
            max_retries: 2,
            base_delay_ms: 1_000,
        }
    }
}
