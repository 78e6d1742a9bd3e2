//! Speech API client with retry and streaming support.

use crate::SynthesisConfig;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde::Serialize;
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use vocetta_core::{AudioFormat, ValidatedRequest, Voice};
use vocetta_error::{RetryableError, SynthesisError, SynthesisErrorKind};

/// Audio bytes as they arrive from the provider.
pub type AudioStream = Pin<Box<dyn Stream<Item = Result<Bytes, SynthesisError>> + Send>>;

/// Wire payload for the provider's speech endpoint.
#[derive(Debug, Clone, Serialize)]
struct SpeechPayload {
    model: String,
    input: String,
    voice: Voice,
    response_format: AudioFormat,
    speed: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    instructions: Option<String>,
}

/// Synthesized speech ready to forward to the caller.
pub struct SpeechAudio {
    /// Audio byte stream, unbuffered
    pub stream: AudioStream,
    /// MIME type matching the requested format
    pub content_type: &'static str,
    /// Suggested download filename
    pub filename: String,
}

impl std::fmt::Debug for SpeechAudio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechAudio")
            .field("content_type", &self.content_type)
            .field("filename", &self.filename)
            .finish_non_exhaustive()
    }
}

/// Client for an OpenAI-style speech endpoint.
///
/// Holds no per-request state and clones cheaply. A missing API key is
/// not a construction error: the gateway starts without one and reports
/// the service unconfigured when synthesis is first attempted.
#[derive(Debug, Clone)]
pub struct SynthesisClient {
    client: reqwest::Client,
    config: SynthesisConfig,
    api_key: Option<String>,
}

impl SynthesisClient {
    /// Create a client, reading `OPENAI_API_KEY` from the environment.
    pub fn new(config: SynthesisConfig) -> Self {
        let api_key = std::env::var("OPENAI_API_KEY").ok();
        Self::with_api_key(config, api_key)
    }

    /// Create a client with an explicit key, bypassing the environment.
    pub fn with_api_key(config: SynthesisConfig, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            api_key,
        }
    }

    /// Whether a provider key is available.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Endpoint and retry configuration in use.
    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    /// Synthesize speech for a validated request.
    ///
    /// Provider 5xx responses, transport failures, and empty success
    /// bodies are retried with a linearly growing delay between attempts.
    /// Provider 4xx responses fail immediately and keep the provider's
    /// status and message.
    ///
    /// # Errors
    ///
    /// Returns [`SynthesisError`] when no API key is configured, when the
    /// provider rejects the request outright, or when every attempt of a
    /// transient failure has been exhausted.
    #[instrument(skip_all, fields(voice = %request.voice(), characters = request.character_count()))]
    pub async fn generate(&self, request: &ValidatedRequest) -> Result<SpeechAudio, SynthesisError> {
        use tokio_retry2::{Retry, RetryError};

        let payload = SpeechPayload {
            model: self.config.model().clone(),
            input: request.input().clone(),
            voice: *request.voice(),
            response_format: *request.format(),
            speed: *request.speed(),
            instructions: request.instructions().clone(),
        };

        let base_delay = *self.config.base_delay_ms();
        let retry_strategy = (1..=u64::from(*self.config.max_retries()))
            .map(|attempt| Duration::from_millis(base_delay * attempt));

        let mut attempt = 0u32;
        let response = Retry::spawn(retry_strategy, || {
            attempt += 1;
            let attempt = attempt;
            let payload = &payload;
            async move {
                match self.send_once(payload).await {
                    Ok(response) => Ok(response),
                    Err(e) => {
                        if e.is_retryable() {
                            warn!(attempt, error = %e, "transient speech API error, will retry");
                            Err(RetryError::Transient {
                                err: e,
                                retry_after: None,
                            })
                        } else {
                            warn!(attempt, error = %e, "permanent speech API error, failing immediately");
                            Err(RetryError::Permanent(e))
                        }
                    }
                }
            }
        })
        .await?;

        Ok(Self::stream_audio(response, request))
    }

    /// Probe the provider with a minimal request.
    ///
    /// A single attempt with no retries, so the health endpoint answers
    /// quickly even when the provider is struggling.
    ///
    /// # Errors
    ///
    /// Returns [`SynthesisError`] when the key is missing or the probe
    /// fails for any reason.
    pub async fn health_check(&self) -> Result<(), SynthesisError> {
        let payload = SpeechPayload {
            model: self.config.model().clone(),
            input: "test".to_string(),
            voice: Voice::Alloy,
            response_format: AudioFormat::Mp3,
            speed: 1.0,
            instructions: None,
        };

        self.send_once(&payload).await.map(|_response| ())
    }

    /// One POST to the provider, classified but not retried.
    async fn send_once(&self, payload: &SpeechPayload) -> Result<reqwest::Response, SynthesisError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| SynthesisError::new(SynthesisErrorKind::MissingApiKey))?;

        debug!(url = %self.config.api_url(), model = %self.config.model(), "sending speech request");

        let response = self
            .client
            .post(self.config.api_url())
            .header("Authorization", format!("Bearer {}", api_key))
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                SynthesisError::new(SynthesisErrorKind::Transport(format!("Request failed: {}", e)))
            })?;

        if !response.status().is_success() {
            let status_code = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(SynthesisError::new(SynthesisErrorKind::Upstream {
                status_code,
                message,
            }));
        }

        // A 2xx with a declared empty body means the provider produced no
        // audio; treat it like a transient fault.
        if response.content_length() == Some(0) {
            return Err(SynthesisError::new(SynthesisErrorKind::EmptyAudio));
        }

        Ok(response)
    }

    fn stream_audio(response: reqwest::Response, request: &ValidatedRequest) -> SpeechAudio {
        let format = *request.format();
        let stream = response
            .bytes_stream()
            .map(|chunk| {
                chunk.map_err(|e| {
                    SynthesisError::new(SynthesisErrorKind::Transport(format!(
                        "Stream error: {}",
                        e
                    )))
                })
            })
            .boxed();

        SpeechAudio {
            stream,
            content_type: format.mime_type(),
            filename: filename_for(*request.voice(), format),
        }
    }
}

/// Download filename in the form `tts-{voice}-{epoch_millis}.{ext}`.
fn filename_for(voice: Voice, format: AudioFormat) -> String {
    let timestamp = chrono::Utc::now().timestamp_millis();
    format!("tts-{}-{}.{}", voice.as_str(), timestamp, format.extension())
}
