//! Upstream synthesis error types and retry classification.

/// Upstream speech API error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum SynthesisErrorKind {
    /// API key not found in the environment
    #[display("OPENAI_API_KEY environment variable not set")]
    MissingApiKey,
    /// Upstream returned a non-success status
    #[display("Speech API returned HTTP {}: {}", status_code, message)]
    Upstream {
        /// HTTP status code from the provider
        status_code: u16,
        /// Error body text from the provider
        message: String,
    },
    /// Request failed before a response arrived
    #[display("Speech API request failed: {}", _0)]
    Transport(String),
    /// Successful status but no audio bytes in the body
    #[display("Speech API returned an empty audio body")]
    EmptyAudio,
}

impl SynthesisErrorKind {
    /// Check if this error condition should be retried.
    ///
    /// Server-side faults, transport failures, and empty successful bodies
    /// are transient; client-side provider statuses and missing credentials
    /// are permanent.
    pub fn is_retryable(&self) -> bool {
        match self {
            SynthesisErrorKind::Upstream { status_code, .. } => *status_code >= 500,
            SynthesisErrorKind::Transport(_) => true,
            SynthesisErrorKind::EmptyAudio => true,
            SynthesisErrorKind::MissingApiKey => false,
        }
    }
}

/// Synthesis error with source location tracking.
///
/// # Examples
///
/// ```
/// use vocetta_error::{RetryableError, SynthesisError, SynthesisErrorKind};
///
/// let err = SynthesisError::new(SynthesisErrorKind::Upstream {
///     status_code: 503,
///     message: "Service unavailable".to_string(),
/// });
///
/// assert!(err.is_retryable());
/// assert_eq!(err.http_status(), 500);
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Synthesis Error: {} at line {} in {}", kind, line, file)]
pub struct SynthesisError {
    /// The kind of error that occurred
    pub kind: SynthesisErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl SynthesisError {
    /// Create a new SynthesisError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SynthesisErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// HTTP status to surface for this failure.
    ///
    /// Terminal provider statuses pass through unchanged; a missing key
    /// reports the service unavailable; everything the retry loop gave up
    /// on collapses to a generic 500.
    pub fn http_status(&self) -> u16 {
        match &self.kind {
            SynthesisErrorKind::Upstream { status_code, .. } if *status_code < 500 => *status_code,
            SynthesisErrorKind::MissingApiKey => 503,
            _ => 500,
        }
    }

    /// User-facing message for the wire envelope.
    ///
    /// A retryable kind only surfaces once retries are exhausted, so those
    /// collapse to a generic failure; terminal kinds keep the provider text.
    pub fn public_message(&self) -> String {
        match &self.kind {
            SynthesisErrorKind::Upstream {
                status_code,
                message,
            } if *status_code < 500 => {
                format!("Speech API error: {}", message)
            }
            SynthesisErrorKind::MissingApiKey => "Speech service is not configured".to_string(),
            _ => "Failed to generate speech after multiple attempts".to_string(),
        }
    }
}

/// Trait for errors that support retry logic.
///
/// Transient conditions like a 503 from the provider or a dropped
/// connection should return true; permanent conditions like a 400
/// (bad request) or 401 (unauthorized) should return false. The retry
/// schedule itself lives with the component configuration, not the error.
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool;
}

impl RetryableError for SynthesisError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
