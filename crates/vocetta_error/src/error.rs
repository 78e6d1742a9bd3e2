//! Top-level error wrapper types.

use crate::{ConfigError, QuotaError, RateLimitError, SynthesisError, ValidationError};

/// Union of every failure the gateway pipeline can surface.
///
/// # Examples
///
/// ```
/// use vocetta_error::{VocettaError, RateLimitError};
///
/// let rate_err = RateLimitError::new(30);
/// let err: VocettaError = rate_err.into();
/// assert_eq!(err.kind().code(), "RATE_LIMIT_ERROR");
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum VocettaErrorKind {
    /// Request rejected by the input validator
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Request denied by a fixed-window rate limiter
    #[from(RateLimitError)]
    RateLimit(RateLimitError),
    /// Request denied by the monthly character quota
    #[from(QuotaError)]
    Quota(QuotaError),
    /// Upstream speech API failure
    #[from(SynthesisError)]
    Synthesis(SynthesisError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

impl VocettaErrorKind {
    /// Stable machine code for the wire envelope.
    pub fn code(&self) -> &'static str {
        match self {
            VocettaErrorKind::Validation(e) => e.kind.code(),
            VocettaErrorKind::RateLimit(_) => "RATE_LIMIT_ERROR",
            VocettaErrorKind::Quota(_) => "QUOTA_EXCEEDED",
            VocettaErrorKind::Synthesis(_) => "UPSTREAM_ERROR",
            VocettaErrorKind::Config(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP status the wire envelope should carry.
    pub fn http_status(&self) -> u16 {
        match self {
            VocettaErrorKind::Validation(_) => 400,
            VocettaErrorKind::RateLimit(_) => 429,
            VocettaErrorKind::Quota(_) => 403,
            VocettaErrorKind::Synthesis(e) => e.http_status(),
            VocettaErrorKind::Config(_) => 500,
        }
    }

    /// User-facing message, free of source locations and internal detail.
    pub fn public_message(&self) -> String {
        match self {
            VocettaErrorKind::Validation(e) => e.kind.to_string(),
            VocettaErrorKind::RateLimit(e) => e.public_message(),
            VocettaErrorKind::Quota(e) => e.public_message(),
            VocettaErrorKind::Synthesis(e) => e.public_message(),
            VocettaErrorKind::Config(_) => "An unexpected error occurred".to_string(),
        }
    }

    /// Seconds the caller should wait before retrying, when known.
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            VocettaErrorKind::RateLimit(e) => Some(e.retry_after_secs),
            _ => None,
        }
    }
}

/// Vocetta error with kind discrimination.
///
/// # Examples
///
/// ```
/// use vocetta_error::{VocettaResult, ConfigError};
///
/// fn might_fail() -> VocettaResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Vocetta Error: {}", _0)]
pub struct VocettaError(Box<VocettaErrorKind>);

impl VocettaError {
    /// Create a new error from a kind.
    pub fn new(kind: VocettaErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &VocettaErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to VocettaErrorKind
impl<T> From<T> for VocettaError
where
    T: Into<VocettaErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for gateway operations.
///
/// # Examples
///
/// ```
/// use vocetta_error::{VocettaResult, QuotaError};
///
/// fn admit() -> VocettaResult<()> {
///     Err(QuotaError::new(0))?
/// }
/// ```
pub type VocettaResult<T> = std::result::Result<T, VocettaError>;
