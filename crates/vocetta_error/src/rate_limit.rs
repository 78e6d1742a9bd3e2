//! Rate limiting error types.

/// Emitted when a fixed-window counter denies a request.
///
/// # Examples
///
/// ```
/// use vocetta_error::RateLimitError;
///
/// let err = RateLimitError::new(42);
/// assert_eq!(err.retry_after_secs, 42);
/// assert!(err.public_message().contains("42 seconds"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display(
    "Rate Limit Error: window resets in {}s at line {} in {}",
    retry_after_secs,
    line,
    file
)]
pub struct RateLimitError {
    /// Whole seconds until the current window expires, rounded up
    pub retry_after_secs: u64,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl RateLimitError {
    /// Create a new RateLimitError at the current location.
    #[track_caller]
    pub fn new(retry_after_secs: u64) -> Self {
        let location = std::panic::Location::caller();
        Self {
            retry_after_secs,
            line: location.line(),
            file: location.file(),
        }
    }

    /// User-facing message for the wire envelope.
    pub fn public_message(&self) -> String {
        format!(
            "Too many requests. Please try again in {} seconds.",
            self.retry_after_secs
        )
    }
}
