//! Character quota error types.

/// Emitted when a request would exceed the caller's monthly character budget.
///
/// # Examples
///
/// ```
/// use vocetta_error::QuotaError;
///
/// let err = QuotaError::new(120);
/// assert_eq!(err.remaining, 120);
/// assert!(err.public_message().contains("120 characters remaining"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display(
    "Quota Error: {} characters remaining at line {} in {}",
    remaining,
    line,
    file
)]
pub struct QuotaError {
    /// Characters left in the current billing period
    pub remaining: u64,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl QuotaError {
    /// Create a new QuotaError at the current location.
    #[track_caller]
    pub fn new(remaining: u64) -> Self {
        let location = std::panic::Location::caller();
        Self {
            remaining,
            line: location.line(),
            file: location.file(),
        }
    }

    /// User-facing message for the wire envelope.
    pub fn public_message(&self) -> String {
        format!(
            "Monthly character limit reached. You have {} characters remaining. Upgrade to continue.",
            self.remaining
        )
    }
}
