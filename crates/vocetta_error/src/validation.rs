//! Input validation error types.

/// Reasons a synthesis request is rejected before any side effect occurs.
///
/// The display text is the user-facing message; [`ValidationErrorKind::code`]
/// provides the machine code for the wire envelope.
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum ValidationErrorKind {
    /// Trimmed input shorter than the minimum
    #[display("Text must be at least {} characters long", min)]
    TextTooShort {
        /// Minimum accepted trimmed length
        min: usize,
    },
    /// Trimmed input longer than the maximum
    #[display("Text must not exceed {} characters", max)]
    TextTooLong {
        /// Maximum accepted trimmed length
        max: usize,
    },
    /// Voice identifier outside the supported set
    #[display("Please select a valid voice")]
    InvalidVoice(String),
    /// Playback speed unparseable or outside the accepted range
    #[display("Speed must be between 0.25 and 4.0")]
    InvalidSpeed(String),
    /// Audio format identifier outside the supported set
    #[display("Invalid audio format selected")]
    InvalidFormat(String),
    /// Instructions text longer than the maximum
    #[display("Instructions must not exceed {} characters", max)]
    InstructionsTooLong {
        /// Maximum accepted trimmed length
        max: usize,
    },
    /// Input tripped the repeated-content heuristics
    #[display("Text contains spam patterns")]
    RepeatedContent,
}

impl ValidationErrorKind {
    /// Stable machine code for the wire envelope.
    ///
    /// Length, voice, speed, and format violations carry rule-specific codes;
    /// the remaining rules share the generic validation code.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationErrorKind::TextTooShort { .. } => "TEXT_TOO_SHORT",
            ValidationErrorKind::TextTooLong { .. } => "TEXT_TOO_LONG",
            ValidationErrorKind::InvalidVoice(_) => "INVALID_VOICE",
            ValidationErrorKind::InvalidSpeed(_) => "INVALID_SPEED",
            ValidationErrorKind::InvalidFormat(_) => "INVALID_FORMAT",
            ValidationErrorKind::InstructionsTooLong { .. } => "VALIDATION_ERROR",
            ValidationErrorKind::RepeatedContent => "VALIDATION_ERROR",
        }
    }
}

/// Validation error with source location tracking.
///
/// # Examples
///
/// ```
/// use vocetta_error::{ValidationError, ValidationErrorKind};
///
/// let err = ValidationError::new(ValidationErrorKind::TextTooShort { min: 10 });
/// assert!(format!("{}", err).contains("at least 10 characters"));
/// assert_eq!(err.kind.code(), "TEXT_TOO_SHORT");
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} at line {} in {}", kind, line, file)]
pub struct ValidationError {
    /// The kind of error that occurred
    pub kind: ValidationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new validation error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ValidationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
