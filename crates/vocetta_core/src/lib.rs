//! Core data types and validation for the Vocetta speech gateway.
//!
//! This crate provides the wire vocabulary (voices, audio formats, detected
//! languages), the request validator that turns raw parameters into a
//! [`ValidatedRequest`], the clock abstraction used by the time-dependent
//! components, and the tracing bootstrap shared by the binaries.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod clock;
mod format;
mod language;
mod redact;
mod request;
mod telemetry;
mod validate;
mod voice;

#[cfg(any(test, feature = "test-helpers"))]
pub use clock::MockClock;
pub use clock::{Clock, SystemClock};
pub use format::AudioFormat;
pub use language::Language;
pub use redact::redact_context;
pub use request::{SpeechParams, ValidatedRequest};
pub use telemetry::{TelemetryConfig, init_telemetry};
pub use validate::{
    MAX_INSTRUCTIONS_LENGTH, MAX_SPEED, MAX_TEXT_LENGTH, MIN_SPEED, MIN_TEXT_LENGTH,
    count_characters, validate,
};
pub use voice::Voice;
