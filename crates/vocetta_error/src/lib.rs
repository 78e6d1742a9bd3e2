//! Error types for the Vocetta speech gateway.
//!
//! This crate provides the foundation error types used throughout the Vocetta
//! workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error
//! handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! Every error maps onto the wire envelope `{error: {message, code,
//! statusCode}}` through [`VocettaErrorKind::code`],
//! [`VocettaErrorKind::http_status`], and
//! [`VocettaErrorKind::public_message`], so callers can branch on stable
//! machine codes instead of matching message strings.
//!
//! # Examples
//!
//! ```
//! use vocetta_error::{VocettaResult, ConfigError};
//!
//! fn load_setting() -> VocettaResult<String> {
//!     Err(ConfigError::new("missing bind address"))?
//! }
//!
//! match load_setting() {
//!     Ok(value) => println!("Got: {}", value),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod quota;
mod rate_limit;
mod synthesis;
mod validation;

pub use config::ConfigError;
pub use error::{VocettaError, VocettaErrorKind, VocettaResult};
pub use quota::QuotaError;
pub use rate_limit::RateLimitError;
pub use synthesis::{RetryableError, SynthesisError, SynthesisErrorKind};
pub use validation::{ValidationError, ValidationErrorKind};
