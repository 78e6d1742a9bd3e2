//! Client for the upstream speech synthesis API.
//!
//! Takes a validated request, posts it to an OpenAI-style speech endpoint,
//! and hands back the audio as a byte stream so the gateway can forward it
//! without buffering. Transient upstream failures are retried with a
//! linearly growing delay; terminal provider responses surface immediately
//! with the provider's own status and message.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod config;

pub use client::{AudioStream, SpeechAudio, SynthesisClient};
pub use config::SynthesisConfig;
