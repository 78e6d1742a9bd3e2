//! HTTP surface for the Vocetta speech gateway.
//!
//! Wires the admission components (rate limiters, quota tracker) and the
//! upstream synthesis client into an axum router. Three endpoints:
//!
//! - `GET`/`POST /api/generate` runs the full pipeline and streams audio
//! - `GET /api/health` probes the upstream provider
//! - `GET /api/usage` reports the caller's quota standing
//!
//! Callers are identified two ways: by client address (taken from proxy
//! headers) and by an anonymous cookie minted on first contact. Every
//! pipeline failure is answered with a JSON envelope carrying a stable
//! machine code alongside the human-readable message.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod config;
mod identity;
mod response;
mod state;

pub use api::create_router;
pub use config::{QuotaSection, RateLimitSection, VocettaConfig};
pub use response::{ErrorBody, ErrorEnvelope};
pub use state::AppState;
