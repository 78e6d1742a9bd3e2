//! Shared gateway components.

use crate::VocettaConfig;
use std::sync::Arc;
use vocetta_quota::QuotaTracker;
use vocetta_rate_limit::RateLimiter;
use vocetta_synthesis::SynthesisClient;

/// Handles to every stateful component, cloned into each handler.
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct AppState {
    /// Admission limiter keyed by client address
    ip_limiter: Arc<RateLimiter>,
    /// Admission limiter keyed by user identity
    user_limiter: Arc<RateLimiter>,
    /// Monthly character ledger
    quota: Arc<QuotaTracker>,
    /// Upstream speech client
    synthesis: Arc<SynthesisClient>,
}

impl AppState {
    /// Assemble state from existing components.
    pub fn new(
        ip_limiter: Arc<RateLimiter>,
        user_limiter: Arc<RateLimiter>,
        quota: Arc<QuotaTracker>,
        synthesis: Arc<SynthesisClient>,
    ) -> Self {
        Self {
            ip_limiter,
            user_limiter,
            quota,
            synthesis,
        }
    }

    /// Build every component from configuration.
    pub fn from_config(config: &VocettaConfig) -> Self {
        Self::new(
            Arc::new(RateLimiter::new(*config.rate_limit().ip())),
            Arc::new(RateLimiter::new(*config.rate_limit().user())),
            Arc::new(QuotaTracker::new(*config.quota().enabled())),
            Arc::new(SynthesisClient::new(config.synthesis().clone())),
        )
    }
}
