//! Rate limiter configuration.

use serde::{Deserialize, Serialize};

/// Limits for one fixed-window limiter instance.
///
/// # Examples
///
/// ```
/// use vocetta_rate_limit::RateLimitConfig;
///
/// let config = RateLimitConfig::per_ip();
/// assert_eq!(*config.max_requests(), 10);
/// assert_eq!(*config.window_secs(), 60);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(deny_unknown_fields)]
pub struct RateLimitConfig {
    /// Requests allowed per window
    max_requests: u32,
    /// Window length in seconds
    window_secs: u64,
}

impl RateLimitConfig {
    /// Create a config with explicit limits.
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
        }
    }

    /// Conventional limits for the per-address limiter class: 10 requests
    /// per minute.
    pub fn per_ip() -> Self {
        Self::new(10, 60)
    }

    /// Conventional limits for the per-user limiter class: 50 requests
    /// per minute.
    pub fn per_user() -> Self {
        Self::new(50, 60)
    }

    /// Window length as a duration.
    pub fn window(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.window_secs as i64)
    }
}
