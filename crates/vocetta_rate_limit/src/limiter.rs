//! Fixed-window limiter implementation.

use crate::RateLimitConfig;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use tracing::debug;
use vocetta_core::{Clock, SystemClock};
use vocetta_error::RateLimitError;

/// One identity's counting window.
#[derive(Debug, Clone, Copy)]
struct RateWindow {
    count: u32,
    reset_at: DateTime<Utc>,
}

/// Fixed-window request counter keyed by identity.
///
/// Windows live in a concurrent map, so checks for different identities
/// do not contend while updates to a single identity stay atomic. Time is
/// read through the injected [`Clock`], which keeps expiry deterministic
/// under test.
///
/// # Examples
///
/// ```
/// use vocetta_rate_limit::{RateLimitConfig, RateLimiter};
///
/// let limiter = RateLimiter::new(RateLimitConfig::new(2, 60));
/// assert!(limiter.check("10.0.0.1").is_ok());
/// assert!(limiter.check("10.0.0.1").is_ok());
///
/// let denied = limiter.check("10.0.0.1").unwrap_err();
/// assert!(denied.retry_after_secs <= 60);
///
/// // Other identities are unaffected
/// assert!(limiter.check("10.0.0.2").is_ok());
/// ```
#[derive(Debug)]
pub struct RateLimiter {
    windows: DashMap<String, RateWindow>,
    config: RateLimitConfig,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    /// Create a limiter that reads the system clock.
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock::new()))
    }

    /// Create a limiter with an injected clock.
    pub fn with_clock(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            windows: DashMap::new(),
            config,
            clock,
        }
    }

    /// The limits this instance enforces.
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Admit or deny one request for `identity`.
    ///
    /// A fresh or lapsed window restarts at count 1. A live window at the
    /// maximum denies with the whole seconds remaining until reset,
    /// rounded up from millisecond precision.
    ///
    /// # Errors
    ///
    /// Returns [`RateLimitError`] when the identity's live window is full.
    pub fn check(&self, identity: &str) -> Result<(), RateLimitError> {
        let now = self.clock.now();

        match self.windows.entry(identity.to_string()) {
            Entry::Occupied(mut occupied) => {
                let window = occupied.get_mut();

                if now > window.reset_at {
                    *window = RateWindow {
                        count: 1,
                        reset_at: now + self.config.window(),
                    };
                    return Ok(());
                }

                if window.count >= *self.config.max_requests() {
                    let millis = (window.reset_at - now).num_milliseconds().max(0) as u64;
                    let retry_after = millis.div_ceil(1000);
                    debug!(
                        identity = %identity,
                        retry_after_secs = retry_after,
                        "rate limit window full"
                    );
                    return Err(RateLimitError::new(retry_after));
                }

                window.count += 1;
                Ok(())
            }
            Entry::Vacant(vacant) => {
                vacant.insert(RateWindow {
                    count: 1,
                    reset_at: now + self.config.window(),
                });
                Ok(())
            }
        }
    }

    /// Requests left in the identity's current window.
    ///
    /// Read-only: unknown or lapsed identities report the full allowance
    /// without creating a window.
    pub fn remaining(&self, identity: &str) -> u32 {
        let now = self.clock.now();

        match self.windows.get(identity) {
            Some(window) if now <= window.reset_at => {
                self.config.max_requests().saturating_sub(window.count)
            }
            _ => *self.config.max_requests(),
        }
    }

    /// Drop the identity's window, restoring its full allowance.
    pub fn reset(&self, identity: &str) {
        self.windows.remove(identity);
    }

    /// Remove every lapsed window, returning how many were dropped.
    ///
    /// Safe to run concurrently with checks: only entries already past
    /// their reset time are touched, and a removed identity is simply
    /// re-admitted on its next request.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let before = self.windows.len();
        self.windows.retain(|_, window| now <= window.reset_at);
        before.saturating_sub(self.windows.len())
    }

    /// Number of identities currently tracked.
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// True when no identities are tracked.
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}
