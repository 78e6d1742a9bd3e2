//! Clock abstraction for time-dependent components.
//!
//! The rate limiter and quota tracker never call `Utc::now()` directly;
//! they read time through a shared [`Clock`] so tests can drive window and
//! billing-period expiry deterministically with [`MockClock`].

use chrono::{DateTime, Utc};
#[cfg(any(test, feature = "test-helpers"))]
use chrono::Duration;
#[cfg(any(test, feature = "test-helpers"))]
use std::sync::{Arc, Mutex};

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Current time.
    fn now(&self) -> DateTime<Utc>;
}

/// System clock implementation using `Utc::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Create a new system clock.
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Controllable clock for tests.
///
/// Only compiled in test builds or behind the `test-helpers` feature.
/// Clones share the same underlying time value, so advancing one clone
/// advances them all; [`MockClock::advance`] past a rate window or a
/// billing boundary is how the expiry paths are exercised.
#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Clone)]
pub struct MockClock {
    current_time: Arc<Mutex<DateTime<Utc>>>,
}

#[cfg(any(test, feature = "test-helpers"))]
impl MockClock {
    /// Create a mock clock starting at a specific time.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current_time: Arc::new(Mutex::new(start)),
        }
    }

    /// Advance the clock by a duration.
    pub fn advance(&self, duration: Duration) {
        let mut time = self
            .current_time
            .lock()
            .expect("MockClock mutex poisoned - a test thread panicked while holding the lock");
        *time += duration;
    }

    /// Set the clock to a specific time.
    pub fn set(&self, instant: DateTime<Utc>) {
        let mut time = self
            .current_time
            .lock()
            .expect("MockClock mutex poisoned - a test thread panicked while holding the lock");
        *time = instant;
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self
            .current_time
            .lock()
            .expect("MockClock mutex poisoned - a test thread panicked while holding the lock")
    }
}
