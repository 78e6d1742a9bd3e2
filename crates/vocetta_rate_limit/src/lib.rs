//! Fixed-window rate limiting keyed by caller identity.
//!
//! Each identity (client address or anonymous user token) gets an
//! independent counting window. The first request in a window, or any
//! request after the window has lapsed, starts a fresh count; requests
//! beyond the configured maximum are denied with the number of seconds
//! until the window resets. Expired windows are reclaimed by a periodic
//! [`Sweeper`] task.
//!
//! Two limiter classes are conventional: a strict per-address limiter in
//! front of everything, and a looser per-user limiter behind it. See
//! [`RateLimitConfig::per_ip`] and [`RateLimitConfig::per_user`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod limiter;
mod sweeper;

pub use config::RateLimitConfig;
pub use limiter::RateLimiter;
pub use sweeper::Sweeper;
