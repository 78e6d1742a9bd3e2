//! Monthly character quota accounting keyed by caller identity.
//!
//! Ledgers are created lazily at the [`PlanTier::Free`] tier and roll over
//! on the first day of the next calendar month (UTC). Admission is split
//! into a pure [`QuotaTracker::check`] before synthesis and a
//! [`QuotaTracker::consume`] afterwards, so failed synthesis never bills
//! the caller. The whole component can be switched off, in which case both
//! operations succeed without tracking anything.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod sweeper;
mod tier;
mod tracker;

pub use sweeper::Sweeper;
pub use tier::PlanTier;
pub use tracker::{QuotaTracker, UsageSnapshot};
