//! Quota ledger implementation.

use crate::PlanTier;
use chrono::{DateTime, Datelike, TimeZone, Utc};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};
use vocetta_core::{Clock, SystemClock};
use vocetta_error::QuotaError;

/// One identity's usage for the current billing period.
#[derive(Debug, Clone, Copy)]
struct QuotaLedger {
    tier: PlanTier,
    characters_used: u64,
    reset_at: DateTime<Utc>,
}

impl QuotaLedger {
    fn fresh(now: DateTime<Utc>) -> Self {
        Self {
            tier: PlanTier::default(),
            characters_used: 0,
            reset_at: next_month_start(now),
        }
    }

    fn limit(&self) -> u64 {
        self.tier.characters_per_month()
    }

    fn remaining(&self) -> u64 {
        self.limit().saturating_sub(self.characters_used)
    }
}

/// Point-in-time view of one identity's quota, for usage reporting.
#[derive(Debug, Clone, PartialEq, Serialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct UsageSnapshot {
    /// Current subscription tier
    tier: PlanTier,
    /// Characters billed so far this period
    characters_used: u64,
    /// Characters included in the tier
    limit: u64,
    /// Characters left before the limit
    remaining: u64,
    /// Used fraction of the limit, 0.0 to 1.0 and beyond on overrun
    usage_ratio: f64,
    /// When the period rolls over
    reset_at: DateTime<Utc>,
    /// Whole days until the rollover, rounded up
    days_until_reset: i64,
}

/// Monthly character ledger keyed by identity.
///
/// Ledgers are created on first touch and rebuilt whenever their period
/// has lapsed, so nothing needs to run at month boundaries. Admission is
/// two-phase: [`check`](QuotaTracker::check) never mutates the ledger and
/// [`consume`](QuotaTracker::consume) bills after the fact. Concurrent
/// requests may therefore overrun the limit by at most the in-flight
/// character total, which is accepted.
///
/// # Examples
///
/// ```
/// use vocetta_quota::QuotaTracker;
///
/// let tracker = QuotaTracker::new(true);
/// tracker.check("user-1", 9_000).unwrap();
/// tracker.consume("user-1", 9_000);
///
/// let err = tracker.check("user-1", 2_000).unwrap_err();
/// assert_eq!(err.remaining, 1_000);
/// ```
#[derive(Debug)]
pub struct QuotaTracker {
    ledgers: DashMap<String, QuotaLedger>,
    enabled: bool,
    clock: Arc<dyn Clock>,
}

impl QuotaTracker {
    /// Create a tracker that reads the system clock.
    ///
    /// With `enabled` false, every operation is a successful no-op; the
    /// gateway runs with quota enforcement off by default.
    pub fn new(enabled: bool) -> Self {
        Self::with_clock(enabled, Arc::new(SystemClock::new()))
    }

    /// Create a tracker with an injected clock.
    pub fn with_clock(enabled: bool, clock: Arc<dyn Clock>) -> Self {
        Self {
            ledgers: DashMap::new(),
            enabled,
            clock,
        }
    }

    /// Whether quota enforcement is on.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Verify that `characters` more would stay within the identity's
    /// monthly budget.
    ///
    /// Pure with respect to accounting: nothing is billed here, so two
    /// checks with no consume between them see the same state.
    ///
    /// # Errors
    ///
    /// Returns [`QuotaError`] carrying the characters still available when
    /// the projected total would exceed the tier limit.
    pub fn check(&self, identity: &str, characters: u64) -> Result<(), QuotaError> {
        if !self.enabled {
            return Ok(());
        }

        let ledger = self.live_ledger(identity);
        let projected = ledger.characters_used.saturating_add(characters);

        if projected > ledger.limit() {
            let remaining = ledger.remaining();
            debug!(
                identity = %identity,
                requested = characters,
                remaining,
                "quota check failed"
            );
            return Err(QuotaError::new(remaining));
        }

        Ok(())
    }

    /// Bill `characters` against the identity's ledger.
    ///
    /// Called only after synthesis succeeds; a failed request costs
    /// nothing.
    pub fn consume(&self, identity: &str, characters: u64) {
        if !self.enabled {
            return;
        }

        let mut ledger = self.live_ledger(identity);
        ledger.characters_used = ledger.characters_used.saturating_add(characters);
        debug!(
            identity = %identity,
            used = ledger.characters_used,
            limit = ledger.limit(),
            "quota consumed"
        );
    }

    /// Point-in-time usage view for the identity.
    pub fn snapshot(&self, identity: &str) -> UsageSnapshot {
        let now = self.clock.now();
        let ledger = self.live_ledger(identity);
        let limit = ledger.limit();

        UsageSnapshot {
            tier: ledger.tier,
            characters_used: ledger.characters_used,
            limit,
            remaining: ledger.remaining(),
            usage_ratio: ledger.characters_used as f64 / limit as f64,
            reset_at: ledger.reset_at,
            days_until_reset: days_until(now, ledger.reset_at),
        }
    }

    /// Characters left in the identity's current period.
    pub fn remaining_characters(&self, identity: &str) -> u64 {
        self.live_ledger(identity).remaining()
    }

    /// Move the identity onto a new tier for the rest of the period.
    ///
    /// Usage carries over; only the limit changes. The administrative
    /// entry point for future payment integration.
    pub fn upgrade_tier(&self, identity: &str, tier: PlanTier) {
        let mut ledger = self.live_ledger(identity);
        ledger.tier = tier;
        info!(identity = %identity, tier = %tier, "plan tier changed");
    }

    /// Remove every ledger whose period has lapsed, returning how many
    /// were dropped. Safe alongside live traffic: a swept identity is
    /// rebuilt fresh on its next touch.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let before = self.ledgers.len();
        self.ledgers.retain(|_, ledger| now <= ledger.reset_at);
        before.saturating_sub(self.ledgers.len())
    }

    /// Number of identities currently tracked.
    pub fn len(&self) -> usize {
        self.ledgers.len()
    }

    /// True when no identities are tracked.
    pub fn is_empty(&self) -> bool {
        self.ledgers.is_empty()
    }

    /// Fetch the identity's ledger, creating or rebuilding it if missing
    /// or lapsed. Expired periods restart at the default tier, exactly as
    /// a brand-new identity would.
    fn live_ledger(&self, identity: &str) -> dashmap::mapref::one::RefMut<'_, String, QuotaLedger> {
        let now = self.clock.now();
        let mut ledger = self
            .ledgers
            .entry(identity.to_string())
            .or_insert_with(|| QuotaLedger::fresh(now));

        if now > ledger.reset_at {
            *ledger = QuotaLedger::fresh(now);
        }

        ledger
    }
}

/// First day of the month after `now`, at midnight UTC.
fn next_month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let (year, month) = if now.month() == 12 {
        (now.year() + 1, 1)
    } else {
        (now.year(), now.month() + 1)
    };

    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .expect("first day of a month is a valid UTC timestamp")
}

fn days_until(now: DateTime<Utc>, reset_at: DateTime<Utc>) -> i64 {
    let millis = (reset_at - now).num_milliseconds().max(0) as u64;
    millis.div_ceil(86_400_000) as i64
}
