//! Subscription tiers.

use serde::{Deserialize, Serialize};

/// Subscription tier determining the monthly character budget.
///
/// # Examples
///
/// ```
/// use vocetta_quota::PlanTier;
///
/// assert_eq!(PlanTier::Free.characters_per_month(), 10_000);
/// assert_eq!(PlanTier::default(), PlanTier::Free);
/// assert_eq!(PlanTier::Pro.as_str(), "pro");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    /// Free tier: 10K characters per month
    #[display("free")]
    Free,
    /// Basic tier: 100K characters per month
    #[display("basic")]
    Basic,
    /// Pro tier: 500K characters per month
    #[display("pro")]
    Pro,
}

impl PlanTier {
    /// Characters included per calendar month.
    pub fn characters_per_month(&self) -> u64 {
        match self {
            PlanTier::Free => 10_000,
            PlanTier::Basic => 100_000,
            PlanTier::Pro => 500_000,
        }
    }

    /// Human-readable tier name.
    pub fn name(&self) -> &'static str {
        match self {
            PlanTier::Free => "Free",
            PlanTier::Basic => "Basic",
            PlanTier::Pro => "Pro",
        }
    }

    /// Convert to the wire identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanTier::Free => "free",
            PlanTier::Basic => "basic",
            PlanTier::Pro => "pro",
        }
    }
}

impl Default for PlanTier {
    fn default() -> Self {
        PlanTier::Free
    }
}

impl std::str::FromStr for PlanTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(PlanTier::Free),
            "basic" => Ok(PlanTier::Basic),
            "pro" => Ok(PlanTier::Pro),
            _ => Err(format!("Unknown plan tier: {}", s)),
        }
    }
}
