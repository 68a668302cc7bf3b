use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Subscription tiers, totally ordered from cheapest to most capable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum SubscriptionTier {
    Basic = 1,
    Standard = 2,
    Premium = 3,
    Enterprise = 4,
}

impl SubscriptionTier {
    pub const ALL: [SubscriptionTier; 4] = [
        SubscriptionTier::Basic,
        SubscriptionTier::Standard,
        SubscriptionTier::Premium,
        SubscriptionTier::Enterprise,
    ];

    pub fn rank(&self) -> u8 {
        *self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionTier::Basic => "basic",
            SubscriptionTier::Standard => "standard",
            SubscriptionTier::Premium => "premium",
            SubscriptionTier::Enterprise => "enterprise",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SubscriptionTier::Basic => "Basic",
            SubscriptionTier::Standard => "Standard",
            SubscriptionTier::Premium => "Premium",
            SubscriptionTier::Enterprise => "Enterprise",
        }
    }
}

/// Rank of an optional tier; tenants without a tier rank below every tier.
pub fn tier_rank(tier: Option<SubscriptionTier>) -> u8 {
    tier.map(|t| t.rank()).unwrap_or(0)
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTier(pub String);

impl fmt::Display for UnknownTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown subscription tier: {}", self.0)
    }
}

impl std::error::Error for UnknownTier {}

impl FromStr for SubscriptionTier {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(SubscriptionTier::Basic),
            "standard" => Ok(SubscriptionTier::Standard),
            "premium" => Ok(SubscriptionTier::Premium),
            "enterprise" => Ok(SubscriptionTier::Enterprise),
            other => Err(UnknownTier(other.to_string())),
        }
    }
}
