use serde::{Serialize, Serializer};

use crate::domain::tier::SubscriptionTier;

/// A resource cap; `Unlimited` is rendered as the string `"Unlimited"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Limited(u32),
    Unlimited,
}

impl Limit {
    /// `count` is the current usage; room remains while it is below the cap.
    pub fn allows(&self, count: u32) -> bool {
        match self {
            Limit::Unlimited => true,
            Limit::Limited(max) => count < *max,
        }
    }
}

impl Serialize for Limit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Limit::Limited(max) => serializer.serialize_u32(*max),
            Limit::Unlimited => serializer.serialize_str("Unlimited"),
        }
    }
}

/// Per-tier resource limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierLimits {
    pub assets: Limit,
    pub users: Limit,
}

impl TierLimits {
    /// Limits for a tenant's tier. Tenants without a tier get nothing.
    pub fn for_tier(tier: Option<SubscriptionTier>) -> Self {
        match tier {
            Some(SubscriptionTier::Basic) => TierLimits {
                assets: Limit::Limited(25),
                users: Limit::Limited(3),
            },
            Some(SubscriptionTier::Standard) => TierLimits {
                assets: Limit::Limited(100),
                users: Limit::Limited(10),
            },
            Some(SubscriptionTier::Premium) => TierLimits {
                assets: Limit::Limited(500),
                users: Limit::Limited(50),
            },
            Some(SubscriptionTier::Enterprise) => TierLimits {
                assets: Limit::Unlimited,
                users: Limit::Unlimited,
            },
            None => TierLimits {
                assets: Limit::Limited(0),
                users: Limit::Limited(0),
            },
        }
    }
}
