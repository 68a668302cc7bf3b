use serde::Serialize;
use std::sync::Arc;

use crate::app::clock::Clock;
use crate::config::tier_limits::TierLimits;
use crate::domain::feature::{Feature, UpgradePrompt};
use crate::domain::tenant::{Role, Tenant};
use crate::domain::tier::{tier_rank, SubscriptionTier};

/// Highest tier a trial unlocks when asked about tiers rather than features.
const TRIAL_TIER_CEILING: SubscriptionTier = SubscriptionTier::Premium;

#[derive(Debug, Clone, Serialize)]
pub struct FeatureAccess {
    pub feature: Feature,
    pub has_access: bool,
    pub required_tier: SubscriptionTier,
    /// Only populated when access is denied.
    pub upgrade_prompt: Option<UpgradePrompt>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UsageSummary {
    pub tier: Option<SubscriptionTier>,
    pub limits: TierLimits,
    pub asset_count: u32,
    pub user_count: u32,
    pub under_asset_limit: bool,
    pub under_user_limit: bool,
}

/// Subscription gating decisions. Every lookup fails closed: unknown
/// features are denied and unknown tiers get zero limits.
#[derive(Clone)]
pub struct AccessControl {
    clock: Arc<dyn Clock>,
}

impl AccessControl {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn can_access_feature(&self, tenant: &Tenant, role: Role, feature: Feature) -> bool {
        if role == Role::Admin {
            return true;
        }
        if tenant.is_on_active_trial(self.clock.now()) {
            return true;
        }

        let allowed = tier_rank(tenant.subscription_tier) >= feature.required_tier().rank();
        if !allowed {
            tracing::debug!(
                tenant_id = %tenant.id,
                feature = %feature,
                tier = ?tenant.subscription_tier,
                "feature access denied"
            );
        }
        allowed
    }

    /// String entry point for callers holding a raw feature key.
    pub fn can_access_feature_key(&self, tenant: &Tenant, role: Role, key: &str) -> bool {
        match key.parse::<Feature>() {
            Ok(feature) => self.can_access_feature(tenant, role, feature),
            Err(_) => {
                tracing::debug!(tenant_id = %tenant.id, key = key, "unknown feature key");
                false
            }
        }
    }

    /// Trials count as premium here, not enterprise.
    pub fn has_subscription_tier(&self, tenant: &Tenant, tier: SubscriptionTier) -> bool {
        if tenant.is_on_active_trial(self.clock.now()) {
            return tier.rank() <= TRIAL_TIER_CEILING.rank();
        }
        tier_rank(tenant.subscription_tier) >= tier.rank()
    }

    pub fn accessible_features(&self, tenant: &Tenant, role: Role) -> Vec<Feature> {
        let ceiling = if role == Role::Admin {
            SubscriptionTier::Enterprise.rank()
        } else if tenant.is_on_active_trial(self.clock.now()) {
            TRIAL_TIER_CEILING.rank()
        } else {
            tier_rank(tenant.subscription_tier)
        };

        Feature::ALL
            .iter()
            .copied()
            .filter(|feature| feature.required_tier().rank() <= ceiling)
            .collect()
    }

    pub fn feature_access(&self, tenant: &Tenant, role: Role, feature: Feature) -> FeatureAccess {
        let has_access = self.can_access_feature(tenant, role, feature);
        FeatureAccess {
            feature,
            has_access,
            required_tier: feature.required_tier(),
            upgrade_prompt: if has_access {
                None
            } else {
                feature.upgrade_prompt()
            },
        }
    }

    pub fn usage_summary(&self, tenant: &Tenant, asset_count: u32, user_count: u32) -> UsageSummary {
        let tier = tenant.subscription_tier;
        UsageSummary {
            tier,
            limits: Self::subscription_tier_limits(tier),
            asset_count,
            user_count,
            under_asset_limit: Self::is_under_asset_limit(tier, asset_count),
            under_user_limit: Self::is_under_user_limit(tier, user_count),
        }
    }

    pub fn feature_tier(key: &str) -> Option<SubscriptionTier> {
        key.parse::<Feature>().ok().map(|feature| feature.required_tier())
    }

    pub fn upgrade_prompt_for_feature(key: &str) -> Option<UpgradePrompt> {
        key.parse::<Feature>().ok().and_then(|feature| feature.upgrade_prompt())
    }

    pub fn subscription_tier_limits(tier: Option<SubscriptionTier>) -> TierLimits {
        TierLimits::for_tier(tier)
    }

    pub fn is_under_asset_limit(tier: Option<SubscriptionTier>, count: u32) -> bool {
        TierLimits::for_tier(tier).assets.allows(count)
    }

    pub fn is_under_user_limit(tier: Option<SubscriptionTier>, count: u32) -> bool {
        TierLimits::for_tier(tier).users.allows(count)
    }
}
