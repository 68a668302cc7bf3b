use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::tier::SubscriptionTier;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Trialing,
    PastDue,
    Canceled,
    #[serde(other)]
    Unknown,
}

impl SubscriptionStatus {
    /// Payment-provider statuses arrive as free text; anything unrecognised
    /// carries no special meaning.
    pub fn parse(value: &str) -> Self {
        match value {
            "active" => SubscriptionStatus::Active,
            "trialing" => SubscriptionStatus::Trialing,
            "past_due" => SubscriptionStatus::PastDue,
            "canceled" | "cancelled" => SubscriptionStatus::Canceled,
            _ => SubscriptionStatus::Unknown,
        }
    }
}

/// Role of the user acting on behalf of a tenant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    Member,
}

impl Role {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Role::Admin,
            "manager" => Role::Manager,
            _ => Role::Member,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    pub subscription_tier: Option<SubscriptionTier>,
    pub subscription_status: SubscriptionStatus,
    #[serde(with = "time::serde::rfc3339::option")]
    pub trial_ends_at: Option<OffsetDateTime>,
}

impl Tenant {
    /// A tenant is on trial while its status says so and the trial end, when
    /// recorded, is still ahead of `now`.
    pub fn is_on_active_trial(&self, now: OffsetDateTime) -> bool {
        if self.subscription_status != SubscriptionStatus::Trialing {
            return false;
        }
        match self.trial_ends_at {
            Some(ends_at) => ends_at > now,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn tenant(status: SubscriptionStatus, trial_ends_at: Option<OffsetDateTime>) -> Tenant {
        Tenant {
            id: Uuid::new_v4(),
            name: "Acme Plant Hire".into(),
            subscription_tier: Some(SubscriptionTier::Basic),
            subscription_status: status,
            trial_ends_at,
        }
    }

    #[test]
    fn trial_requires_trialing_status() {
        let now = OffsetDateTime::now_utc();
        let t = tenant(SubscriptionStatus::Active, Some(now + Duration::days(3)));
        assert!(!t.is_on_active_trial(now));
    }

    #[test]
    fn expired_trial_is_not_active() {
        let now = OffsetDateTime::now_utc();
        let t = tenant(SubscriptionStatus::Trialing, Some(now - Duration::hours(1)));
        assert!(!t.is_on_active_trial(now));
        let t = tenant(SubscriptionStatus::Trialing, Some(now + Duration::hours(1)));
        assert!(t.is_on_active_trial(now));
    }

    #[test]
    fn open_ended_trial_is_active() {
        let t = tenant(SubscriptionStatus::Trialing, None);
        assert!(t.is_on_active_trial(OffsetDateTime::now_utc()));
    }

    #[test]
    fn unrecognised_status_and_role_fall_back() {
        assert_eq!(SubscriptionStatus::parse("incomplete"), SubscriptionStatus::Unknown);
        assert_eq!(SubscriptionStatus::parse("trialing"), SubscriptionStatus::Trialing);
        assert_eq!(Role::parse(" Admin "), Role::Admin);
        assert_eq!(Role::parse("owner"), Role::Member);
    }

    #[test]
    fn unknown_status_deserializes() {
        let status: SubscriptionStatus = serde_json::from_str("\"paused\"").unwrap();
        assert_eq!(status, SubscriptionStatus::Unknown);
    }
}
