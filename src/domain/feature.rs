use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::tier::SubscriptionTier;

/// Gateable capabilities of the product.
///
/// Every variant must name its required tier in [`Feature::required_tier`];
/// the match is exhaustive so an unmapped feature does not compile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    EquipmentManagement,
    QrCodes,
    DocumentStorage,
    MaintenanceScheduling,
    BasicReporting,
    GpsTracking,
    MaintenanceAlerts,
    ProjectManagement,
    AdvancedReporting,
    BulkImport,
    Geofencing,
    ApiAccess,
    CustomFields,
    AnalyticsDashboard,
    AuditLogs,
    Sso,
    WhiteLabel,
    DedicatedSupport,
    MultiLocation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpgradePrompt {
    pub title: &'static str,
    pub description: &'static str,
    pub required_tier: SubscriptionTier,
}

impl Feature {
    pub const ALL: [Feature; 19] = [
        Feature::EquipmentManagement,
        Feature::QrCodes,
        Feature::DocumentStorage,
        Feature::MaintenanceScheduling,
        Feature::BasicReporting,
        Feature::GpsTracking,
        Feature::MaintenanceAlerts,
        Feature::ProjectManagement,
        Feature::AdvancedReporting,
        Feature::BulkImport,
        Feature::Geofencing,
        Feature::ApiAccess,
        Feature::CustomFields,
        Feature::AnalyticsDashboard,
        Feature::AuditLogs,
        Feature::Sso,
        Feature::WhiteLabel,
        Feature::DedicatedSupport,
        Feature::MultiLocation,
    ];

    pub fn required_tier(&self) -> SubscriptionTier {
        match self {
            Feature::EquipmentManagement
            | Feature::QrCodes
            | Feature::DocumentStorage
            | Feature::MaintenanceScheduling
            | Feature::BasicReporting => SubscriptionTier::Basic,
            Feature::GpsTracking
            | Feature::MaintenanceAlerts
            | Feature::ProjectManagement
            | Feature::AdvancedReporting
            | Feature::BulkImport => SubscriptionTier::Standard,
            Feature::Geofencing
            | Feature::ApiAccess
            | Feature::CustomFields
            | Feature::AnalyticsDashboard
            | Feature::AuditLogs => SubscriptionTier::Premium,
            Feature::Sso
            | Feature::WhiteLabel
            | Feature::DedicatedSupport
            | Feature::MultiLocation => SubscriptionTier::Enterprise,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Feature::EquipmentManagement => "equipment_management",
            Feature::QrCodes => "qr_codes",
            Feature::DocumentStorage => "document_storage",
            Feature::MaintenanceScheduling => "maintenance_scheduling",
            Feature::BasicReporting => "basic_reporting",
            Feature::GpsTracking => "gps_tracking",
            Feature::MaintenanceAlerts => "maintenance_alerts",
            Feature::ProjectManagement => "project_management",
            Feature::AdvancedReporting => "advanced_reporting",
            Feature::BulkImport => "bulk_import",
            Feature::Geofencing => "geofencing",
            Feature::ApiAccess => "api_access",
            Feature::CustomFields => "custom_fields",
            Feature::AnalyticsDashboard => "analytics_dashboard",
            Feature::AuditLogs => "audit_logs",
            Feature::Sso => "sso",
            Feature::WhiteLabel => "white_label",
            Feature::DedicatedSupport => "dedicated_support",
            Feature::MultiLocation => "multi_location",
        }
    }

    /// Marketing copy shown in place of gated content. Base-tier features
    /// have nothing to upsell and return `None`.
    pub fn upgrade_prompt(&self) -> Option<UpgradePrompt> {
        let (title, description) = match self {
            Feature::GpsTracking => (
                "Track your fleet in real time",
                "See the live location of every machine on a map and replay where it has been.",
            ),
            Feature::MaintenanceAlerts => (
                "Never miss a service date",
                "Get automatic alerts before maintenance, inspections and certifications fall due.",
            ),
            Feature::ProjectManagement => (
                "Assign equipment to projects",
                "Plan which assets work on which job sites and see utilization per project.",
            ),
            Feature::AdvancedReporting => (
                "Unlock advanced reports",
                "Build utilization, cost and downtime reports across your whole inventory.",
            ),
            Feature::BulkImport => (
                "Import your inventory in bulk",
                "Upload spreadsheets to add or update hundreds of assets at once.",
            ),
            Feature::Geofencing => (
                "Keep equipment where it belongs",
                "Draw geofences around job sites and get notified when assets leave them.",
            ),
            Feature::ApiAccess => (
                "Connect your own systems",
                "Use the REST API to sync equipment data with ERP, accounting and telematics tools.",
            ),
            Feature::CustomFields => (
                "Track what matters to you",
                "Add custom fields to equipment records to capture your own data.",
            ),
            Feature::AnalyticsDashboard => (
                "See the big picture",
                "Interactive dashboards for fleet health, utilization and spend.",
            ),
            Feature::AuditLogs => (
                "Know who changed what",
                "A full audit trail of every change made to your equipment records.",
            ),
            Feature::Sso => (
                "Single sign-on for your team",
                "Let your staff sign in with your corporate identity provider.",
            ),
            Feature::WhiteLabel => (
                "Make it yours",
                "Use your own logo, colors and domain across the application.",
            ),
            Feature::MultiLocation => (
                "Manage every yard and depot",
                "Organize inventory across multiple locations with per-site permissions.",
            ),
            Feature::DedicatedSupport
            | Feature::EquipmentManagement
            | Feature::QrCodes
            | Feature::DocumentStorage
            | Feature::MaintenanceScheduling
            | Feature::BasicReporting => return None,
        };

        Some(UpgradePrompt {
            title,
            description,
            required_tier: self.required_tier(),
        })
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFeature(pub String);

impl fmt::Display for UnknownFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown feature key: {}", self.0)
    }
}

impl std::error::Error for UnknownFeature {}

impl FromStr for Feature {
    type Err = UnknownFeature;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .iter()
            .copied()
            .find(|feature| feature.key() == s)
            .ok_or_else(|| UnknownFeature(s.to_string()))
    }
}
