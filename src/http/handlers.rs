use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app::access::{AccessControl, FeatureAccess, UsageSummary};
use crate::app::notifications::AddOptions;
use crate::config::tier_limits::TierLimits;
use crate::domain::feature::{Feature, UpgradePrompt};
use crate::domain::notification::{NewNotification, Notification};
use crate::domain::tenant::Tenant;
use crate::domain::tier::SubscriptionTier;
use crate::http::{AppError, CallerRole};
use crate::AppState;

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
}

#[derive(Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
}

pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let db = state.tenants.ping().await.is_ok();
    let store = state.notifications.ping().await.is_ok();
    let status = if db && store { "ok" } else { "degraded" };

    Json(HealthResponse { status })
}

async fn load_tenant(state: &AppState, tenant_id: Uuid) -> Result<Tenant, AppError> {
    state
        .tenants
        .find_by_id(tenant_id)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, tenant_id = %tenant_id, "failed to load tenant");
            AppError::internal("failed to load tenant")
        })?
        .ok_or_else(|| AppError::not_found("tenant not found"))
}

fn parse_feature(key: &str) -> Result<Feature, AppError> {
    key.parse()
        .map_err(|_| AppError::not_found("unknown feature"))
}

fn parse_tier(tier: &str) -> Result<SubscriptionTier, AppError> {
    tier.parse()
        .map_err(|_| AppError::not_found("unknown subscription tier"))
}

#[derive(Serialize)]
pub struct FeatureTierResponse {
    pub feature: Feature,
    pub required_tier: SubscriptionTier,
}

pub async fn get_feature_tier(Path(key): Path<String>) -> Result<Json<FeatureTierResponse>, AppError> {
    let feature = parse_feature(&key)?;
    Ok(Json(FeatureTierResponse {
        feature,
        required_tier: feature.required_tier(),
    }))
}

pub async fn get_upgrade_prompt(Path(key): Path<String>) -> Result<Json<UpgradePrompt>, AppError> {
    AccessControl::upgrade_prompt_for_feature(&key)
        .map(Json)
        .ok_or_else(|| AppError::not_found("no upgrade prompt for feature"))
}

/// Unknown tiers answer with zero limits rather than an error.
pub async fn get_tier_limits(Path(tier): Path<String>) -> Json<TierLimits> {
    Json(AccessControl::subscription_tier_limits(tier.parse().ok()))
}

#[derive(Serialize)]
pub struct AccessibleFeaturesResponse {
    pub features: Vec<Feature>,
}

pub async fn list_accessible_features(
    CallerRole(role): CallerRole,
    Path(tenant_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<AccessibleFeaturesResponse>, AppError> {
    let tenant = load_tenant(&state, tenant_id).await?;
    Ok(Json(AccessibleFeaturesResponse {
        features: state.access.accessible_features(&tenant, role),
    }))
}

pub async fn get_feature_access(
    CallerRole(role): CallerRole,
    Path((tenant_id, key)): Path<(Uuid, String)>,
    State(state): State<AppState>,
) -> Result<Json<FeatureAccess>, AppError> {
    let feature = parse_feature(&key)?;
    let tenant = load_tenant(&state, tenant_id).await?;
    Ok(Json(state.access.feature_access(&tenant, role, feature)))
}

#[derive(Serialize)]
pub struct TierCheckResponse {
    pub tier: SubscriptionTier,
    pub has_tier: bool,
}

pub async fn check_subscription_tier(
    Path((tenant_id, tier)): Path<(Uuid, String)>,
    State(state): State<AppState>,
) -> Result<Json<TierCheckResponse>, AppError> {
    let tier = parse_tier(&tier)?;
    let tenant = load_tenant(&state, tenant_id).await?;
    Ok(Json(TierCheckResponse {
        tier,
        has_tier: state.access.has_subscription_tier(&tenant, tier),
    }))
}

pub async fn get_usage(
    Path(tenant_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<UsageSummary>, AppError> {
    let tenant = load_tenant(&state, tenant_id).await?;

    let asset_count = state
        .equipment
        .count_by_tenant(tenant_id)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, tenant_id = %tenant_id, "failed to count equipment");
            AppError::internal("failed to load usage")
        })?;
    let user_count = state
        .tenants
        .count_members(tenant_id)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, tenant_id = %tenant_id, "failed to count members");
            AppError::internal("failed to load usage")
        })?;

    Ok(Json(state.access.usage_summary(&tenant, asset_count, user_count)))
}

/// `?toast=false` stores notifications without announcing them.
#[derive(Deserialize)]
pub struct ToastQuery {
    pub toast: Option<bool>,
}

impl ToastQuery {
    fn options(&self) -> AddOptions {
        AddOptions {
            show_toast: self.toast.unwrap_or(true),
        }
    }
}

pub async fn check_notifications(
    Path(tenant_id): Path<Uuid>,
    Query(query): Query<ToastQuery>,
    State(state): State<AppState>,
) -> Result<Json<ListResponse<Notification>>, AppError> {
    load_tenant(&state, tenant_id).await?;

    let equipment = state
        .equipment
        .list_by_tenant(tenant_id)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, tenant_id = %tenant_id, "failed to load equipment");
            AppError::internal("failed to load equipment")
        })?;

    let added = state
        .notifications
        .check_equipment_notifications(tenant_id, &equipment, query.options())
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, tenant_id = %tenant_id, "failed to check equipment notifications");
            AppError::internal("failed to check notifications")
        })?;

    Ok(Json(ListResponse { items: added }))
}

pub async fn list_notifications(
    Path(tenant_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<ListResponse<Notification>>, AppError> {
    load_tenant(&state, tenant_id).await?;

    let items = state.notifications.list(tenant_id).await.map_err(|err| {
        tracing::error!(error = ?err, tenant_id = %tenant_id, "failed to list notifications");
        AppError::internal("failed to list notifications")
    })?;

    Ok(Json(ListResponse { items }))
}

pub async fn create_notification(
    Path(tenant_id): Path<Uuid>,
    Query(query): Query<ToastQuery>,
    State(state): State<AppState>,
    Json(payload): Json<NewNotification>,
) -> Result<(StatusCode, Json<Option<Notification>>), AppError> {
    load_tenant(&state, tenant_id).await?;

    if payload.title.trim().is_empty() {
        return Err(AppError::bad_request("title is required"));
    }
    if payload.message.trim().is_empty() {
        return Err(AppError::bad_request("message is required"));
    }

    let stored = state
        .notifications
        .add_notification(tenant_id, payload, query.options())
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, tenant_id = %tenant_id, "failed to add notification");
            AppError::internal("failed to add notification")
        })?;

    // A suppressed duplicate is not an error; the caller sees 200 with null.
    let status = if stored.is_some() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(stored)))
}

#[derive(Serialize)]
pub struct UnreadCountResponse {
    pub unread: usize,
}

pub async fn unread_count(
    Path(tenant_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<UnreadCountResponse>, AppError> {
    load_tenant(&state, tenant_id).await?;

    let unread = state.notifications.unread_count(tenant_id).await.map_err(|err| {
        tracing::error!(error = ?err, tenant_id = %tenant_id, "failed to count unread notifications");
        AppError::internal("failed to count notifications")
    })?;

    Ok(Json(UnreadCountResponse { unread }))
}

pub async fn mark_notification_read(
    Path((tenant_id, notification_id)): Path<(Uuid, String)>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    load_tenant(&state, tenant_id).await?;

    let updated = state
        .notifications
        .mark_as_read(tenant_id, &notification_id)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, notification_id = %notification_id, tenant_id = %tenant_id, "failed to mark notification read");
            AppError::internal("failed to mark notification read")
        })?;

    if updated {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("notification not found"))
    }
}

#[derive(Serialize)]
pub struct MarkAllReadResponse {
    pub updated: usize,
}

pub async fn mark_all_notifications_read(
    Path(tenant_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<MarkAllReadResponse>, AppError> {
    load_tenant(&state, tenant_id).await?;

    let updated = state
        .notifications
        .mark_all_as_read(tenant_id)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, tenant_id = %tenant_id, "failed to mark notifications read");
            AppError::internal("failed to mark notifications read")
        })?;

    Ok(Json(MarkAllReadResponse { updated }))
}

pub async fn delete_notification(
    Path((tenant_id, notification_id)): Path<(Uuid, String)>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    load_tenant(&state, tenant_id).await?;

    let deleted = state
        .notifications
        .delete(tenant_id, &notification_id)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, notification_id = %notification_id, tenant_id = %tenant_id, "failed to delete notification");
            AppError::internal("failed to delete notification")
        })?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("notification not found"))
    }
}

pub async fn clear_notifications(
    Path(tenant_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    load_tenant(&state, tenant_id).await?;

    state.notifications.clear_all(tenant_id).await.map_err(|err| {
        tracing::error!(error = ?err, tenant_id = %tenant_id, "failed to clear notifications");
        AppError::internal("failed to clear notifications")
    })?;

    Ok(StatusCode::NO_CONTENT)
}
