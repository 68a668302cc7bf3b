use axum::{routing::delete, routing::get, routing::post, Router};

use crate::AppState;
use crate::http::handlers;

pub fn health() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health))
}

pub fn catalogue() -> Router<AppState> {
    Router::new()
        .route("/features/:key/tier", get(handlers::get_feature_tier))
        .route(
            "/features/:key/upgrade-prompt",
            get(handlers::get_upgrade_prompt),
        )
        .route("/tiers/:tier/limits", get(handlers::get_tier_limits))
}

pub fn access() -> Router<AppState> {
    Router::new()
        .route(
            "/tenants/:id/features",
            get(handlers::list_accessible_features),
        )
        .route(
            "/tenants/:id/features/:key",
            get(handlers::get_feature_access),
        )
        .route(
            "/tenants/:id/tiers/:tier",
            get(handlers::check_subscription_tier),
        )
        .route("/tenants/:id/usage", get(handlers::get_usage))
}

pub fn notifications() -> Router<AppState> {
    Router::new()
        .route(
            "/tenants/:id/notifications",
            get(handlers::list_notifications)
                .post(handlers::create_notification)
                .delete(handlers::clear_notifications),
        )
        .route(
            "/tenants/:id/notifications/check",
            post(handlers::check_notifications),
        )
        .route(
            "/tenants/:id/notifications/unread-count",
            get(handlers::unread_count),
        )
        .route(
            "/tenants/:id/notifications/read-all",
            post(handlers::mark_all_notifications_read),
        )
        .route(
            "/tenants/:id/notifications/:notification_id",
            delete(handlers::delete_notification),
        )
        .route(
            "/tenants/:id/notifications/:notification_id/read",
            post(handlers::mark_notification_read),
        )
}
