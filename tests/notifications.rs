//! Notification Tests
//!
//! Covers deadline checks, deduplication, the store cap and the read/delete
//! lifecycle through the HTTP surface.

mod common;

use axum::http::StatusCode;
use common::{app, equipment, NOW};
use serde_json::json;
use time::Duration;

use equiptrack::app::notifications::ToastVariant;
use equiptrack::domain::tenant::SubscriptionStatus;
use equiptrack::domain::tier::SubscriptionTier;

fn manual(title: &str) -> serde_json::Value {
    json!({
        "type": "status_change",
        "title": title,
        "message": "Status changed to In Use",
        "priority": "low"
    })
}

// ===========================================================================
// Deadline checks
// ===========================================================================

#[tokio::test]
async fn overdue_maintenance_emits_once_per_day() {
    let app = app();
    let tenant = app
        .create_tenant(Some(SubscriptionTier::Standard), SubscriptionStatus::Active)
        .await;
    let mut excavator = equipment("CAT 320 Excavator");
    excavator.next_maintenance = Some(NOW - Duration::days(1));
    let excavator = app.add_equipment(tenant.id, excavator).await;

    let path = format!("/v1/tenants/{}/notifications/check", tenant.id);
    let resp = app.post(&path).await;
    assert_eq!(resp.status, StatusCode::OK);
    let items = resp.json()["items"].as_array().unwrap().clone();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["type"], "maintenance_overdue");
    assert_eq!(items[0]["priority"], "high");
    assert_eq!(items[0]["equipmentId"], excavator.id.to_string());
    assert_eq!(items[0]["equipmentName"], "CAT 320 Excavator");
    assert_eq!(items[0]["actionUrl"], format!("/equipment/{}", excavator.id));
    assert_eq!(items[0]["read"], false);

    app.clock.advance(Duration::hours(3));
    let resp = app.post(&path).await;
    assert!(resp.json()["items"].as_array().unwrap().is_empty());

    let resp = app
        .get(&format!("/v1/tenants/{}/notifications", tenant.id))
        .await;
    assert_eq!(resp.json()["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn certification_and_inspection_windows() {
    let app = app();
    let tenant = app
        .create_tenant(Some(SubscriptionTier::Premium), SubscriptionStatus::Active)
        .await;

    let mut crane = equipment("Tower Crane");
    crane.certification_required = true;
    crane.certification_expiry = Some(NOW + Duration::days(10));
    app.add_equipment(tenant.id, crane).await;

    let mut truck = equipment("Dump Truck");
    truck.next_inspection = Some(NOW + Duration::days(20));
    app.add_equipment(tenant.id, truck).await;

    let resp = app
        .post(&format!("/v1/tenants/{}/notifications/check", tenant.id))
        .await;
    let items = resp.json()["items"].as_array().unwrap().clone();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["type"], "certification_expiring");
    assert_eq!(items[0]["priority"], "high");
    assert_eq!(items[0]["equipmentName"], "Tower Crane");
}

#[tokio::test]
async fn expired_certification_toasts_destructively() {
    let app = app();
    let mut toasts = app.state.notifications.subscribe_toasts();
    let tenant = app
        .create_tenant(Some(SubscriptionTier::Basic), SubscriptionStatus::Active)
        .await;

    let mut lift = equipment("Boom Lift");
    lift.certification_required = true;
    lift.certification_expiry = Some(NOW - Duration::days(5));
    app.add_equipment(tenant.id, lift).await;

    let resp = app
        .post(&format!("/v1/tenants/{}/notifications/check", tenant.id))
        .await;
    assert_eq!(resp.json()["items"][0]["priority"], "critical");

    let toast = toasts.try_recv().unwrap();
    assert_eq!(toast.variant, ToastVariant::Destructive);
    assert_eq!(toast.tenant_id, tenant.id);
}

#[tokio::test]
async fn check_for_unknown_tenant_is_not_found() {
    let app = app();
    let resp = app
        .post(&format!("/v1/tenants/{}/notifications/check", uuid::Uuid::new_v4()))
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn quiet_check_skips_toasts() {
    let app = app();
    let mut toasts = app.state.notifications.subscribe_toasts();
    let tenant = app
        .create_tenant(Some(SubscriptionTier::Basic), SubscriptionStatus::Active)
        .await;
    let mut loader = equipment("Wheel Loader");
    loader.next_maintenance = Some(NOW + Duration::days(2));
    app.add_equipment(tenant.id, loader).await;

    let resp = app
        .post(&format!("/v1/tenants/{}/notifications/check?toast=false", tenant.id))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["items"][0]["type"], "maintenance_due");
    assert!(toasts.try_recv().is_err());
}

// ===========================================================================
// Manual notifications and lifecycle
// ===========================================================================

#[tokio::test]
async fn create_notification_validates_body() {
    let app = app();
    let tenant = app.create_tenant(None, SubscriptionStatus::Active).await;
    let path = format!("/v1/tenants/{}/notifications", tenant.id);

    let resp = app.post_json(&path, manual("  ")).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_message(), "title is required");

    let resp = app.post_json(&path, manual("Excavator checked out")).await;
    assert_eq!(resp.status, StatusCode::CREATED);
    let body = resp.json();
    assert_eq!(body["type"], "status_change");
    assert!(body["id"].as_str().unwrap().contains('-'));
    assert_eq!(body["timestamp"], "2024-06-15T09:30:00Z");
}

#[tokio::test]
async fn duplicate_equipment_notification_is_suppressed() {
    let app = app();
    let tenant = app.create_tenant(None, SubscriptionStatus::Active).await;
    let path = format!("/v1/tenants/{}/notifications", tenant.id);
    let body = json!({
        "type": "equipment_updated",
        "title": "Equipment updated",
        "message": "Hours meter updated",
        "priority": "low",
        "equipmentId": uuid::Uuid::new_v4(),
        "equipmentName": "Telehandler"
    });

    let first = app.post_json(&format!("{}?toast=false", path), body.clone()).await;
    assert_eq!(first.status, StatusCode::CREATED);

    let second = app.post_json(&path, body).await;
    assert_eq!(second.status, StatusCode::OK);
    assert!(second.json().is_null());
}

#[tokio::test]
async fn store_keeps_newest_hundred() {
    let app = app();
    let tenant = app.create_tenant(None, SubscriptionStatus::Active).await;
    let path = format!("/v1/tenants/{}/notifications?toast=false", tenant.id);

    for i in 0..101 {
        app.clock.advance(Duration::seconds(1));
        let resp = app.post_json(&path, manual(&format!("event {}", i))).await;
        assert_eq!(resp.status, StatusCode::CREATED);
    }

    let resp = app
        .get(&format!("/v1/tenants/{}/notifications", tenant.id))
        .await;
    let items = resp.json()["items"].as_array().unwrap().clone();
    assert_eq!(items.len(), 100);
    assert_eq!(items[0]["title"], "event 100");
    assert_eq!(items[99]["title"], "event 1");
}

#[tokio::test]
async fn read_delete_and_clear() {
    let app = app();
    let tenant = app.create_tenant(None, SubscriptionStatus::Active).await;
    let base = format!("/v1/tenants/{}/notifications", tenant.id);

    let a = app.post_json(&base, manual("a")).await.json();
    let b = app.post_json(&base, manual("b")).await.json();
    app.post_json(&base, manual("c")).await;

    let resp = app.get(&format!("{}/unread-count", base)).await;
    assert_eq!(resp.json(), json!({ "unread": 3 }));

    let a_id = a["id"].as_str().unwrap();
    let resp = app.post(&format!("{}/{}/read", base, a_id)).await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);
    let resp = app.post(&format!("{}/missing-id/read", base)).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);

    let resp = app.get(&format!("{}/unread-count", base)).await;
    assert_eq!(resp.json()["unread"], 2);

    let resp = app.post(&format!("{}/read-all", base)).await;
    assert_eq!(resp.json(), json!({ "updated": 2 }));

    let b_id = b["id"].as_str().unwrap();
    let resp = app.delete(&format!("{}/{}", base, b_id)).await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);
    let resp = app.delete(&format!("{}/{}", base, b_id)).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);

    let resp = app.get(&base).await;
    assert_eq!(resp.json()["items"].as_array().unwrap().len(), 2);

    let resp = app.delete(&base).await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);
    let resp = app.get(&base).await;
    assert!(resp.json()["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_tenant_has_no_notification_list() {
    let app = app();
    let base = format!("/v1/tenants/{}/notifications", uuid::Uuid::new_v4());

    let resp = app.post_json(&base, manual("Excavator checked out")).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.error_message(), "tenant not found");

    let resp = app.get(&base).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);

    let resp = app.get(&format!("{}/unread-count", base)).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);

    let resp = app.post(&format!("{}/read-all", base)).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);

    let resp = app.delete(&base).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);

    let resp = app.delete(&format!("{}/some-id", base)).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}
