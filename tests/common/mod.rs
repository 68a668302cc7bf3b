#![allow(dead_code)]

use axum::body::{Body, Bytes};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use time::macros::datetime;
use time::OffsetDateTime;
use tower::ServiceExt;
use uuid::Uuid;

use equiptrack::app::clock::FixedClock;
use equiptrack::app::notifications::NotificationSettings;
use equiptrack::domain::equipment::Equipment;
use equiptrack::domain::tenant::{SubscriptionStatus, Tenant};
use equiptrack::domain::tier::SubscriptionTier;
use equiptrack::infra::notification_store::MemoryNotificationStore;
use equiptrack::infra::repositories::{MemoryEquipmentRepository, MemoryTenantRepository};
use equiptrack::AppState;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const NOW: OffsetDateTime = datetime!(2024-06-15 09:30:00 UTC);

// ---------------------------------------------------------------------------
// TestApp — one isolated instance per test
// ---------------------------------------------------------------------------

pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub clock: Arc<FixedClock>,
    pub tenants: Arc<MemoryTenantRepository>,
    pub equipment: Arc<MemoryEquipmentRepository>,
}

pub struct TestResponse {
    pub status: StatusCode,
    body_bytes: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body_bytes).unwrap_or(Value::Null)
    }

    pub fn error_message(&self) -> String {
        self.json()["error"].as_str().unwrap_or("").to_string()
    }
}

pub fn app() -> TestApp {
    TestApp::setup()
}

impl TestApp {
    fn setup() -> Self {
        let clock = Arc::new(FixedClock::new(NOW));
        let tenants = Arc::new(MemoryTenantRepository::new());
        let equipment = Arc::new(MemoryEquipmentRepository::new());

        let state = AppState::new(
            tenants.clone(),
            equipment.clone(),
            Arc::new(MemoryNotificationStore::new()),
            clock.clone(),
            NotificationSettings::default(),
        );

        let router = equiptrack::http::router(state.clone());

        TestApp {
            router,
            state,
            clock,
            tenants,
            equipment,
        }
    }

    // ------------------------------------------------------------------
    // Fixtures
    // ------------------------------------------------------------------
    pub async fn create_tenant(
        &self,
        tier: Option<SubscriptionTier>,
        status: SubscriptionStatus,
    ) -> Tenant {
        self.create_tenant_with(tier, status, None, 1).await
    }

    pub async fn create_tenant_with(
        &self,
        tier: Option<SubscriptionTier>,
        status: SubscriptionStatus,
        trial_ends_at: Option<OffsetDateTime>,
        members: u32,
    ) -> Tenant {
        let tenant = Tenant {
            id: Uuid::new_v4(),
            name: "Northline Plant Hire".into(),
            subscription_tier: tier,
            subscription_status: status,
            trial_ends_at,
        };
        self.tenants.insert(tenant.clone(), members).await;
        tenant
    }

    pub async fn add_equipment(&self, tenant_id: Uuid, item: Equipment) -> Equipment {
        self.equipment.insert(tenant_id, item.clone()).await;
        item
    }

    // ------------------------------------------------------------------
    // Low-level request helper
    // ------------------------------------------------------------------
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header("host", "localhost");

        for &(key, value) in headers {
            builder = builder.header(key, value);
        }

        let request = if let Some(body) = body {
            builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap()
        } else {
            builder.body(Body::empty()).unwrap()
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot failed");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("failed to collect body")
            .to_bytes();

        TestResponse { status, body_bytes }
    }

    // ------------------------------------------------------------------
    // Convenience HTTP helpers
    // ------------------------------------------------------------------
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Method::GET, path, None, &[]).await
    }

    pub async fn get_as(&self, path: &str, role: &str) -> TestResponse {
        self.request(Method::GET, path, None, &[("x-user-role", role)])
            .await
    }

    pub async fn post(&self, path: &str) -> TestResponse {
        self.request(Method::POST, path, None, &[]).await
    }

    pub async fn post_json(&self, path: &str, body: Value) -> TestResponse {
        self.request(Method::POST, path, Some(body), &[]).await
    }

    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request(Method::DELETE, path, None, &[]).await
    }
}

pub fn equipment(name: &str) -> Equipment {
    Equipment {
        id: Uuid::new_v4(),
        name: name.into(),
        next_maintenance: None,
        certification_required: false,
        certification_expiry: None,
        next_inspection: None,
    }
}
