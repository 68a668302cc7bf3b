use anyhow::Result;
use async_trait::async_trait;
use sqlx::Row;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::equipment::Equipment;
use crate::domain::tenant::{SubscriptionStatus, Tenant};
use crate::domain::tier::SubscriptionTier;
use crate::infra::db::Db;

#[async_trait]
pub trait TenantRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tenant>>;
    async fn count_members(&self, id: Uuid) -> Result<u32>;
    async fn ping(&self) -> Result<()>;
}

#[async_trait]
pub trait EquipmentRepository: Send + Sync {
    async fn list_by_tenant(&self, tenant_id: Uuid) -> Result<Vec<Equipment>>;
    async fn count_by_tenant(&self, tenant_id: Uuid) -> Result<u32>;
}

#[derive(Clone)]
pub struct PgTenantRepository {
    db: Db,
}

impl PgTenantRepository {
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

fn parse_tier(tenant_id: Uuid, raw: Option<String>) -> Option<SubscriptionTier> {
    let raw = raw?;
    match raw.parse() {
        Ok(tier) => Some(tier),
        Err(err) => {
            tracing::warn!(tenant_id = %tenant_id, error = %err, "ignoring unrecognised subscription tier");
            None
        }
    }
}

#[async_trait]
impl TenantRepository for PgTenantRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tenant>> {
        let row = sqlx::query(
            "SELECT id, name, subscription_tier, subscription_status, trial_ends_at \
             FROM tenants \
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|row| {
            let tier: Option<String> = row.get("subscription_tier");
            let status: Option<String> = row.get("subscription_status");
            Tenant {
                id: row.get("id"),
                name: row.get("name"),
                subscription_tier: parse_tier(id, tier),
                subscription_status: status
                    .as_deref()
                    .map(SubscriptionStatus::parse)
                    .unwrap_or(SubscriptionStatus::Unknown),
                trial_ends_at: row.get("trial_ends_at"),
            }
        }))
    }

    async fn count_members(&self, id: Uuid) -> Result<u32> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tenant_members WHERE tenant_id = $1",
        )
        .bind(id)
        .fetch_one(self.db.pool())
        .await?;

        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    async fn ping(&self) -> Result<()> {
        self.db.ping().await
    }
}

#[derive(Clone)]
pub struct PgEquipmentRepository {
    db: Db,
}

impl PgEquipmentRepository {
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EquipmentRepository for PgEquipmentRepository {
    async fn list_by_tenant(&self, tenant_id: Uuid) -> Result<Vec<Equipment>> {
        let rows = sqlx::query(
            "SELECT id, name, next_maintenance, certification_required, \
                    certification_expiry, next_inspection \
             FROM equipment \
             WHERE tenant_id = $1 \
             ORDER BY name",
        )
        .bind(tenant_id)
        .fetch_all(self.db.pool())
        .await?;

        let equipment = rows
            .into_iter()
            .map(|row| Equipment {
                id: row.get("id"),
                name: row.get("name"),
                next_maintenance: row.get("next_maintenance"),
                certification_required: row
                    .get::<Option<bool>, _>("certification_required")
                    .unwrap_or(false),
                certification_expiry: row.get("certification_expiry"),
                next_inspection: row.get("next_inspection"),
            })
            .collect();

        Ok(equipment)
    }

    async fn count_by_tenant(&self, tenant_id: Uuid) -> Result<u32> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM equipment WHERE tenant_id = $1")
            .bind(tenant_id)
            .fetch_one(self.db.pool())
            .await?;

        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }
}

/// In-process tenant table for tests.
#[derive(Default)]
pub struct MemoryTenantRepository {
    tenants: RwLock<HashMap<Uuid, (Tenant, u32)>>,
}

impl MemoryTenantRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, tenant: Tenant, members: u32) {
        self.tenants.write().await.insert(tenant.id, (tenant, members));
    }
}

#[async_trait]
impl TenantRepository for MemoryTenantRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tenant>> {
        Ok(self.tenants.read().await.get(&id).map(|(t, _)| t.clone()))
    }

    async fn count_members(&self, id: Uuid) -> Result<u32> {
        Ok(self.tenants.read().await.get(&id).map(|(_, m)| *m).unwrap_or(0))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryEquipmentRepository {
    equipment: RwLock<HashMap<Uuid, Vec<Equipment>>>,
}

impl MemoryEquipmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, tenant_id: Uuid, item: Equipment) {
        self.equipment
            .write()
            .await
            .entry(tenant_id)
            .or_default()
            .push(item);
    }
}

#[async_trait]
impl EquipmentRepository for MemoryEquipmentRepository {
    async fn list_by_tenant(&self, tenant_id: Uuid) -> Result<Vec<Equipment>> {
        Ok(self
            .equipment
            .read()
            .await
            .get(&tenant_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn count_by_tenant(&self, tenant_id: Uuid) -> Result<u32> {
        let count = self
            .equipment
            .read()
            .await
            .get(&tenant_id)
            .map(|items| items.len())
            .unwrap_or(0);
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }
}
