use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::AsyncCommands;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::notification::Notification;
use crate::infra::cache::RedisCache;

/// Persisted notification list per tenant, newest first.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn load(&self, tenant_id: Uuid) -> Result<Vec<Notification>>;
    async fn save(&self, tenant_id: Uuid, notifications: &[Notification]) -> Result<()>;
    async fn ping(&self) -> Result<()>;
}

fn storage_key(tenant_id: Uuid) -> String {
    format!("notifications:{}", tenant_id)
}

/// Stores each tenant's list as one JSON document.
#[derive(Clone)]
pub struct RedisNotificationStore {
    cache: RedisCache,
}

impl RedisNotificationStore {
    pub fn new(cache: RedisCache) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl NotificationStore for RedisNotificationStore {
    async fn load(&self, tenant_id: Uuid) -> Result<Vec<Notification>> {
        let mut conn = self.cache.client().get_multiplexed_async_connection().await?;
        let raw: Option<String> = conn.get(storage_key(tenant_id)).await?;

        match raw {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(notifications) => Ok(notifications),
                Err(err) => {
                    // A corrupt document is discarded rather than wedging the tenant.
                    tracing::warn!(tenant_id = %tenant_id, error = %err, "discarding unreadable notification list");
                    Ok(Vec::new())
                }
            },
            None => Ok(Vec::new()),
        }
    }

    async fn save(&self, tenant_id: Uuid, notifications: &[Notification]) -> Result<()> {
        let payload =
            serde_json::to_string(notifications).context("failed to encode notifications")?;
        let mut conn = self.cache.client().get_multiplexed_async_connection().await?;
        let _: () = conn.set(storage_key(tenant_id), payload).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        self.cache.ping().await
    }
}

#[derive(Default)]
pub struct MemoryNotificationStore {
    lists: RwLock<HashMap<Uuid, Vec<Notification>>>,
}

impl MemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn load(&self, tenant_id: Uuid) -> Result<Vec<Notification>> {
        Ok(self
            .lists
            .read()
            .await
            .get(&tenant_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn save(&self, tenant_id: Uuid, notifications: &[Notification]) -> Result<()> {
        self.lists
            .write()
            .await
            .insert(tenant_id, notifications.to_vec());
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_scoped_by_tenant() {
        let id = Uuid::nil();
        assert_eq!(
            storage_key(id),
            "notifications:00000000-0000-0000-0000-000000000000"
        );
    }

    #[tokio::test]
    async fn memory_store_isolates_tenants() {
        let store = MemoryNotificationStore::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        store.save(a, &[]).await.unwrap();
        assert!(store.load(a).await.unwrap().is_empty());
        assert!(store.load(b).await.unwrap().is_empty());
    }
}
