use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use tokio::sync::{broadcast, Mutex};
use uuid::Uuid;

use crate::app::clock::Clock;
use crate::app::rules;
use crate::domain::equipment::Equipment;
use crate::domain::notification::{NewNotification, Notification, Priority};
use crate::infra::notification_store::NotificationStore;

const TOAST_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy)]
pub struct NotificationSettings {
    /// Repeat alerts for the same equipment and type inside this span are dropped.
    pub dedup_window: Duration,
    /// Maximum stored notifications per tenant.
    pub cap: usize,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            dedup_window: Duration::days(1),
            cap: 100,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AddOptions {
    pub show_toast: bool,
}

impl Default for AddOptions {
    fn default() -> Self {
        Self { show_toast: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastVariant {
    Default,
    Destructive,
}

/// Transient user-facing announcement of a freshly stored notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub tenant_id: Uuid,
    pub title: String,
    pub message: String,
    pub variant: ToastVariant,
}

#[derive(Clone)]
pub struct NotificationService {
    store: Arc<dyn NotificationStore>,
    clock: Arc<dyn Clock>,
    settings: NotificationSettings,
    toasts: broadcast::Sender<Toast>,
    // Serializes load-modify-save cycles against the store.
    write_lock: Arc<Mutex<()>>,
}

impl NotificationService {
    pub fn new(
        store: Arc<dyn NotificationStore>,
        clock: Arc<dyn Clock>,
        settings: NotificationSettings,
    ) -> Self {
        let (toasts, _) = broadcast::channel(TOAST_CHANNEL_CAPACITY);
        Self {
            store,
            clock,
            settings,
            toasts,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn ping(&self) -> Result<()> {
        self.store.ping().await
    }

    pub fn subscribe_toasts(&self) -> broadcast::Receiver<Toast> {
        self.toasts.subscribe()
    }

    /// Run every deadline rule over `equipment` and store the alerts that are
    /// not repeats. Returns only the newly stored notifications.
    pub async fn check_equipment_notifications(
        &self,
        tenant_id: Uuid,
        equipment: &[Equipment],
        options: AddOptions,
    ) -> Result<Vec<Notification>> {
        let now = self.clock.now();
        let candidates = rules::evaluate(equipment, now);
        let candidate_count = candidates.len();

        let _guard = self.write_lock.lock().await;
        let mut list = self.store.load(tenant_id).await?;
        let mut added: Vec<Notification> = candidates
            .into_iter()
            .filter_map(|candidate| self.insert(&mut list, candidate, now))
            .collect();
        // A large batch can push its own earliest entries past the cap.
        added.retain(|notification| list.iter().any(|kept| kept.id == notification.id));

        if !added.is_empty() {
            self.store.save(tenant_id, &list).await?;
        }

        tracing::info!(
            tenant_id = %tenant_id,
            equipment = equipment.len(),
            matched = candidate_count,
            added = added.len(),
            "equipment notification check complete"
        );

        if options.show_toast {
            for notification in &added {
                self.announce(tenant_id, notification);
            }
        }

        Ok(added)
    }

    /// Store one notification unless it repeats a recent one. Returns the
    /// stored record, or `None` when it was suppressed.
    pub async fn add_notification(
        &self,
        tenant_id: Uuid,
        new: NewNotification,
        options: AddOptions,
    ) -> Result<Option<Notification>> {
        let now = self.clock.now();

        let _guard = self.write_lock.lock().await;
        let mut list = self.store.load(tenant_id).await?;
        let Some(notification) = self.insert(&mut list, new, now) else {
            return Ok(None);
        };
        self.store.save(tenant_id, &list).await?;

        if options.show_toast {
            self.announce(tenant_id, &notification);
        }

        Ok(Some(notification))
    }

    pub async fn list(&self, tenant_id: Uuid) -> Result<Vec<Notification>> {
        self.store.load(tenant_id).await
    }

    pub async fn unread_count(&self, tenant_id: Uuid) -> Result<usize> {
        let list = self.store.load(tenant_id).await?;
        Ok(list.iter().filter(|n| !n.read).count())
    }

    pub async fn mark_as_read(&self, tenant_id: Uuid, notification_id: &str) -> Result<bool> {
        self.update(tenant_id, |list| {
            match list.iter_mut().find(|n| n.id == notification_id) {
                Some(notification) => {
                    notification.read = true;
                    true
                }
                None => false,
            }
        })
        .await
    }

    pub async fn mark_all_as_read(&self, tenant_id: Uuid) -> Result<usize> {
        self.update(tenant_id, |list| {
            let mut changed = 0;
            for notification in list.iter_mut().filter(|n| !n.read) {
                notification.read = true;
                changed += 1;
            }
            changed
        })
        .await
    }

    pub async fn delete(&self, tenant_id: Uuid, notification_id: &str) -> Result<bool> {
        self.update(tenant_id, |list| {
            let before = list.len();
            list.retain(|n| n.id != notification_id);
            list.len() != before
        })
        .await
    }

    pub async fn clear_all(&self, tenant_id: Uuid) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.store.save(tenant_id, &[]).await
    }

    async fn update<T>(
        &self,
        tenant_id: Uuid,
        apply: impl FnOnce(&mut Vec<Notification>) -> T,
    ) -> Result<T> {
        let _guard = self.write_lock.lock().await;
        let mut list = self.store.load(tenant_id).await?;
        let result = apply(&mut list);
        self.store.save(tenant_id, &list).await?;
        Ok(result)
    }

    fn insert(
        &self,
        list: &mut Vec<Notification>,
        new: NewNotification,
        now: OffsetDateTime,
    ) -> Option<Notification> {
        if self.is_duplicate(list, &new, now) {
            tracing::debug!(
                equipment_id = ?new.equipment_id,
                notification_type = %new.notification_type,
                "suppressing duplicate notification"
            );
            return None;
        }

        let notification = new.into_notification(now);
        list.insert(0, notification.clone());
        list.truncate(self.settings.cap);
        Some(notification)
    }

    /// Manual notifications without an equipment reference never collide.
    fn is_duplicate(&self, list: &[Notification], new: &NewNotification, now: OffsetDateTime) -> bool {
        let Some(equipment_id) = new.equipment_id else {
            return false;
        };

        list.iter().any(|existing| {
            existing.equipment_id == Some(equipment_id)
                && existing.notification_type == new.notification_type
                && now - existing.timestamp < self.settings.dedup_window
        })
    }

    fn announce(&self, tenant_id: Uuid, notification: &Notification) {
        let variant = if notification.priority == Priority::Critical {
            ToastVariant::Destructive
        } else {
            ToastVariant::Default
        };

        // No subscribers is fine; toasts are fire-and-forget.
        let _ = self.toasts.send(Toast {
            tenant_id,
            title: notification.title.clone(),
            message: notification.message.clone(),
            variant,
        });
    }
}
