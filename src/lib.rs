pub mod app;
pub mod config;
pub mod domain;
pub mod http;
pub mod infra;

use std::sync::Arc;

use crate::app::access::AccessControl;
use crate::app::clock::Clock;
use crate::app::notifications::{NotificationService, NotificationSettings};
use crate::infra::notification_store::NotificationStore;
use crate::infra::repositories::{EquipmentRepository, TenantRepository};

#[derive(Clone)]
pub struct AppState {
    pub tenants: Arc<dyn TenantRepository>,
    pub equipment: Arc<dyn EquipmentRepository>,
    pub access: AccessControl,
    pub notifications: NotificationService,
}

impl AppState {
    pub fn new(
        tenants: Arc<dyn TenantRepository>,
        equipment: Arc<dyn EquipmentRepository>,
        store: Arc<dyn NotificationStore>,
        clock: Arc<dyn Clock>,
        settings: NotificationSettings,
    ) -> Self {
        Self {
            tenants,
            equipment,
            access: AccessControl::new(clock.clone()),
            notifications: NotificationService::new(store, clock, settings),
        }
    }
}
