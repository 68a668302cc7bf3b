use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    MaintenanceDue,
    MaintenanceOverdue,
    CertificationExpiring,
    CertificationExpired,
    InspectionDue,
    InspectionOverdue,
    StatusChange,
    EquipmentAdded,
    EquipmentUpdated,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::MaintenanceDue => "maintenance_due",
            NotificationType::MaintenanceOverdue => "maintenance_overdue",
            NotificationType::CertificationExpiring => "certification_expiring",
            NotificationType::CertificationExpired => "certification_expired",
            NotificationType::InspectionDue => "inspection_due",
            NotificationType::InspectionOverdue => "inspection_overdue",
            NotificationType::StatusChange => "status_change",
            NotificationType::EquipmentAdded => "equipment_added",
            NotificationType::EquipmentUpdated => "equipment_updated",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

/// A stored alert. Field names follow the client record (`equipmentId`,
/// `actionUrl`, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment_name: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
}

/// Notification content before it is stamped with an id and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub priority: Priority,
    #[serde(default)]
    pub equipment_id: Option<Uuid>,
    #[serde(default)]
    pub equipment_name: Option<String>,
    #[serde(default)]
    pub action_url: Option<String>,
}

impl NewNotification {
    pub fn into_notification(self, now: OffsetDateTime) -> Notification {
        Notification {
            id: generate_id(now),
            notification_type: self.notification_type,
            title: self.title,
            message: self.message,
            priority: self.priority,
            equipment_id: self.equipment_id,
            equipment_name: self.equipment_name,
            timestamp: now,
            read: false,
            action_url: self.action_url,
        }
    }
}

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 9;

/// `{unix millis}-{9 random base36 chars}`
pub fn generate_id(now: OffsetDateTime) -> String {
    let millis = now.unix_timestamp_nanos() / 1_000_000;
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("{}-{}", millis, suffix)
}
