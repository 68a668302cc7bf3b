use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Equipment record as read from the inventory table. Only the fields that
/// drive deadline notifications are carried.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub id: Uuid,
    pub name: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub next_maintenance: Option<OffsetDateTime>,
    #[serde(default)]
    pub certification_required: bool,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub certification_expiry: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub next_inspection: Option<OffsetDateTime>,
}

impl Equipment {
    pub fn detail_url(&self) -> String {
        format!("/equipment/{}", self.id)
    }
}
