use ov_core::types::{EntityKind, FieldMap, FieldValue, Metadata};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::adapter::{self, AdapterError, EntityAdapter};
use crate::gateway::RemoteRecord;

/// Lifecycle state of a guest chat thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ChatStatus {
    Open,
    Closed,
    Archived,
}

impl ChatStatus {
    fn from_remote(raw: &str) -> Self {
        match raw.to_ascii_uppercase().as_str() {
            "CLOSED" => Self::Closed,
            "ARCHIVED" => Self::Archived,
            _ => Self::Open,
        }
    }
}

pub struct ChatAdapter;

impl EntityAdapter for ChatAdapter {
    fn kind(&self) -> EntityKind {
        EntityKind::Chat
    }

    fn project(&self, record: &RemoteRecord) -> Result<FieldMap, AdapterError> {
        let payload = &record.payload;

        let status = ChatStatus::from_remote(&adapter::text(payload, "state"));
        let opened_at = adapter::require_date(payload, "startedAt")?;

        let mut fields = FieldMap::new();
        fields.insert(
            "subject".to_string(),
            FieldValue::Text(adapter::text(payload, "subject")),
        );
        fields.insert("status".to_string(), FieldValue::Text(status.to_string()));
        fields.insert("opened_at".to_string(), FieldValue::Date(opened_at));

        Ok(fields)
    }

    fn extract_metadata(&self, record: &RemoteRecord) -> Metadata {
        adapter::copy_keys(
            &record.payload,
            &[("guestId", "guest_id"), ("assignedTo", "assigned_to")],
        )
    }
}
