use ov_core::types::{EntityKind, FieldMap, FieldValue, Metadata};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::adapter::{self, AdapterError, EntityAdapter};
use crate::gateway::RemoteRecord;

/// How a discount is applied at the till.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountKind {
    Percentage,
    FixedAmount,
}

impl DiscountKind {
    fn from_remote(raw: &str) -> Self {
        match raw.to_ascii_uppercase().as_str() {
            "FIXED_AMOUNT" | "FIXED" => Self::FixedAmount,
            _ => Self::Percentage,
        }
    }
}

pub struct DiscountAdapter;

impl EntityAdapter for DiscountAdapter {
    fn kind(&self) -> EntityKind {
        EntityKind::Discount
    }

    fn project(&self, record: &RemoteRecord) -> Result<FieldMap, AdapterError> {
        let payload = &record.payload;

        let kind = DiscountKind::from_remote(&adapter::text(payload, "kind"));
        let expires_at = adapter::require_date(payload, "expiresAt")?;

        let mut fields = FieldMap::new();
        fields.insert(
            "code".to_string(),
            FieldValue::Text(adapter::text(payload, "code")),
        );
        fields.insert("kind".to_string(), FieldValue::Text(kind.to_string()));
        fields.insert(
            "amount".to_string(),
            FieldValue::Integer(adapter::integer(payload, "amount", 0)),
        );
        fields.insert(
            "active".to_string(),
            FieldValue::Boolean(adapter::boolean(payload, "active", true)),
        );
        fields.insert("expires_at".to_string(), FieldValue::Date(expires_at));

        Ok(fields)
    }

    fn extract_metadata(&self, record: &RemoteRecord) -> Metadata {
        adapter::copy_keys(
            &record.payload,
            &[("venueId", "venue_id"), ("campaignId", "campaign_id")],
        )
    }
}
