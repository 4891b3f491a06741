use ov_core::types::{EntityKind, FieldMap, FieldValue, Metadata};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::adapter::{self, AdapterError, EntityAdapter};
use crate::gateway::RemoteRecord;

/// Delivery channel of a guest campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignChannel {
    Sms,
    Email,
    Push,
}

impl CampaignChannel {
    /// Hostware sends a free-text `type`; anything unrecognized maps to
    /// the most common channel rather than failing the record.
    fn from_remote(raw: &str) -> Self {
        match raw.to_ascii_uppercase().as_str() {
            "EMAIL" => Self::Email,
            "PUSH" => Self::Push,
            _ => Self::Sms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignStatus {
    Scheduled,
    Sent,
}

pub struct CampaignAdapter;

impl EntityAdapter for CampaignAdapter {
    fn kind(&self) -> EntityKind {
        EntityKind::Campaign
    }

    fn project(&self, record: &RemoteRecord) -> Result<FieldMap, AdapterError> {
        let payload = &record.payload;

        let channel = CampaignChannel::from_remote(&adapter::text(payload, "type"));
        let status = if adapter::boolean(payload, "sent", false) {
            CampaignStatus::Sent
        } else {
            CampaignStatus::Scheduled
        };
        let scheduled_at = adapter::require_date(payload, "scheduledDate")?;

        let mut fields = FieldMap::new();
        fields.insert(
            "title".to_string(),
            FieldValue::Text(adapter::text(payload, "title")),
        );
        fields.insert("channel".to_string(), FieldValue::Text(channel.to_string()));
        fields.insert("status".to_string(), FieldValue::Text(status.to_string()));
        fields.insert("scheduled_at".to_string(), FieldValue::Date(scheduled_at));

        Ok(fields)
    }

    fn extract_metadata(&self, record: &RemoteRecord) -> Metadata {
        adapter::copy_keys(
            &record.payload,
            &[("venueId", "venue_id"), ("promotion", "promotion")],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(payload: serde_json::Value) -> RemoteRecord {
        RemoteRecord::new("r1", payload)
    }

    #[test]
    fn test_projection_happy_path() {
        let record = record(json!({
            "id": "r1",
            "title": "Spring Tasting Menu",
            "type": "EMAIL",
            "sent": true,
            "scheduledDate": "2025-06-01T18:00:00Z",
        }));

        let fields = CampaignAdapter.project(&record).unwrap();
        assert_eq!(
            fields.get("title"),
            Some(&FieldValue::Text("Spring Tasting Menu".to_string()))
        );
        assert_eq!(
            fields.get("channel"),
            Some(&FieldValue::Text("EMAIL".to_string()))
        );
        assert_eq!(
            fields.get("status"),
            Some(&FieldValue::Text("SENT".to_string()))
        );
        assert!(matches!(fields.get("scheduled_at"), Some(FieldValue::Date(_))));
    }

    #[test]
    fn test_unsent_campaign_is_scheduled() {
        let record = record(json!({
            "type": "SMS",
            "sent": false,
            "scheduledDate": "2025-01-01",
        }));

        let fields = CampaignAdapter.project(&record).unwrap();
        assert_eq!(
            fields.get("status"),
            Some(&FieldValue::Text("SCHEDULED".to_string()))
        );
        assert_eq!(
            fields.get("channel"),
            Some(&FieldValue::Text("SMS".to_string()))
        );
    }

    #[test]
    fn test_unrecognized_type_defaults_to_sms() {
        let record = record(json!({
            "type": "CARRIER_PIGEON",
            "scheduledDate": "2025-01-01",
        }));

        let fields = CampaignAdapter.project(&record).unwrap();
        assert_eq!(
            fields.get("channel"),
            Some(&FieldValue::Text("SMS".to_string()))
        );
    }

    #[test]
    fn test_missing_title_defaults_to_empty() {
        let record = record(json!({ "scheduledDate": "2025-01-01" }));
        let fields = CampaignAdapter.project(&record).unwrap();
        assert_eq!(fields.get("title"), Some(&FieldValue::Text(String::new())));
    }

    #[test]
    fn test_missing_date_is_a_record_error() {
        let record = record(json!({ "title": "No date" }));
        let err = CampaignAdapter.project(&record).unwrap_err();
        assert!(matches!(
            err,
            AdapterError::MissingDate { ref field } if field == "scheduledDate"
        ));
    }

    #[test]
    fn test_metadata_extraction_only_touches_present_keys() {
        let record = record(json!({
            "scheduledDate": "2025-01-01",
            "venueId": "v-100",
        }));

        let metadata = CampaignAdapter.extract_metadata(&record);
        assert_eq!(metadata.len(), 1);
        assert_eq!(metadata.get("venue_id"), Some(&json!("v-100")));
    }

    #[test]
    fn test_channel_wire_roundtrip() {
        assert_eq!(CampaignChannel::Sms.to_string(), "SMS");
        assert_eq!(CampaignChannel::Email.to_string(), "EMAIL");
        let parsed: CampaignChannel = "PUSH".parse().unwrap();
        assert_eq!(parsed, CampaignChannel::Push);
    }
}
