use ov_core::types::{EntityKind, FieldMap, FieldValue, Metadata};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::adapter::{self, AdapterError, EntityAdapter};
use crate::gateway::RemoteRecord;

/// Loyalty tier of a venue member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberTier {
    Standard,
    Silver,
    Gold,
    Platinum,
}

impl MemberTier {
    fn from_remote(raw: &str) -> Self {
        match raw.to_ascii_uppercase().as_str() {
            "SILVER" => Self::Silver,
            "GOLD" => Self::Gold,
            "PLATINUM" => Self::Platinum,
            _ => Self::Standard,
        }
    }
}

pub struct MemberAdapter;

impl EntityAdapter for MemberAdapter {
    fn kind(&self) -> EntityKind {
        EntityKind::Member
    }

    fn project(&self, record: &RemoteRecord) -> Result<FieldMap, AdapterError> {
        let payload = &record.payload;

        let tier = MemberTier::from_remote(&adapter::text(payload, "tier"));
        let joined_at = adapter::require_date(payload, "joinedAt")?;

        let mut fields = FieldMap::new();
        fields.insert(
            "email".to_string(),
            FieldValue::Text(adapter::text(payload, "email")),
        );
        fields.insert(
            "first_name".to_string(),
            FieldValue::Text(adapter::text(payload, "firstName")),
        );
        fields.insert(
            "last_name".to_string(),
            FieldValue::Text(adapter::text(payload, "lastName")),
        );
        fields.insert("tier".to_string(), FieldValue::Text(tier.to_string()));
        fields.insert(
            "marketing_opt_in".to_string(),
            FieldValue::Boolean(adapter::boolean(payload, "marketingOptIn", false)),
        );
        fields.insert("joined_at".to_string(), FieldValue::Date(joined_at));

        Ok(fields)
    }

    fn extract_metadata(&self, record: &RemoteRecord) -> Metadata {
        adapter::copy_keys(&record.payload, &[("phone", "phone")])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(payload: serde_json::Value) -> RemoteRecord {
        RemoteRecord::new("m1", payload)
    }

    #[test]
    fn test_projection_happy_path() {
        let record = record(json!({
            "email": "ada@example.com",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "tier": "gold",
            "marketingOptIn": true,
            "joinedAt": "2024-11-05T12:00:00Z",
        }));

        let fields = MemberAdapter.project(&record).unwrap();
        assert_eq!(
            fields.get("email"),
            Some(&FieldValue::Text("ada@example.com".to_string()))
        );
        assert_eq!(
            fields.get("first_name"),
            Some(&FieldValue::Text("Ada".to_string()))
        );
        assert_eq!(
            fields.get("last_name"),
            Some(&FieldValue::Text("Lovelace".to_string()))
        );
        assert_eq!(
            fields.get("tier"),
            Some(&FieldValue::Text("GOLD".to_string()))
        );
        assert_eq!(
            fields.get("marketing_opt_in"),
            Some(&FieldValue::Boolean(true))
        );
        assert!(matches!(fields.get("joined_at"), Some(FieldValue::Date(_))));
    }

    #[test]
    fn test_unknown_tier_defaults_to_standard() {
        let record = record(json!({
            "tier": "diamond",
            "joinedAt": "2024-11-05",
        }));

        let fields = MemberAdapter.project(&record).unwrap();
        assert_eq!(
            fields.get("tier"),
            Some(&FieldValue::Text("STANDARD".to_string()))
        );
    }

    #[test]
    fn test_opt_in_defaults_to_false() {
        let record = record(json!({ "joinedAt": "2024-11-05" }));
        let fields = MemberAdapter.project(&record).unwrap();
        assert_eq!(
            fields.get("marketing_opt_in"),
            Some(&FieldValue::Boolean(false))
        );
    }

    #[test]
    fn test_missing_joined_at_is_rejected() {
        let record = record(json!({ "email": "ada@example.com" }));
        let err = MemberAdapter.project(&record).unwrap_err();
        assert!(matches!(
            err,
            AdapterError::MissingDate { ref field } if field == "joinedAt"
        ));
    }

    #[test]
    fn test_phone_lands_in_metadata() {
        let record = record(json!({
            "joinedAt": "2024-11-05",
            "phone": "+44 20 7946 0958",
        }));

        let metadata = MemberAdapter.extract_metadata(&record);
        assert_eq!(metadata.get("phone"), Some(&json!("+44 20 7946 0958")));
    }
}
