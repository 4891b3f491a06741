use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use ov_core::types::{EntityKind, FieldMap, Metadata};
use serde_json::Value;
use thiserror::Error;

use crate::campaign::CampaignAdapter;
use crate::chat::ChatAdapter;
use crate::discount::DiscountAdapter;
use crate::gateway::RemoteRecord;
use crate::member::MemberAdapter;

/// Projection failures. Missing optional fields and unrecognized enum
/// strings never land here; dates are the one mandatory input.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("Missing mandatory date field '{field}'")]
    MissingDate { field: String },

    #[error("Invalid date in field '{field}': {value}")]
    InvalidDate { field: String, value: String },
}

/// Per-entity-type mapping between the remote payload shape and the local
/// mirror's field set.
pub trait EntityAdapter: Send + Sync {
    fn kind(&self) -> EntityKind;

    /// Extract and normalize the diffable fields. Missing optional fields
    /// resolve to type-appropriate defaults; a missing or unparsable date
    /// is the only failure.
    fn project(&self, record: &RemoteRecord) -> Result<FieldMap, AdapterError>;

    /// Auxiliary keys with no field slot of their own. Only keys present
    /// in the extraction are touched on update; the store merges the rest.
    fn extract_metadata(&self, record: &RemoteRecord) -> Metadata;

    /// The local id the remote record already advertises, if any.
    fn remote_back_reference(&self, record: &RemoteRecord) -> Option<String> {
        record
            .payload
            .get("correlationId")
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

/// Tagged-variant dispatch: one static adapter per mirrored kind.
pub fn adapter_for(kind: EntityKind) -> &'static dyn EntityAdapter {
    match kind {
        EntityKind::Campaign => &CampaignAdapter,
        EntityKind::Chat => &ChatAdapter,
        EntityKind::Member => &MemberAdapter,
        EntityKind::Discount => &DiscountAdapter,
    }
}

pub(crate) fn text(payload: &Value, key: &str) -> String {
    payload
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

pub(crate) fn boolean(payload: &Value, key: &str, default: bool) -> bool {
    payload.get(key).and_then(Value::as_bool).unwrap_or(default)
}

pub(crate) fn integer(payload: &Value, key: &str, default: i64) -> i64 {
    payload.get(key).and_then(Value::as_i64).unwrap_or(default)
}

/// Mandatory date. Absent or null is `MissingDate`; anything present but
/// unparsable is `InvalidDate`.
pub(crate) fn require_date(payload: &Value, key: &str) -> Result<DateTime<Utc>, AdapterError> {
    match payload.get(key) {
        None | Some(Value::Null) => Err(AdapterError::MissingDate {
            field: key.to_string(),
        }),
        Some(Value::String(raw)) => parse_date(raw).ok_or_else(|| AdapterError::InvalidDate {
            field: key.to_string(),
            value: raw.clone(),
        }),
        Some(other) => Err(AdapterError::InvalidDate {
            field: key.to_string(),
            value: other.to_string(),
        }),
    }
}

/// Hostware mixes RFC 3339 timestamps with bare dates; bare dates read as
/// midnight UTC.
fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Copy the listed payload keys into a metadata map under their local
/// names, skipping anything absent or null.
pub(crate) fn copy_keys(payload: &Value, keys: &[(&str, &str)]) -> Metadata {
    let mut metadata = Metadata::new();

    for (remote_key, local_key) in keys {
        if let Some(value) = payload.get(*remote_key) {
            if !value.is_null() {
                metadata.insert((*local_key).to_string(), value.clone());
            }
        }
    }

    metadata
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_defaults_to_empty() {
        let payload = json!({ "title": "Launch", "count": 3 });
        assert_eq!(text(&payload, "title"), "Launch");
        assert_eq!(text(&payload, "missing"), "");
        // non-string values fall back rather than stringify
        assert_eq!(text(&payload, "count"), "");
    }

    #[test]
    fn test_boolean_and_integer_defaults() {
        let payload = json!({ "sent": true, "amount": 25 });
        assert!(boolean(&payload, "sent", false));
        assert!(boolean(&payload, "missing", true));
        assert_eq!(integer(&payload, "amount", 0), 25);
        assert_eq!(integer(&payload, "missing", 0), 0);
    }

    #[test]
    fn test_require_date_rfc3339() {
        let payload = json!({ "scheduledDate": "2025-06-01T18:00:00Z" });
        let parsed = require_date(&payload, "scheduledDate").unwrap();
        assert_eq!(parsed.timestamp(), 1_748_800_800);
    }

    #[test]
    fn test_require_date_bare_date_reads_as_midnight_utc() {
        let payload = json!({ "scheduledDate": "2025-01-01" });
        let parsed = require_date(&payload, "scheduledDate").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_require_date_missing_or_null() {
        let err = require_date(&json!({}), "scheduledDate").unwrap_err();
        assert!(matches!(err, AdapterError::MissingDate { ref field } if field == "scheduledDate"));

        let err = require_date(&json!({ "scheduledDate": null }), "scheduledDate").unwrap_err();
        assert!(matches!(err, AdapterError::MissingDate { .. }));
    }

    #[test]
    fn test_require_date_invalid() {
        let err = require_date(&json!({ "scheduledDate": "soonish" }), "scheduledDate").unwrap_err();
        assert!(matches!(
            err,
            AdapterError::InvalidDate { ref value, .. } if value == "soonish"
        ));

        let err = require_date(&json!({ "scheduledDate": 1735689600 }), "scheduledDate").unwrap_err();
        assert!(matches!(err, AdapterError::InvalidDate { .. }));
    }

    #[test]
    fn test_copy_keys_skips_absent_and_null() {
        let payload = json!({
            "venueId": "v-100",
            "promotion": { "discountCode": "SPRING25" },
            "assignedTo": null,
        });

        let metadata = copy_keys(
            &payload,
            &[
                ("venueId", "venue_id"),
                ("promotion", "promotion"),
                ("assignedTo", "assigned_to"),
                ("guestId", "guest_id"),
            ],
        );

        assert_eq!(metadata.len(), 2);
        assert_eq!(metadata.get("venue_id"), Some(&json!("v-100")));
        assert!(metadata.contains_key("promotion"));
        assert!(!metadata.contains_key("assigned_to"));
        assert!(!metadata.contains_key("guest_id"));
    }

    #[test]
    fn test_adapter_dispatch_covers_every_kind() {
        for kind in [
            EntityKind::Campaign,
            EntityKind::Chat,
            EntityKind::Member,
            EntityKind::Discount,
        ] {
            assert_eq!(adapter_for(kind).kind(), kind);
        }
    }

    #[test]
    fn test_default_back_reference_reads_correlation_id() {
        let adapter = adapter_for(EntityKind::Campaign);

        let linked = RemoteRecord::new("r1", json!({ "correlationId": "abc-123" }));
        assert_eq!(
            adapter.remote_back_reference(&linked),
            Some("abc-123".to_string())
        );

        let unlinked = RemoteRecord::new("r1", json!({}));
        assert_eq!(adapter.remote_back_reference(&unlinked), None);
    }
}
