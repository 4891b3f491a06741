use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{Duration, Utc};

static TEST_COUNTER: AtomicU32 = AtomicU32::new(0);

pub fn unique_id(prefix: &str) -> String {
    let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{}-{}", prefix, id)
}

pub fn unique_client_id() -> String {
    unique_id("test-client")
}

pub fn unique_venue_code() -> String {
    unique_id("VEN")
}

/// RFC 3339 timestamp `days` from now; negative values land in the past.
pub fn days_from_now(days: i64) -> String {
    (Utc::now() + Duration::days(days)).to_rfc3339()
}

/// Canned Hostware payloads shaped like the real listing responses.
pub mod hostware {
    use serde_json::{Value, json};

    pub fn campaign(id: &str) -> Value {
        json!({
            "id": id,
            "title": "Spring Tasting Menu",
            "type": "SMS",
            "sent": false,
            "scheduledDate": "2025-06-01T18:00:00Z",
            "venueId": "v-100",
            "promotion": { "discountCode": "SPRING25" },
        })
    }

    pub fn chat(id: &str) -> Value {
        json!({
            "id": id,
            "subject": "Anniversary dinner booking",
            "state": "OPEN",
            "startedAt": "2025-03-10T09:30:00Z",
            "guestId": "g-55",
            "assignedTo": "staff-7",
        })
    }

    pub fn member(id: &str) -> Value {
        json!({
            "id": id,
            "email": "ada@example.com",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "tier": "GOLD",
            "marketingOptIn": true,
            "joinedAt": "2024-11-05T12:00:00Z",
            "phone": "+44 20 7946 0958",
        })
    }

    pub fn discount(id: &str) -> Value {
        json!({
            "id": id,
            "code": "SPRING25",
            "kind": "PERCENTAGE",
            "amount": 25,
            "active": true,
            "expiresAt": super::days_from_now(30),
            "venueId": "v-100",
        })
    }

    /// One page of a paginated listing response.
    pub fn list_page(items: Vec<Value>, next_cursor: Option<&str>) -> Value {
        json!({
            "items": items,
            "nextCursor": next_cursor,
        })
    }

    /// The payload with one key overridden or added.
    pub fn with_field(mut payload: Value, key: &str, value: Value) -> Value {
        payload[key] = value;
        payload
    }

    /// The payload with one key removed.
    pub fn without_field(mut payload: Value, key: &str) -> Value {
        if let Some(map) = payload.as_object_mut() {
            map.remove(key);
        }
        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unique_id_generation() {
        let id1 = unique_id("test");
        let id2 = unique_id("test");
        assert_ne!(id1, id2);
        assert!(id1.starts_with("test-"));
        assert!(id2.starts_with("test-"));
    }

    #[test]
    fn test_payload_overrides() {
        let payload = hostware::with_field(hostware::campaign("r1"), "sent", json!(true));
        assert_eq!(payload["id"], json!("r1"));
        assert_eq!(payload["sent"], json!(true));

        let stripped = hostware::without_field(payload, "scheduledDate");
        assert!(stripped.get("scheduledDate").is_none());
    }

    #[test]
    fn test_list_page_shape() {
        let page = hostware::list_page(vec![hostware::member("m1")], Some("cursor-2"));
        assert_eq!(page["items"][0]["id"], json!("m1"));
        assert_eq!(page["nextCursor"], json!("cursor-2"));

        let last = hostware::list_page(vec![], None);
        assert!(last["nextCursor"].is_null());
    }
}
