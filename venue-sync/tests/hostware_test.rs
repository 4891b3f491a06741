//! Wire-level tests for the Hostware gateway client.

use config::HostwareConfig;
use ov_core::types::{EntityKind, RemoteScope};
use serde_json::json;
use testing::hostware;
use uuid::Uuid;
use venue_sync::VenueSyncError;
use venue_sync::gateway::{DeleteOutcome, RemoteGateway};
use venue_sync::hostware::{HostwareClient, create_hostware_client};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn scope() -> RemoteScope {
    RemoteScope {
        venue_code: "VEN42".to_string(),
        api_key: "key-123".to_string(),
    }
}

fn client(server: &MockServer) -> HostwareClient {
    HostwareClient::new(HostwareConfig {
        base_url: server.uri(),
        timeout_seconds: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn test_list_records_single_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/venues/VEN42/campaigns"))
        .and(query_param("limit", "200"))
        .and(header("Authorization", "Token key-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hostware::list_page(
            vec![hostware::campaign("r1"), hostware::campaign("r2")],
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let records = client(&server)
        .list_records(&scope(), EntityKind::Campaign)
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].remote_id, "r1");
    assert_eq!(records[0].payload["title"], json!("Spring Tasting Menu"));
    assert_eq!(records[1].remote_id, "r2");
}

#[tokio::test]
async fn test_list_records_drains_pagination() {
    let server = MockServer::start().await;

    // The cursored request must win over the catch-all, so mount it first.
    Mock::given(method("GET"))
        .and(path("/v2/venues/VEN42/members"))
        .and(query_param("cursor", "page-2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(hostware::list_page(vec![hostware::member("m2")], None)),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/venues/VEN42/members"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hostware::list_page(
            vec![hostware::member("m1")],
            Some("page-2"),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let records = client(&server)
        .list_records(&scope(), EntityKind::Member)
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].remote_id, "m1");
    assert_eq!(records[1].remote_id, "m2");
}

#[tokio::test]
async fn test_list_records_drops_items_without_ids() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/venues/VEN42/chats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hostware::list_page(
            vec![
                hostware::chat("c1"),
                json!({ "subject": "no id at all" }),
                json!({ "id": 42, "subject": "numeric id" }),
            ],
            None,
        )))
        .mount(&server)
        .await;

    let records = client(&server)
        .list_records(&scope(), EntityKind::Chat)
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].remote_id, "c1");
    assert_eq!(records[1].remote_id, "42");
}

#[tokio::test]
async fn test_rate_limit_maps_to_retryable_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "30"))
        .mount(&server)
        .await;

    let err = client(&server)
        .list_records(&scope(), EntityKind::Chat)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        VenueSyncError::RateLimited {
            retry_after_seconds: 30
        }
    ));
    assert!(err.is_retryable());
    assert_eq!(err.retry_after(), Some(30));
}

#[tokio::test]
async fn test_unauthorized_maps_to_authentication_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let gateway = create_hostware_client(HostwareConfig {
        base_url: server.uri(),
        timeout_seconds: 5,
    })
    .unwrap();

    let err = gateway
        .list_records(&scope(), EntityKind::Campaign)
        .await
        .unwrap_err();

    assert!(matches!(err, VenueSyncError::Authentication(_)));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_server_error_carries_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client(&server)
        .list_records(&scope(), EntityKind::Discount)
        .await
        .unwrap_err();

    match err {
        VenueSyncError::Gateway { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected Gateway error, got {other}"),
    }
}

#[tokio::test]
async fn test_push_back_reference_puts_correlation_id() {
    let server = MockServer::start().await;
    let local_id = Uuid::new_v4();

    Mock::given(method("PUT"))
        .and(path("/v2/venues/VEN42/campaigns/r1/correlation"))
        .and(header("Authorization", "Token key-123"))
        .and(body_json(json!({ "correlationId": local_id })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .push_back_reference(&scope(), EntityKind::Campaign, "r1", local_id)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_push_back_reference_surfaces_rejection() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(409).set_body_string("correlation locked"))
        .mount(&server)
        .await;

    let err = client(&server)
        .push_back_reference(&scope(), EntityKind::Campaign, "r1", Uuid::new_v4())
        .await
        .unwrap_err();

    assert!(matches!(err, VenueSyncError::Gateway { status: 409, .. }));
}

#[tokio::test]
async fn test_delete_record_outcomes() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v2/venues/VEN42/discounts/d1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v2/venues/VEN42/discounts/d2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v2/venues/VEN42/discounts/d3"))
        .respond_with(ResponseTemplate::new(409).set_body_string("open order"))
        .mount(&server)
        .await;

    let client = client(&server);

    let deleted = client
        .delete_record(&scope(), EntityKind::Discount, "d1")
        .await
        .unwrap();
    assert_eq!(deleted, DeleteOutcome::Deleted);

    let absent = client
        .delete_record(&scope(), EntityKind::Discount, "d2")
        .await
        .unwrap();
    assert_eq!(absent, DeleteOutcome::NotFound);

    let err = client
        .delete_record(&scope(), EntityKind::Discount, "d3")
        .await
        .unwrap_err();
    assert!(matches!(err, VenueSyncError::Gateway { status: 409, .. }));
}
