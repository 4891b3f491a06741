use std::sync::Arc;
use std::time::Duration;

use ::config::HostwareConfig;
use async_trait::async_trait;
use ov_core::types::{EntityKind, RemoteScope};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{VenueSyncError, VenueSyncResult};
use crate::gateway::{DeleteOutcome, RemoteGateway, RemoteRecord};

const PAGE_LIMIT: u32 = 200;

/// Hostware REST client. One instance serves every client; per-client
/// credentials arrive with the `RemoteScope` on each call.
pub struct HostwareClient {
    client: Client,
    config: HostwareConfig,
}

impl HostwareClient {
    pub fn new(config: HostwareConfig) -> VenueSyncResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(VenueSyncError::Http)?;

        Ok(Self { client, config })
    }

    fn collection(kind: EntityKind) -> &'static str {
        match kind {
            EntityKind::Campaign => "campaigns",
            EntityKind::Chat => "chats",
            EntityKind::Member => "members",
            EntityKind::Discount => "discounts",
        }
    }

    fn collection_url(&self, scope: &RemoteScope, kind: EntityKind) -> String {
        format!(
            "{}/v2/venues/{}/{}",
            self.config.base_url,
            scope.venue_code,
            Self::collection(kind)
        )
    }

    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        scope: &RemoteScope,
        url: &str,
    ) -> VenueSyncResult<T> {
        debug!(url = %url, "Making Hostware API request");

        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Token {}", scope.api_key))
            .header("Accept", "application/json")
            .send()
            .await?;

        if response.status() == StatusCode::OK {
            Ok(response.json::<T>().await?)
        } else {
            Err(Self::status_error(response).await)
        }
    }

    async fn status_error(response: reqwest::Response) -> VenueSyncError {
        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(60);
                VenueSyncError::RateLimited {
                    retry_after_seconds: retry_after,
                }
            }
            StatusCode::UNAUTHORIZED => {
                VenueSyncError::Authentication("Invalid Hostware API key".to_string())
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                VenueSyncError::Gateway {
                    status: status.as_u16(),
                    message: body,
                }
            }
        }
    }

    /// Hostware ids are usually strings but older venues return numbers.
    /// Items with neither are dropped rather than failing the listing.
    fn item_to_record(item: Value) -> Option<RemoteRecord> {
        let remote_id = match item.get("id") {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => {
                warn!("Dropping listing item without an id");
                return None;
            }
        };

        Some(RemoteRecord {
            remote_id,
            payload: item,
        })
    }
}

#[async_trait]
impl RemoteGateway for HostwareClient {
    async fn list_records(
        &self,
        scope: &RemoteScope,
        kind: EntityKind,
    ) -> VenueSyncResult<Vec<RemoteRecord>> {
        let base = self.collection_url(scope, kind);
        let mut all_records = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let url = match &cursor {
                Some(token) => format!(
                    "{}?limit={}&cursor={}",
                    base,
                    PAGE_LIMIT,
                    urlencoding::encode(token)
                ),
                None => format!("{}?limit={}", base, PAGE_LIMIT),
            };

            let page: ListPage = self.get(scope, &url).await?;
            all_records.extend(page.items.into_iter().filter_map(Self::item_to_record));
            cursor = page.next_cursor;

            if cursor.is_none() {
                break;
            }
        }

        Ok(all_records)
    }

    async fn push_back_reference(
        &self,
        scope: &RemoteScope,
        kind: EntityKind,
        remote_id: &str,
        local_id: Uuid,
    ) -> VenueSyncResult<()> {
        let url = format!(
            "{}/{}/correlation",
            self.collection_url(scope, kind),
            remote_id
        );
        debug!(url = %url, %local_id, "Writing back correlation id");

        let response = self
            .client
            .put(&url)
            .header("Authorization", format!("Token {}", scope.api_key))
            .json(&json!({ "correlationId": local_id }))
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::status_error(response).await)
        }
    }

    async fn delete_record(
        &self,
        scope: &RemoteScope,
        kind: EntityKind,
        remote_id: &str,
    ) -> VenueSyncResult<DeleteOutcome> {
        let url = format!("{}/{}", self.collection_url(scope, kind), remote_id);
        debug!(url = %url, "Deleting remote record");

        let response = self
            .client
            .delete(&url)
            .header("Authorization", format!("Token {}", scope.api_key))
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(DeleteOutcome::Deleted),
            StatusCode::NOT_FOUND => Ok(DeleteOutcome::NotFound),
            _ => Err(Self::status_error(response).await),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListPage {
    #[serde(default)]
    items: Vec<Value>,
    #[serde(rename = "nextCursor")]
    next_cursor: Option<String>,
}

pub fn create_hostware_client(config: HostwareConfig) -> VenueSyncResult<Arc<dyn RemoteGateway>> {
    Ok(Arc::new(HostwareClient::new(config)?))
}
