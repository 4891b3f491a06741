use async_trait::async_trait;
use ov_core::types::{EntityKind, RemoteScope};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::VenueSyncResult;

/// One record as the remote system returned it. The payload stays opaque
/// until an entity adapter projects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteRecord {
    pub remote_id: String,
    pub payload: serde_json::Value,
}

impl RemoteRecord {
    pub fn new(remote_id: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            remote_id: remote_id.into(),
            payload,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The remote side no longer has the record; callers treat this the
    /// same as a successful delete.
    NotFound,
}

/// Authenticated access to the external system of record.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// The full collection for this scope and kind. Implementations drain
    /// any pagination before returning; the reconciler never sees pages.
    async fn list_records(
        &self,
        scope: &RemoteScope,
        kind: EntityKind,
    ) -> VenueSyncResult<Vec<RemoteRecord>>;

    /// Advertise the local id to the remote record. Idempotent; safe to
    /// repeat with the same arguments.
    async fn push_back_reference(
        &self,
        scope: &RemoteScope,
        kind: EntityKind,
        remote_id: &str,
        local_id: Uuid,
    ) -> VenueSyncResult<()>;

    async fn delete_record(
        &self,
        scope: &RemoteScope,
        kind: EntityKind,
        remote_id: &str,
    ) -> VenueSyncResult<DeleteOutcome>;
}
