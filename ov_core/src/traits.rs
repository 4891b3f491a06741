//! Core traits implemented by the storage layer.

use async_trait::async_trait;
use errors::StorageError;
use uuid::Uuid;

use crate::types::{
    ClientId, EntityKind, FieldMap, Metadata, MirrorEntity, NewMirrorEntity, RemoteScope,
};

/// Correlation store for mirrored records.
///
/// One row per (`client_id`, `kind`, `external_ref`); implementations back
/// this with a unique constraint so concurrent writers cannot duplicate a
/// linked record.
#[async_trait]
pub trait MirrorStore: Send + Sync {
    /// Look up the mirror row linked to a remote record.
    async fn find_by_external_ref(
        &self,
        client_id: &ClientId,
        kind: EntityKind,
        external_ref: &str,
    ) -> Result<Option<MirrorEntity>, StorageError>;

    /// Insert a new row. The store assigns `local_id` and `created_at`, and
    /// stamps `updated_at` to match.
    async fn insert(&self, draft: NewMirrorEntity) -> Result<MirrorEntity, StorageError>;

    /// Apply a partial update: entries in `fields` overwrite per key, entries
    /// in `metadata` merge per key, everything else is left alone.
    /// Bumps `updated_at`.
    async fn apply_update(
        &self,
        local_id: Uuid,
        fields: FieldMap,
        metadata: Metadata,
    ) -> Result<MirrorEntity, StorageError>;

    async fn get(&self, local_id: Uuid) -> Result<Option<MirrorEntity>, StorageError>;

    /// Remove a row. `NotFound` when no such row exists.
    async fn delete(&self, local_id: Uuid) -> Result<(), StorageError>;
}

/// Resolves the Hostware linkage of a client.
#[async_trait]
pub trait ClientDirectory: Send + Sync {
    /// `None` when the client has no remote linkage configured.
    async fn remote_scope(&self, client_id: &ClientId)
    -> Result<Option<RemoteScope>, StorageError>;
}
