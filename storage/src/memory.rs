//! In-memory `MirrorStore` and `ClientDirectory`.
//!
//! Used by tests and local development; semantics match the PostgreSQL
//! implementation, including the uniqueness of linked rows.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use errors::StorageError;
use ov_core::traits::{ClientDirectory, MirrorStore};
use ov_core::types::{
    ClientId, EntityKind, FieldMap, Metadata, MirrorEntity, NewMirrorEntity, RemoteScope,
};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryMirrorStore {
    rows: RwLock<HashMap<Uuid, MirrorEntity>>,
}

impl InMemoryMirrorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows; handy in assertions.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }
}

#[async_trait]
impl MirrorStore for InMemoryMirrorStore {
    async fn find_by_external_ref(
        &self,
        client_id: &ClientId,
        kind: EntityKind,
        external_ref: &str,
    ) -> Result<Option<MirrorEntity>, StorageError> {
        let rows = self.rows.read().await;
        Ok(rows
            .values()
            .find(|e| {
                e.client_id == *client_id
                    && e.kind == kind
                    && e.external_ref.as_deref() == Some(external_ref)
            })
            .cloned())
    }

    async fn insert(&self, draft: NewMirrorEntity) -> Result<MirrorEntity, StorageError> {
        let mut rows = self.rows.write().await;

        if let Some(external_ref) = draft.external_ref.as_deref() {
            let duplicate = rows.values().any(|e| {
                e.client_id == draft.client_id
                    && e.kind == draft.kind
                    && e.external_ref.as_deref() == Some(external_ref)
            });
            if duplicate {
                return Err(StorageError::ConstraintViolation {
                    backend: "memory".to_string(),
                    detail: format!(
                        "duplicate link ({}, {}, {external_ref})",
                        draft.client_id, draft.kind
                    ),
                });
            }
        }

        let now = Utc::now();
        let entity = MirrorEntity {
            local_id: Uuid::new_v4(),
            client_id: draft.client_id,
            kind: draft.kind,
            external_ref: draft.external_ref,
            fields: draft.fields,
            metadata: draft.metadata,
            created_at: now,
            updated_at: Some(now),
        };
        rows.insert(entity.local_id, entity.clone());
        Ok(entity)
    }

    async fn apply_update(
        &self,
        local_id: Uuid,
        fields: FieldMap,
        metadata: Metadata,
    ) -> Result<MirrorEntity, StorageError> {
        let mut rows = self.rows.write().await;
        let entity = rows.get_mut(&local_id).ok_or_else(|| not_found(local_id))?;

        entity.fields.extend(fields);
        entity.metadata.extend(metadata);
        entity.updated_at = Some(Utc::now());
        Ok(entity.clone())
    }

    async fn get(&self, local_id: Uuid) -> Result<Option<MirrorEntity>, StorageError> {
        Ok(self.rows.read().await.get(&local_id).cloned())
    }

    async fn delete(&self, local_id: Uuid) -> Result<(), StorageError> {
        let mut rows = self.rows.write().await;
        rows.remove(&local_id)
            .map(|_| ())
            .ok_or_else(|| not_found(local_id))
    }
}

#[derive(Default)]
pub struct InMemoryClientDirectory {
    scopes: RwLock<HashMap<ClientId, RemoteScope>>,
}

impl InMemoryClientDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn link(&self, client_id: ClientId, scope: RemoteScope) {
        self.scopes.write().await.insert(client_id, scope);
    }

    pub async fn unlink(&self, client_id: &ClientId) {
        self.scopes.write().await.remove(client_id);
    }
}

#[async_trait]
impl ClientDirectory for InMemoryClientDirectory {
    async fn remote_scope(
        &self,
        client_id: &ClientId,
    ) -> Result<Option<RemoteScope>, StorageError> {
        Ok(self.scopes.read().await.get(client_id).cloned())
    }
}

fn not_found(local_id: Uuid) -> StorageError {
    StorageError::NotFound {
        backend: "memory".to_string(),
        id: local_id.to_string(),
    }
}
