use async_trait::async_trait;
use chrono::Utc;
use errors::StorageError;
use ov_core::traits::{ClientDirectory, MirrorStore};
use ov_core::types::{
    ClientId, EntityKind, FieldMap, Metadata, MirrorEntity, NewMirrorEntity, RemoteScope,
};
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

/// PostgreSQL-backed mirror store and client directory.
///
/// One row per mirrored record; the partial unique index on
/// (`client_id`, `kind`, `external_ref`) is the safety net against two
/// writers linking the same remote record.
pub struct PostgresMirrorStore {
    pool: Pool<Postgres>,
}

impl PostgresMirrorStore {
    pub async fn new(connection_url: &str) -> Result<Self, StorageError> {
        let pool = Pool::connect(connection_url).await.map_err(connect_err)?;
        Ok(Self { pool })
    }

    pub async fn initialize_schema(&self) -> Result<(), StorageError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS mirror_entities (
                local_id UUID PRIMARY KEY,
                client_id TEXT NOT NULL,
                kind TEXT NOT NULL,
                external_ref TEXT,
                fields JSONB NOT NULL DEFAULT '{}',
                metadata JSONB NOT NULL DEFAULT '{}',
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(query_err)?;

        // Unlinked rows (external_ref IS NULL) never conflict with each other
        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_mirror_entities_external_ref
             ON mirror_entities (client_id, kind, external_ref)
             WHERE external_ref IS NOT NULL",
        )
        .execute(&self.pool)
        .await
        .map_err(query_err)?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_mirror_entities_client_kind
             ON mirror_entities (client_id, kind)",
        )
        .execute(&self.pool)
        .await
        .map_err(query_err)?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS clients (
                client_id TEXT PRIMARY KEY,
                venue_code TEXT,
                api_key TEXT,
                created_at TIMESTAMPTZ NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(query_err)?;

        tracing::debug!("mirror schema initialized");
        Ok(())
    }

    /// Upsert a client row; `scope` is the Hostware linkage, `None` for
    /// clients that only use the CRUD surface.
    pub async fn register_client(
        &self,
        client_id: &ClientId,
        scope: Option<&RemoteScope>,
    ) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO clients (client_id, venue_code, api_key, created_at)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (client_id) DO UPDATE
             SET venue_code = EXCLUDED.venue_code, api_key = EXCLUDED.api_key",
        )
        .bind(client_id.as_str())
        .bind(scope.map(|s| s.venue_code.as_str()))
        .bind(scope.map(|s| s.api_key.as_str()))
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(query_err)?;

        Ok(())
    }
}

#[async_trait]
impl MirrorStore for PostgresMirrorStore {
    async fn find_by_external_ref(
        &self,
        client_id: &ClientId,
        kind: EntityKind,
        external_ref: &str,
    ) -> Result<Option<MirrorEntity>, StorageError> {
        let row = sqlx::query(
            "SELECT local_id, client_id, kind, external_ref, fields, metadata, created_at, \
             updated_at
             FROM mirror_entities
             WHERE client_id = $1 AND kind = $2 AND external_ref = $3",
        )
        .bind(client_id.as_str())
        .bind(kind.to_string())
        .bind(external_ref)
        .fetch_optional(&self.pool)
        .await
        .map_err(query_err)?;

        row.map(|r| row_to_entity(&r)).transpose()
    }

    async fn insert(&self, draft: NewMirrorEntity) -> Result<MirrorEntity, StorageError> {
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

        sqlx::query(
            "INSERT INTO mirror_entities (local_id, client_id, kind, external_ref, fields, \
             metadata, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7)",
        )
        .bind(entity.local_id)
        .bind(entity.client_id.as_str())
        .bind(entity.kind.to_string())
        .bind(entity.external_ref.as_deref())
        .bind(serde_json::to_value(&entity.fields).map_err(serialize_err)?)
        .bind(serde_json::to_value(&entity.metadata).map_err(serialize_err)?)
        .bind(entity.created_at)
        .execute(&self.pool)
        .await
        .map_err(write_err)?;

        Ok(entity)
    }

    async fn apply_update(
        &self,
        local_id: Uuid,
        fields: FieldMap,
        metadata: Metadata,
    ) -> Result<MirrorEntity, StorageError> {
        let row = sqlx::query(
            "UPDATE mirror_entities
             SET fields = fields || $2,
                 metadata = metadata || $3,
                 updated_at = $4
             WHERE local_id = $1
             RETURNING local_id, client_id, kind, external_ref, fields, metadata, created_at, \
             updated_at",
        )
        .bind(local_id)
        .bind(serde_json::to_value(&fields).map_err(serialize_err)?)
        .bind(serde_json::to_value(&metadata).map_err(serialize_err)?)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(query_err)?;

        match row {
            Some(r) => row_to_entity(&r),
            None => Err(not_found(local_id)),
        }
    }

    async fn get(&self, local_id: Uuid) -> Result<Option<MirrorEntity>, StorageError> {
        let row = sqlx::query(
            "SELECT local_id, client_id, kind, external_ref, fields, metadata, created_at, \
             updated_at
             FROM mirror_entities WHERE local_id = $1",
        )
        .bind(local_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(query_err)?;

        row.map(|r| row_to_entity(&r)).transpose()
    }

    async fn delete(&self, local_id: Uuid) -> Result<(), StorageError> {
        let result = sqlx::query("DELETE FROM mirror_entities WHERE local_id = $1")
            .bind(local_id)
            .execute(&self.pool)
            .await
            .map_err(query_err)?;

        if result.rows_affected() == 0 {
            return Err(not_found(local_id));
        }
        Ok(())
    }
}

#[async_trait]
impl ClientDirectory for PostgresMirrorStore {
    async fn remote_scope(
        &self,
        client_id: &ClientId,
    ) -> Result<Option<RemoteScope>, StorageError> {
        let row = sqlx::query("SELECT venue_code, api_key FROM clients WHERE client_id = $1")
            .bind(client_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(query_err)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let venue_code: Option<String> = row.get("venue_code");
        let api_key: Option<String> = row.get("api_key");
        match (venue_code, api_key) {
            (Some(venue_code), Some(api_key)) => Ok(Some(RemoteScope {
                venue_code,
                api_key,
            })),
            _ => Ok(None),
        }
    }
}

fn row_to_entity(row: &PgRow) -> Result<MirrorEntity, StorageError> {
    let client_id = row
        .get::<String, _>("client_id")
        .parse::<ClientId>()
        .map_err(|e| StorageError::SerializationError {
            reason: format!("Invalid client_id: {e}"),
        })?;
    let kind = row
        .get::<String, _>("kind")
        .parse::<EntityKind>()
        .map_err(|e| StorageError::SerializationError {
            reason: format!("Invalid kind: {e}"),
        })?;

    Ok(MirrorEntity {
        local_id: row.get("local_id"),
        client_id,
        kind,
        external_ref: row.get("external_ref"),
        fields: serde_json::from_value(row.get("fields")).map_err(serialize_err)?,
        metadata: serde_json::from_value(row.get("metadata")).map_err(serialize_err)?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn connect_err(e: sqlx::Error) -> StorageError {
    StorageError::ConnectionError {
        backend: "postgres".to_string(),
        reason: e.to_string(),
    }
}

fn query_err(e: sqlx::Error) -> StorageError {
    StorageError::QueryError {
        backend: "postgres".to_string(),
        reason: e.to_string(),
    }
}

/// Like `query_err`, but surfaces unique-constraint violations distinctly so
/// callers can tell a duplicate link from an outage.
fn write_err(e: sqlx::Error) -> StorageError {
    if e.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
    {
        StorageError::ConstraintViolation {
            backend: "postgres".to_string(),
            detail: e.to_string(),
        }
    } else {
        query_err(e)
    }
}

fn serialize_err(e: serde_json::Error) -> StorageError {
    StorageError::SerializationError {
        reason: e.to_string(),
    }
}

fn not_found(local_id: Uuid) -> StorageError {
    StorageError::NotFound {
        backend: "postgres".to_string(),
        id: local_id.to_string(),
    }
}
