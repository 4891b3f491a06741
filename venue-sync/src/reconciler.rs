//! One-directional reconciliation between Hostware and the local mirror.
//!
//! A pass lists one remote collection for one client, classifies every
//! record as create / update / no-op against the mirror, and applies the
//! minimal write for each. Record-level failures are isolated; only
//! configuration and listing failures abort a pass.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use ov_core::traits::{ClientDirectory, MirrorStore};
use ov_core::types::{ClientId, EntityKind, MirrorEntity, NewMirrorEntity, RemoteScope};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::adapter::{EntityAdapter, adapter_for};
use crate::config::VenueSyncConfig;
use crate::differ::diff_fields;
use crate::error::{VenueSyncError, VenueSyncResult};
use crate::gateway::{DeleteOutcome, RemoteGateway, RemoteRecord};
use crate::guard::PassGuard;

pub struct Reconciler {
    config: VenueSyncConfig,
    gateway: Arc<dyn RemoteGateway>,
    store: Arc<dyn MirrorStore>,
    directory: Arc<dyn ClientDirectory>,
    guard: PassGuard,
}

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    pub client_id: ClientId,
    pub kind: EntityKind,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created: u32,
    pub updated: u32,
    pub unchanged: u32,
    pub failures: Vec<RecordFailure>,
}

/// A record the pass skipped. The failing record is identified by its
/// remote id so an operator can find it in Hostware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordFailure {
    pub external_ref: String,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl SyncReport {
    pub fn new(client_id: ClientId, kind: EntityKind) -> Self {
        Self {
            client_id,
            kind,
            started_at: Utc::now(),
            completed_at: None,
            created: 0,
            updated: 0,
            unchanged: 0,
            failures: Vec::new(),
        }
    }

    pub fn complete(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn add_failure(&mut self, external_ref: &str, error: impl ToString) {
        self.failures.push(RecordFailure {
            external_ref: external_ref.to_string(),
            message: error.to_string(),
            at: Utc::now(),
        });
    }

    /// Every remote record the pass classified, including failures.
    pub fn total_seen(&self) -> u32 {
        self.created + self.updated + self.unchanged + self.failures.len() as u32
    }

    pub fn summary(&self) -> String {
        format!(
            "{} sync for {}: {} created, {} updated, {} unchanged, {} failed",
            self.kind,
            self.client_id,
            self.created,
            self.updated,
            self.unchanged,
            self.failures.len()
        )
    }
}

enum RecordClass {
    Created,
    Updated,
    Unchanged,
}

impl Reconciler {
    pub fn new(
        config: VenueSyncConfig,
        gateway: Arc<dyn RemoteGateway>,
        store: Arc<dyn MirrorStore>,
        directory: Arc<dyn ClientDirectory>,
    ) -> Self {
        Self {
            config,
            gateway,
            store,
            directory,
            guard: PassGuard::new(),
        }
    }

    /// Run one pass for one client and entity kind.
    ///
    /// Holds the pass lease for the duration; a concurrent call for the
    /// same (client, kind) gets `PassInProgress` instead of racing.
    #[tracing::instrument(skip(self))]
    pub async fn reconcile(
        &self,
        client_id: &ClientId,
        kind: EntityKind,
    ) -> VenueSyncResult<SyncReport> {
        let Some(_lease) = self.guard.acquire(client_id, kind) else {
            counter!("reconcile.lock.conflicts").increment(1);
            return Err(VenueSyncError::PassInProgress {
                client: client_id.clone(),
                kind,
            });
        };

        counter!("reconcile.passes.total", "kind" => kind.to_string()).increment(1);
        let mut report = SyncReport::new(client_id.clone(), kind);
        info!(dry_run = self.config.dry_run, "Starting reconciliation pass");

        let scope = self.resolve_scope(client_id).await?;

        let records = self.gateway.list_records(&scope, kind).await?;
        info!(count = records.len(), "Fetched remote records");

        let adapter = adapter_for(kind);

        for record in &records {
            match self.apply_record(client_id, kind, adapter, record).await {
                Ok((class, entity)) => {
                    match class {
                        RecordClass::Created => {
                            counter!("reconcile.records.created", "kind" => kind.to_string())
                                .increment(1);
                            report.created += 1;
                            debug!(remote_id = %record.remote_id, "Created mirror record");
                        }
                        RecordClass::Updated => {
                            counter!("reconcile.records.updated", "kind" => kind.to_string())
                                .increment(1);
                            report.updated += 1;
                            debug!(remote_id = %record.remote_id, "Updated mirror record");
                        }
                        RecordClass::Unchanged => {
                            counter!("reconcile.records.unchanged", "kind" => kind.to_string())
                                .increment(1);
                            report.unchanged += 1;
                        }
                    }

                    if let Some(entity) = entity {
                        self.write_back_if_stale(&scope, kind, adapter, record, &entity)
                            .await;
                    }
                }
                Err(error) => {
                    warn!(
                        remote_id = %record.remote_id,
                        error = %error,
                        "Record failed, continuing pass"
                    );
                    counter!("reconcile.records.failed", "kind" => kind.to_string()).increment(1);
                    report.add_failure(&record.remote_id, &error);
                }
            }
        }

        report.complete();
        let elapsed_ms = (Utc::now() - report.started_at).num_milliseconds() as f64;
        histogram!("reconcile.pass.duration_ms", "kind" => kind.to_string()).record(elapsed_ms);
        info!(
            created = report.created,
            updated = report.updated,
            unchanged = report.unchanged,
            failed = report.failures.len(),
            "Reconciliation pass completed"
        );

        Ok(report)
    }

    /// Delete a mirror row and its remote counterpart. Remote goes first:
    /// a remote failure leaves the local row intact so the next pass still
    /// sees a linked record.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, client_id: &ClientId, local_id: Uuid) -> VenueSyncResult<()> {
        let entity = self
            .store
            .get(local_id)
            .await?
            .filter(|entity| entity.client_id == *client_id)
            .ok_or_else(|| {
                VenueSyncError::Storage(errors::StorageError::NotFound {
                    backend: "mirror".to_string(),
                    id: local_id.to_string(),
                })
            })?;

        if let Some(external_ref) = &entity.external_ref {
            let scope = self.resolve_scope(client_id).await?;

            match self
                .gateway
                .delete_record(&scope, entity.kind, external_ref)
                .await
            {
                Ok(DeleteOutcome::Deleted) => {
                    debug!(remote_id = %external_ref, "Deleted remote record");
                }
                Ok(DeleteOutcome::NotFound) => {
                    debug!(remote_id = %external_ref, "Remote record already gone");
                }
                Err(error) => {
                    return Err(VenueSyncError::DeletionConflict {
                        remote_id: external_ref.clone(),
                        reason: error.to_string(),
                    });
                }
            }
        }

        self.store.delete(local_id).await?;
        info!(%local_id, "Deleted mirror record");

        Ok(())
    }

    async fn resolve_scope(&self, client_id: &ClientId) -> VenueSyncResult<RemoteScope> {
        self.directory.remote_scope(client_id).await?.ok_or_else(|| {
            VenueSyncError::Configuration(format!("client {client_id} has no Hostware linkage"))
        })
    }

    /// Classify one remote record against the mirror and apply the minimal
    /// write. Returns the mirror row so the caller can reconcile the
    /// back-reference; `None` in dry-run mode where nothing was written.
    async fn apply_record(
        &self,
        client_id: &ClientId,
        kind: EntityKind,
        adapter: &dyn EntityAdapter,
        record: &RemoteRecord,
    ) -> VenueSyncResult<(RecordClass, Option<MirrorEntity>)> {
        let projected = adapter.project(record)?;

        let existing = self
            .store
            .find_by_external_ref(client_id, kind, &record.remote_id)
            .await?;

        match existing {
            None => {
                if self.config.dry_run {
                    return Ok((RecordClass::Created, None));
                }

                let created = self
                    .store
                    .insert(NewMirrorEntity {
                        client_id: client_id.clone(),
                        kind,
                        external_ref: Some(record.remote_id.clone()),
                        fields: projected,
                        metadata: adapter.extract_metadata(record),
                    })
                    .await?;

                Ok((RecordClass::Created, Some(created)))
            }
            Some(existing) => {
                let delta = diff_fields(&projected, &existing.fields);
                if !delta.changed() {
                    return Ok((RecordClass::Unchanged, Some(existing)));
                }

                if self.config.dry_run {
                    return Ok((RecordClass::Updated, None));
                }

                let updated = self
                    .store
                    .apply_update(
                        existing.local_id,
                        delta.changes,
                        adapter.extract_metadata(record),
                    )
                    .await?;

                Ok((RecordClass::Updated, Some(updated)))
            }
        }
    }

    /// Advertise the mirror row's id to Hostware unless the record already
    /// carries it. Best effort: a failure is counted and logged, never
    /// marks the record as failed.
    async fn write_back_if_stale(
        &self,
        scope: &RemoteScope,
        kind: EntityKind,
        adapter: &dyn EntityAdapter,
        record: &RemoteRecord,
        entity: &MirrorEntity,
    ) {
        if self.config.dry_run {
            return;
        }

        if adapter.remote_back_reference(record) == Some(entity.local_id.to_string()) {
            return;
        }

        if let Err(error) = self
            .gateway
            .push_back_reference(scope, kind, &record.remote_id, entity.local_id)
            .await
        {
            counter!("reconcile.writeback.failures", "kind" => kind.to_string()).increment(1);
            warn!(
                remote_id = %record.remote_id,
                error = %error,
                "Back-reference write failed, will retry next pass"
            );
        }
    }
}
