use std::collections::HashMap;
use std::sync::Arc;

use ov_core::types::{ClientId, EntityKind};
use tokio::sync::RwLock;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::config::{SyncTarget, VenueSyncConfig};
use crate::error::{VenueSyncError, VenueSyncResult};
use crate::reconciler::{Reconciler, SyncReport};

/// Drives periodic reconciliation passes over the configured targets and
/// keeps the latest report per target for inspection.
pub struct SyncScheduler {
    scheduler: JobScheduler,
    reconciler: Arc<Reconciler>,
    last_reports: Arc<RwLock<HashMap<SyncTarget, SyncReport>>>,
}

impl SyncScheduler {
    pub async fn new(reconciler: Reconciler, config: &VenueSyncConfig) -> VenueSyncResult<Self> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| VenueSyncError::Scheduler(e.to_string()))?;

        let reconciler = Arc::new(reconciler);
        let last_reports = Arc::new(RwLock::new(HashMap::new()));

        let expression = cron_expression(config.sync_interval_seconds);
        let targets = config.targets.clone();

        let reconciler_clone = reconciler.clone();
        let reports_clone = last_reports.clone();

        let job = Job::new_async(expression.as_str(), move |_uuid, _lock| {
            let reconciler = reconciler_clone.clone();
            let reports = reports_clone.clone();
            let targets = targets.clone();
            Box::pin(async move {
                for target in &targets {
                    info!(
                        client_id = %target.client_id,
                        kind = %target.kind,
                        "Starting scheduled reconciliation"
                    );
                    match reconciler.reconcile(&target.client_id, target.kind).await {
                        Ok(report) => {
                            info!(
                                created = report.created,
                                updated = report.updated,
                                unchanged = report.unchanged,
                                failed = report.failures.len(),
                                "Scheduled reconciliation completed"
                            );
                            let mut guard = reports.write().await;
                            guard.insert(target.clone(), report);
                        }
                        Err(VenueSyncError::PassInProgress { .. }) => {
                            info!(
                                client_id = %target.client_id,
                                kind = %target.kind,
                                "Pass already running, skipping this tick"
                            );
                        }
                        Err(e) => {
                            error!(error = %e, "Scheduled reconciliation failed");
                        }
                    }
                }
            })
        })
        .map_err(|e| VenueSyncError::Scheduler(e.to_string()))?;

        scheduler
            .add(job)
            .await
            .map_err(|e| VenueSyncError::Scheduler(e.to_string()))?;

        Ok(Self {
            scheduler,
            reconciler,
            last_reports,
        })
    }

    pub async fn start(&self) -> VenueSyncResult<()> {
        self.scheduler
            .start()
            .await
            .map_err(|e| VenueSyncError::Scheduler(e.to_string()))?;
        info!("Reconciliation scheduler started");
        Ok(())
    }

    pub async fn stop(&mut self) -> VenueSyncResult<()> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| VenueSyncError::Scheduler(e.to_string()))?;
        info!("Reconciliation scheduler stopped");
        Ok(())
    }

    /// Run one pass outside the schedule, e.g. from an operator endpoint.
    pub async fn run_now(
        &self,
        client_id: &ClientId,
        kind: EntityKind,
    ) -> VenueSyncResult<SyncReport> {
        let report = self.reconciler.reconcile(client_id, kind).await?;
        let target = SyncTarget {
            client_id: client_id.clone(),
            kind,
        };
        let mut guard = self.last_reports.write().await;
        guard.insert(target, report.clone());
        Ok(report)
    }

    pub async fn last_report(&self, client_id: &ClientId, kind: EntityKind) -> Option<SyncReport> {
        let target = SyncTarget {
            client_id: client_id.clone(),
            kind,
        };
        self.last_reports.read().await.get(&target).cloned()
    }
}

/// Six-field cron (seconds first) firing every N minutes. Sub-minute
/// intervals clamp to one minute.
fn cron_expression(interval_seconds: u64) -> String {
    let minutes = (interval_seconds / 60).max(1);
    format!("0 */{} * * * *", minutes)
}
