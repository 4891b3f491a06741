use ov_core::types::{ClientId, EntityKind};
use thiserror::Error;

use crate::adapter::AdapterError;

pub type VenueSyncResult<T> = Result<T, VenueSyncError>;

#[derive(Debug, Error)]
pub enum VenueSyncError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] errors::StorageError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Hostware API error: {status} - {message}")]
    Gateway { status: u16, message: String },

    #[error("Rate limited: retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Projection failed: {0}")]
    Adapter(#[from] AdapterError),

    #[error("A {kind} pass for client {client} is already running")]
    PassInProgress { client: ClientId, kind: EntityKind },

    #[error("Remote deletion of {remote_id} failed: {reason}")]
    DeletionConflict { remote_id: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Scheduler error: {0}")]
    Scheduler(String),
}

impl VenueSyncError {
    /// Failures a later pass can be expected to clear on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::RateLimited { .. } | Self::Storage(_)
        )
    }

    pub fn retry_after(&self) -> Option<u64> {
        if let Self::RateLimited {
            retry_after_seconds,
        } = self
        {
            Some(*retry_after_seconds)
        } else {
            None
        }
    }
}
