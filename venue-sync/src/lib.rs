//! Reconciliation engine keeping the Ovation mirror in step with Hostware.

pub mod adapter;
pub mod campaign;
pub mod chat;
pub mod config;
pub mod differ;
pub mod discount;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod hostware;
pub mod member;
pub mod reconciler;
pub mod scheduler;

pub use config::{SyncTarget, VenueSyncConfig};
pub use error::{VenueSyncError, VenueSyncResult};
pub use reconciler::{Reconciler, SyncReport};
pub use scheduler::SyncScheduler;
