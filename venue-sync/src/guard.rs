use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use ov_core::types::{ClientId, EntityKind};

type LeaseKey = (ClientId, EntityKind);

/// Tracks which (client, kind) reconciliation passes are currently running
/// so that overlapping passes never race each other.
#[derive(Clone, Default)]
pub struct PassGuard {
    active: Arc<DashMap<LeaseKey, DateTime<Utc>>>,
}

impl PassGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the lease for a pass. Returns `None` if a pass for the same
    /// client and kind is already in flight.
    pub fn acquire(&self, client_id: &ClientId, kind: EntityKind) -> Option<PassLease> {
        let key = (client_id.clone(), kind);
        match self.active.entry(key.clone()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                slot.insert(Utc::now());
                Some(PassLease {
                    key,
                    registry: Arc::clone(&self.active),
                })
            }
        }
    }

    pub fn is_held(&self, client_id: &ClientId, kind: EntityKind) -> bool {
        self.active.contains_key(&(client_id.clone(), kind))
    }
}

/// Releases the lease when dropped, including on panic or early return.
pub struct PassLease {
    key: LeaseKey,
    registry: Arc<DashMap<LeaseKey, DateTime<Utc>>>,
}

impl Drop for PassLease {
    fn drop(&mut self) {
        self.registry.remove(&self.key);
    }
}
