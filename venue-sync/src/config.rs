use ov_core::types::{ClientId, EntityKind};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Engine configuration: which mirrors to reconcile and how often.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueSyncConfig {
    pub sync_interval_seconds: u64,
    /// Classify and count without writing to either side.
    #[serde(default)]
    pub dry_run: bool,
    /// (client, entity kind) pairs the scheduler reconciles on every tick.
    #[serde(default)]
    pub targets: Vec<SyncTarget>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SyncTarget {
    pub client_id: ClientId,
    pub kind: EntityKind,
}

impl Default for VenueSyncConfig {
    fn default() -> Self {
        Self {
            sync_interval_seconds: 300,
            dry_run: false,
            targets: Vec::new(),
        }
    }
}

impl VenueSyncConfig {
    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = VenueSyncConfig::default();
        assert_eq!(config.sync_interval(), Duration::from_secs(300));
        assert!(!config.dry_run);
        assert!(config.targets.is_empty());
    }

    #[test]
    fn test_deserialize_with_targets() {
        let raw = r#"{
            "sync_interval_seconds": 60,
            "targets": [
                { "client_id": "venue-1", "kind": "campaign" },
                { "client_id": "venue-1", "kind": "member" }
            ]
        }"#;

        let config: VenueSyncConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.sync_interval_seconds, 60);
        assert!(!config.dry_run);
        assert_eq!(config.targets.len(), 2);
        assert_eq!(config.targets[0].kind, EntityKind::Campaign);
        assert_eq!(config.targets[0].client_id.as_str(), "venue-1");
    }
}
