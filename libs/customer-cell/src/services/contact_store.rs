use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use shared_config::AppConfig;

use crate::models::ContactPrefill;

/// Key-value store for contact prefill, keyed by device.
///
/// Losing an entry only costs the customer some typing, so implementations
/// log failures instead of returning them.
#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn get(&self, device: &str) -> Option<ContactPrefill>;

    async fn set(&self, device: &str, prefill: ContactPrefill);
}

#[derive(Default)]
pub struct MemoryContactStore {
    entries: RwLock<HashMap<String, ContactPrefill>>,
}

impl MemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContactStore for MemoryContactStore {
    async fn get(&self, device: &str) -> Option<ContactPrefill> {
        self.entries.read().await.get(device).cloned()
    }

    async fn set(&self, device: &str, prefill: ContactPrefill) {
        self.entries.write().await.insert(device.to_string(), prefill);
    }
}

/// JSON file holding every device's prefill; survives restarts.
pub struct FileContactStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileContactStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> HashMap<String, ContactPrefill> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
            Err(e) => {
                warn!("Could not read contact store {}: {}", self.path.display(), e);
                return HashMap::new();
            }
        };

        serde_json::from_slice(&raw).unwrap_or_else(|e| {
            warn!("Contact store {} is corrupt, starting empty: {}", self.path.display(), e);
            HashMap::new()
        })
    }
}

#[async_trait]
impl ContactStore for FileContactStore {
    async fn get(&self, device: &str) -> Option<ContactPrefill> {
        self.load().await.remove(device)
    }

    async fn set(&self, device: &str, prefill: ContactPrefill) {
        let _guard = self.write_lock.lock().await;

        let mut entries = self.load().await;
        entries.insert(device.to_string(), prefill);

        let bytes = match serde_json::to_vec_pretty(&entries) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Could not encode contact store {}: {}", self.path.display(), e);
                return;
            }
        };

        match fs::write(&self.path, bytes).await {
            Ok(()) => debug!("Contact store {} updated", self.path.display()),
            Err(e) => warn!("Could not write contact store {}: {}", self.path.display(), e),
        }
    }
}

pub fn contact_store_for(config: &AppConfig) -> Arc<dyn ContactStore> {
    match &config.contact_store_path {
        Some(path) => Arc::new(FileContactStore::new(path.clone())),
        None => Arc::new(MemoryContactStore::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefill() -> ContactPrefill {
        ContactPrefill {
            phone: Some("11999999999".to_string()),
            name: Some("João Silva".to_string()),
            email: None,
        }
    }

    #[tokio::test]
    async fn test_memory_store_keeps_devices_apart() {
        let store = MemoryContactStore::new();
        assert!(store.get("device-a").await.is_none());

        store.set("device-a", prefill()).await;
        assert_eq!(store.get("device-a").await, Some(prefill()));
        assert!(store.get("device-b").await.is_none());
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contacts.json");

        FileContactStore::new(&path).set("device-a", prefill()).await;

        let reopened = FileContactStore::new(&path);
        assert_eq!(reopened.get("device-a").await, Some(prefill()));
        assert!(reopened.get("device-b").await.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contacts.json");
        std::fs::write(&path, b"not json").unwrap();

        let store = FileContactStore::new(&path);
        assert!(store.get("device-a").await.is_none());

        store.set("device-a", prefill()).await;
        assert_eq!(store.get("device-a").await, Some(prefill()));
    }

    #[tokio::test]
    async fn test_store_selection_follows_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            contact_store_path: Some(dir.path().join("contacts.json")),
            ..AppConfig::default()
        };

        let store = contact_store_for(&config);
        store.set("device-a", prefill()).await;
        assert!(dir.path().join("contacts.json").exists());
    }
}
