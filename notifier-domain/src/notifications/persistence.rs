use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use notifier_core::config::StorageConfig;
use notifier_core::error::CoreError;
use notifier_core::utils;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::errors::NotificationError;
use super::persistence_iface::ClientStorage;

const DEFAULT_STORAGE_FILE: &str = "client_storage.json";

/// Process-local storage. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryClientStorage {
    items: RwLock<HashMap<String, String>>,
}

impl InMemoryClientStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items<K, V>(items: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            items: RwLock::new(items.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
        }
    }
}

#[async_trait]
impl ClientStorage for InMemoryClientStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, NotificationError> {
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), NotificationError> {
        self.items.write().await.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), NotificationError> {
        self.items.write().await.remove(key);
        Ok(())
    }
}

/// Storage backed by a single JSON object file.
///
/// The file is read lazily on first access and rewritten atomically on every
/// mutation. A missing file is an empty store; an unreadable JSON document is
/// logged and replaced on the next write.
pub struct FileClientStorage {
    path: PathBuf,
    cache: Mutex<Option<BTreeMap<String, String>>>,
}

impl FileClientStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Mutex::new(None),
        }
    }

    /// Uses `config.path`, or `client_storage.json` in the application data directory.
    pub fn from_config(config: &StorageConfig) -> Result<Self, NotificationError> {
        let path = match &config.path {
            Some(path) => path.clone(),
            None => utils::paths::get_app_data_dir()
                .map_err(|e| {
                    NotificationError::storage_error_from_core("from_config", "Cannot resolve data directory", e)
                })?
                .join(DEFAULT_STORAGE_FILE),
        };
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<BTreeMap<String, String>, NotificationError> {
        let path = self.path.clone();
        let content = tokio::task::spawn_blocking(move || match utils::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(CoreError::Filesystem { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        })
        .await
        .map_err(|e| NotificationError::storage_error("load", format!("Storage task failed: {}", e)))?
        .map_err(|e| NotificationError::storage_error_from_core("load", "Failed to read storage file", e))?;

        match content {
            None => {
                info!("Client storage file {:?} not found. Starting empty.", self.path);
                Ok(BTreeMap::new())
            }
            Some(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Some(text) => match serde_json::from_str(&text) {
                Ok(items) => Ok(items),
                Err(e) => {
                    warn!("Client storage file {:?} is not a JSON object ({}). Starting empty.", self.path, e);
                    Ok(BTreeMap::new())
                }
            },
        }
    }

    async fn save(&self, items: &BTreeMap<String, String>) -> Result<(), NotificationError> {
        let content = serde_json::to_string_pretty(items)
            .map_err(|e| NotificationError::InternalError(format!("Storage serialization failed: {}", e)))?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || utils::fs::write_string_atomically(&path, &content))
            .await
            .map_err(|e| NotificationError::storage_error("save", format!("Storage task failed: {}", e)))?
            .map_err(|e| NotificationError::storage_error_from_core("save", "Failed to write storage file", e))?;
        debug!("Client storage saved to {:?} ({} keys)", self.path, items.len());
        Ok(())
    }
}

#[async_trait]
impl ClientStorage for FileClientStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, NotificationError> {
        let mut cache = self.cache.lock().await;
        if cache.is_none() {
            *cache = Some(self.load().await?);
        }
        Ok(cache.as_ref().and_then(|items| items.get(key).cloned()))
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), NotificationError> {
        let mut cache = self.cache.lock().await;
        let mut items = match cache.take() {
            Some(items) => items,
            None => self.load().await?,
        };
        items.insert(key.to_string(), value.to_string());
        let result = self.save(&items).await;
        *cache = Some(items);
        result
    }

    async fn remove_item(&self, key: &str) -> Result<(), NotificationError> {
        let mut cache = self.cache.lock().await;
        let mut items = match cache.take() {
            Some(items) => items,
            None => self.load().await?,
        };
        let result = if items.remove(key).is_some() { self.save(&items).await } else { Ok(()) };
        *cache = Some(items);
        result
    }
}
