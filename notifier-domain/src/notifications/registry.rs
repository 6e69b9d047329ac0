//! The shown-toast registry.
//!
//! A bounded, insertion-ordered set of notification IDs that have already been
//! surfaced as a toast. Persisted in client storage under
//! [`SHOWN_TOAST_IDS_KEY`] as a JSON array so it survives restarts. When the
//! registry is full the oldest IDs are dropped first; a notification whose ID
//! has been dropped can be toasted again if the server still reports it.

use std::collections::{HashSet, VecDeque};

use tracing::{debug, warn};

use super::errors::NotificationError;
use super::persistence_iface::{ClientStorage, SHOWN_TOAST_IDS_KEY};
use super::types::{Notification, NotificationId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShownToastRegistry {
    ids: VecDeque<NotificationId>,
    capacity: usize,
}

impl ShownToastRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            ids: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Builds a registry from already known IDs, keeping only the newest `capacity`.
    pub fn with_ids(ids: impl IntoIterator<Item = NotificationId>, capacity: usize) -> Self {
        let mut registry = Self::new(capacity);
        let ids: Vec<NotificationId> = ids.into_iter().collect();
        registry.record(&ids);
        registry
    }

    /// Reads the registry from storage. A missing key yields an empty registry,
    /// and so does a value that is not a JSON array of integers (with a warning).
    pub async fn load(storage: &dyn ClientStorage, capacity: usize) -> Result<Self, NotificationError> {
        let raw = storage.get_item(SHOWN_TOAST_IDS_KEY).await?;
        let ids = match raw {
            None => Vec::new(),
            Some(text) => match serde_json::from_str::<Vec<NotificationId>>(&text) {
                Ok(ids) => ids,
                Err(e) => {
                    warn!("Ignoring malformed '{}' value in client storage: {}", SHOWN_TOAST_IDS_KEY, e);
                    Vec::new()
                }
            },
        };
        Ok(Self::with_ids(ids, capacity))
    }

    pub async fn persist(&self, storage: &dyn ClientStorage) -> Result<(), NotificationError> {
        let json = serde_json::to_string(&self.ids)
            .map_err(|e| NotificationError::InternalError(format!("Registry serialization failed: {}", e)))?;
        storage.set_item(SHOWN_TOAST_IDS_KEY, &json).await?;
        debug!("Persisted {} shown toast IDs", self.ids.len());
        Ok(())
    }

    pub fn contains(&self, id: NotificationId) -> bool {
        self.ids.contains(&id)
    }

    /// Notifications not in the registry, in response order. An ID repeated
    /// inside `notifications` is returned only once.
    pub fn unseen(&self, notifications: &[Notification]) -> Vec<Notification> {
        let mut picked = HashSet::new();
        notifications
            .iter()
            .filter(|n| !self.contains(n.id) && picked.insert(n.id))
            .cloned()
            .collect()
    }

    /// Appends IDs not yet present, then drops the oldest entries beyond capacity.
    pub fn record(&mut self, ids: &[NotificationId]) {
        for &id in ids {
            if !self.contains(id) {
                self.ids.push_back(id);
            }
        }
        while self.ids.len() > self.capacity {
            self.ids.pop_front();
        }
    }

    pub fn ids(&self) -> Vec<NotificationId> {
        self.ids.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
