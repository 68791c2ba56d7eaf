// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Origin-wide storage area with cross-tab change events

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::backend::{MemoryStorage, StorageBackend};
use crate::error::Result;

/// Identifies one tab attached to a storage area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TabId(u64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab_{}", self.0)
    }
}

/// Identifies a registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Change notification delivered to tabs other than the writer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    /// Changed key
    pub key: String,
    /// Value before the change
    pub old_value: Option<String>,
    /// Value after the change (`None` when removed)
    pub new_value: Option<String>,
    /// Tab that made the change
    pub source_tab: TabId,
}

/// Storage event listener
pub type StorageListener = Arc<dyn Fn(&StorageEvent) + Send + Sync>;

struct ListenerEntry {
    id: ListenerId,
    tab: TabId,
    listener: StorageListener,
}

/// Storage shared by all tabs of one origin
pub struct StorageArea {
    backend: Arc<dyn StorageBackend>,
    listeners: RwLock<Vec<ListenerEntry>>,
    next_tab: AtomicU64,
    next_listener: AtomicU64,
}

impl StorageArea {
    /// Create an area over the given backend
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend,
            listeners: RwLock::new(Vec::new()),
            next_tab: AtomicU64::new(1),
            next_listener: AtomicU64::new(1),
        }
    }

    /// Create an area backed by memory
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Allocate an identity for a new tab
    pub fn open_tab(&self) -> TabId {
        TabId(self.next_tab.fetch_add(1, Ordering::Relaxed))
    }

    /// Read a value
    pub fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.backend.get_item(key)
    }

    /// Write a value on behalf of `tab`
    pub fn set_item(&self, tab: TabId, key: &str, value: &str) -> Result<()> {
        let old_value = self.backend.get_item(key).ok().flatten();
        self.backend.set_item(key, value)?;

        if old_value.as_deref() != Some(value) {
            self.notify(StorageEvent {
                key: key.to_string(),
                old_value,
                new_value: Some(value.to_string()),
                source_tab: tab,
            });
        }
        Ok(())
    }

    /// Remove a value on behalf of `tab`
    pub fn remove_item(&self, tab: TabId, key: &str) -> Result<()> {
        let old_value = self.backend.get_item(key).ok().flatten();
        self.backend.remove_item(key)?;

        if old_value.is_some() {
            self.notify(StorageEvent {
                key: key.to_string(),
                old_value,
                new_value: None,
                source_tab: tab,
            });
        }
        Ok(())
    }

    /// Register a listener for changes made by other tabs
    pub fn add_listener(&self, tab: TabId, listener: StorageListener) -> ListenerId {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().push(ListenerEntry { id, tab, listener });
        id
    }

    /// Remove a listener
    pub fn remove_listener(&self, id: ListenerId) {
        self.listeners.write().retain(|entry| entry.id != id);
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    fn notify(&self, event: StorageEvent) {
        // Snapshot so listeners can touch the area without deadlocking
        let targets: Vec<StorageListener> = self
            .listeners
            .read()
            .iter()
            .filter(|entry| entry.tab != event.source_tab)
            .map(|entry| entry.listener.clone())
            .collect();

        debug!(
            key = %event.key,
            source = %event.source_tab,
            listeners = targets.len(),
            "Storage changed"
        );

        for listener in targets {
            listener(&event);
        }
    }
}

impl fmt::Debug for StorageArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageArea")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
