//! Snapshot persistence for store state.
//!
//! The two stores survive restarts through JSON snapshots written at defined
//! lifecycle points: once loaded at construction, saved after each accepted
//! mutation. The serialization boundary is explicit - stores hand serialized
//! strings to a [`SnapshotStore`] keyed by namespace - so it can be tested
//! independently of the store logic.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

/// Snapshot namespaces. Each store owns exactly one.
pub mod namespaces {
    /// Auth session snapshot: `{user, token, is_authenticated}`.
    pub const AUTH: &str = "auth";

    /// Cart snapshot: `{items, session_id}`.
    pub const CART: &str = "cart";
}

/// Errors that can occur reading or writing snapshots.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),

    /// Namespace is not a valid file stem.
    #[error("invalid namespace: {0}")]
    InvalidNamespace(String),
}

/// Durable key-value storage for serialized store snapshots.
///
/// Namespaces are disjoint; a store never reads another store's snapshot.
pub trait SnapshotStore: Send + Sync {
    /// Load the snapshot for `namespace`, if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot exists but cannot be read.
    fn load(&self, namespace: &str) -> Result<Option<String>, StorageError>;

    /// Replace the snapshot for `namespace`.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written durably.
    fn save(&self, namespace: &str, snapshot: &str) -> Result<(), StorageError>;

    /// Delete the snapshot for `namespace`. Missing snapshots are fine.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing snapshot cannot be deleted.
    fn remove(&self, namespace: &str) -> Result<(), StorageError>;
}

// =============================================================================
// File-backed store
// =============================================================================

/// One JSON file per namespace under a data directory.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// crashed write never leaves a half-written snapshot behind.
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    /// Open (creating if needed) a snapshot directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, namespace: &str) -> Result<PathBuf, StorageError> {
        // Namespaces are fixed constants, but refuse anything path-like anyway.
        if namespace.is_empty()
            || namespace
                .chars()
                .any(|c| !c.is_ascii_alphanumeric() && c != '-' && c != '_')
        {
            return Err(StorageError::InvalidNamespace(namespace.to_string()));
        }
        Ok(self.dir.join(format!("{namespace}.json")))
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self, namespace: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(namespace)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn save(&self, namespace: &str, snapshot: &str) -> Result<(), StorageError> {
        let path = self.path_for(namespace)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, snapshot)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, namespace: &str) -> Result<(), StorageError> {
        let path = self.path_for(namespace)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

// =============================================================================
// In-memory store
// =============================================================================

/// In-memory snapshot store for tests and ephemeral embedders.
#[derive(Default)]
pub struct MemorySnapshotStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySnapshotStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self, namespace: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(namespace)
            .cloned())
    }

    fn save(&self, namespace: &str, snapshot: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(namespace.to_string(), snapshot.to_string());
        Ok(())
    }

    fn remove(&self, namespace: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(namespace);
        Ok(())
    }
}
