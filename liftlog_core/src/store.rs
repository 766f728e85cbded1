//! Concurrent user store with durable snapshotting.
//!
//! The store is a process-wide map from opaque user id to opaque serialized
//! blob, guarded by a reader/writer lock so request handlers never manage
//! locking themselves. Persistence is a single JSON snapshot file, written
//! atomically with file locking.

use crate::{Error, Result};
use fs2::FileExt;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tempfile::NamedTempFile;

/// Thread-safe map of user id to serialized state blob
#[derive(Debug, Default)]
pub struct UserStore {
    inner: RwLock<HashMap<String, String>>,
}

impl UserStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn from_map(map: HashMap<String, String>) -> Self {
        Self {
            inner: RwLock::new(map),
        }
    }

    // Poisoning only signals that another thread panicked mid-access; the
    // map itself is never left torn, so recover the guard.
    fn read_guard(&self) -> RwLockReadGuard<'_, HashMap<String, String>> {
        match self.inner.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, HashMap<String, String>> {
        match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// True iff the key is currently present.
    ///
    /// Takes a shared lock, so concurrent `exists` calls never block each
    /// other.
    pub fn exists(&self, key: &str) -> bool {
        self.read_guard().contains_key(key)
    }

    /// Return a copy of the blob stored for `key`
    pub fn get(&self, key: &str) -> Option<String> {
        self.read_guard().get(key).cloned()
    }

    /// Insert or overwrite the blob for `key`.
    ///
    /// No validation happens here; callers check payload well-formedness
    /// upstream. Whether an unknown key is acceptable is likewise the
    /// caller's authorization decision.
    pub fn store(&self, key: impl Into<String>, value: impl Into<String>) {
        self.write_guard().insert(key.into(), value.into());
    }

    /// Remove `key` if present; removing an absent key is a no-op
    pub fn delete(&self, key: &str) {
        self.write_guard().remove(key);
    }

    /// Number of users currently in the store
    pub fn len(&self) -> usize {
        self.read_guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_guard().is_empty()
    }

    /// Take a consistent copy of the whole map under the read lock.
    ///
    /// The copy is what `save` serializes, so concurrent `store`/`delete`
    /// calls during serialization cannot produce a torn snapshot. A
    /// `BTreeMap` keeps the on-disk key order deterministic.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.read_guard()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Load a store from the snapshot file at `path`.
    ///
    /// Returns `NotFound` if the file does not exist (callers fall back to
    /// an empty store) and `Corrupt` if it exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound(format!(
                "snapshot file {} does not exist",
                path.display()
            )));
        }

        let file = File::open(path)?;

        // Shared lock so a concurrent external reader never observes a
        // half-written file (save holds the exclusive lock while writing).
        file.lock_shared()?;
        let mut contents = String::new();
        let read_result = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read_result?;

        let map: HashMap<String, String> = serde_json::from_str(&contents).map_err(|e| {
            Error::Corrupt(format!(
                "snapshot file {} is malformed: {}",
                path.display(),
                e
            ))
        })?;

        tracing::debug!("Loaded {} users from {:?}", map.len(), path);
        Ok(Self::from_map(map))
    }

    /// Load a store, treating a missing snapshot file as an empty store.
    ///
    /// Any failure other than `NotFound` still propagates: a malformed
    /// snapshot must not silently start the process with empty state.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Ok(store) => Ok(store),
            Err(e) if e.is_not_found() => {
                tracing::info!("No snapshot at {:?}, starting with empty store", path);
                Ok(Self::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Save the full map to the snapshot file at `path`.
    ///
    /// Atomically writes the snapshot by:
    /// 1. Copying the map under the read lock (released before any I/O)
    /// 2. Writing to a temp file in the same directory
    /// 3. Syncing to disk
    /// 4. Renaming over the original
    ///
    /// A failed save leaves the previous snapshot intact.
    pub fn save(&self, path: &Path) -> Result<()> {
        let snapshot = self.snapshot();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "snapshot path missing parent")
        })?)?;

        // Exclusive lock on the temp file to serialize concurrent savers
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(&snapshot)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        // Atomically replace the old snapshot
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved {} users to {:?}", snapshot.len(), path);
        Ok(())
    }
}
