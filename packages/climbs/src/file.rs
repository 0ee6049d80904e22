//! Climb status persisted to a JSON file.
//!
//! The file holds a single object mapping mountain identifiers to booleans.
//! Every mutation rewrites it. Through [`ClimbStatusStore`] a failed write
//! is logged and the in-memory state is kept; the `try_` methods report it
//! and roll the change back instead.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use summit_map_geography_models::MountainId;

use crate::memory::MemoryClimbStore;
use crate::{ClimbStatusStore, ClimbStoreError};

/// A climb status store backed by a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileClimbStore {
    path: PathBuf,
    inner: MemoryClimbStore,
}

impl JsonFileClimbStore {
    /// Opens the store at `path`. A missing file yields an empty store; the
    /// file is created on the first mutation.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is not a
    /// JSON object of booleans.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ClimbStoreError> {
        let path = path.into();

        let inner = if path.exists() {
            let text = std::fs::read_to_string(&path)?;
            let entries: BTreeMap<MountainId, bool> = serde_json::from_str(&text)?;
            log::debug!(
                "Loaded {} climb entries from {}",
                entries.len(),
                path.display()
            );
            MemoryClimbStore::from_entries(entries)
        } else {
            log::debug!("No climb file at {}, starting empty", path.display());
            MemoryClimbStore::new()
        };

        Ok(Self { path, inner })
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of mountains currently marked as climbed.
    #[must_use]
    pub fn climbed_total(&self) -> usize {
        self.inner.climbed_total()
    }

    /// Writes the current state to the backing file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self) -> Result<(), ClimbStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(self.inner.entries())?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }

    /// Flips a mountain's status and saves.
    ///
    /// # Errors
    ///
    /// Returns an error if the save fails. The in-memory status is restored
    /// first, so the store still matches the file.
    pub fn try_toggle(&mut self, id: &MountainId) -> Result<bool, ClimbStoreError> {
        let climbed = self.inner.toggle(id);
        if let Err(e) = self.save() {
            self.inner.set(id, !climbed);
            return Err(e);
        }
        Ok(climbed)
    }

    /// Sets a mountain's status and saves.
    ///
    /// # Errors
    ///
    /// Returns an error if the save fails. The in-memory status is restored
    /// first, so the store still matches the file.
    pub fn try_set(&mut self, id: &MountainId, climbed: bool) -> Result<(), ClimbStoreError> {
        let previous = self.inner.get(id);
        self.inner.set(id, climbed);
        if let Err(e) = self.save() {
            self.inner.set(id, previous);
            return Err(e);
        }
        Ok(())
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            log::warn!(
                "Failed to save climb status to {}: {e}",
                self.path.display()
            );
        }
    }
}

impl ClimbStatusStore for JsonFileClimbStore {
    fn get(&self, id: &MountainId) -> bool {
        self.inner.get(id)
    }

    fn toggle(&mut self, id: &MountainId) -> bool {
        let climbed = self.inner.toggle(id);
        self.persist();
        climbed
    }

    fn set(&mut self, id: &MountainId, climbed: bool) {
        self.inner.set(id, climbed);
        self.persist();
    }

    fn reset(&mut self) {
        self.inner.reset();
        self.persist();
    }
}
