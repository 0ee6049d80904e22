#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Per-mountain climb status.
//!
//! Climb status is user state keyed by [`MountainId`]. It is independent of
//! which province is selected and survives dataset reloads as long as the
//! mountain identifiers stay stable.

pub mod file;
pub mod memory;

pub use file::JsonFileClimbStore;
pub use memory::MemoryClimbStore;

use summit_map_geography_models::{MountainId, MountainRef};
use thiserror::Error;

/// Errors that can occur while loading or saving climb status.
#[derive(Debug, Error)]
pub enum ClimbStoreError {
    /// File read or write failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The store file is not a JSON object of booleans.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reads and mutates climb status.
///
/// Unknown mountains read as not climbed.
pub trait ClimbStatusStore {
    /// Returns whether the mountain has been climbed.
    fn get(&self, id: &MountainId) -> bool;

    /// Flips the mountain's status and returns the new value.
    fn toggle(&mut self, id: &MountainId) -> bool;

    /// Sets the mountain's status.
    fn set(&mut self, id: &MountainId, climbed: bool);

    /// Marks every mountain as not climbed.
    fn reset(&mut self);
}

/// Counts how many of `mountains` the store reports as climbed.
#[must_use]
pub fn climbed_count(store: &dyn ClimbStatusStore, mountains: &[MountainRef]) -> usize {
    mountains.iter().filter(|m| store.get(&m.id)).count()
}
