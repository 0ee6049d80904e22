//! In-memory climb status store.

use std::collections::BTreeMap;

use summit_map_geography_models::MountainId;

use crate::ClimbStatusStore;

/// Climb status held in a map, lost when dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryClimbStore {
    climbed: BTreeMap<MountainId, bool>,
}

impl MemoryClimbStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store from previously saved entries.
    #[must_use]
    pub const fn from_entries(climbed: BTreeMap<MountainId, bool>) -> Self {
        Self { climbed }
    }

    /// Every recorded entry, including ones explicitly set to `false`.
    #[must_use]
    pub const fn entries(&self) -> &BTreeMap<MountainId, bool> {
        &self.climbed
    }

    /// Number of mountains currently marked as climbed.
    #[must_use]
    pub fn climbed_total(&self) -> usize {
        self.climbed.values().filter(|c| **c).count()
    }
}

impl ClimbStatusStore for MemoryClimbStore {
    fn get(&self, id: &MountainId) -> bool {
        self.climbed.get(id).copied().unwrap_or(false)
    }

    fn toggle(&mut self, id: &MountainId) -> bool {
        let climbed = !self.get(id);
        self.climbed.insert(id.clone(), climbed);
        climbed
    }

    fn set(&mut self, id: &MountainId, climbed: bool) {
        self.climbed.insert(id.clone(), climbed);
    }

    fn reset(&mut self) {
        self.climbed.clear();
    }
}
