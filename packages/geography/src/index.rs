//! Name-to-province lookup tables.
//!
//! Every usable province name (primary and alternate) is registered twice:
//! verbatim, for exact matching, and normalized, for case- and
//! whitespace-insensitive matching. Both names of one polygon point at the
//! same [`Province`] record, so they share one count and one mountain list.
//!
//! Two different provinces whose names normalize to the same key collide;
//! the later registration wins. This is a dataset quality issue and is
//! logged rather than masked.

use std::collections::BTreeMap;

use summit_map_geography_models::{MountainRef, ProvinceId};

use crate::ingest::ProvinceFeature;
use crate::normalize::{loosely_matches, normalize};

/// A province that can receive mountain associations.
#[derive(Debug, Clone, PartialEq)]
pub struct Province {
    /// Identity within the loaded dataset.
    pub id: ProvinceId,
    /// Name shown to users.
    pub display_name: String,
    /// Registered names, primary first.
    pub names: Vec<String>,
    /// Number of mountains associated with this province.
    pub mountain_count: usize,
    /// Associated mountains, in assignment order.
    pub mountains: Vec<MountainRef>,
}

/// Lookup tables from province names to province identities.
#[derive(Debug, Clone, Default)]
pub struct ProvinceIndex {
    provinces: BTreeMap<ProvinceId, Province>,
    /// verbatim name -> province
    exact: BTreeMap<String, ProvinceId>,
    /// normalized name -> province
    normalized: BTreeMap<String, ProvinceId>,
    /// Verbatim names in first-registration order, for the fuzzy scan.
    scan_order: Vec<String>,
    skipped: usize,
}

impl ProvinceIndex {
    /// Builds the index from validated province features.
    ///
    /// Features without a usable name are skipped: they still render, but
    /// cannot receive mountains.
    #[must_use]
    pub fn build(features: &[ProvinceFeature]) -> Self {
        let mut index = Self::default();

        for feature in features {
            let names = feature.index_names();
            if names.is_empty() {
                index.skipped += 1;
                continue;
            }

            for name in &names {
                index.register(name, feature.id);
            }

            index.provinces.insert(
                feature.id,
                Province {
                    id: feature.id,
                    display_name: feature.display_name().to_string(),
                    names: names.iter().map(|n| (*n).to_string()).collect(),
                    mountain_count: 0,
                    mountains: Vec::new(),
                },
            );
        }

        log::info!(
            "Indexed {} provinces under {} names ({} without a usable name)",
            index.provinces.len(),
            index.normalized.len(),
            index.skipped
        );

        index
    }

    fn register(&mut self, name: &str, id: ProvinceId) {
        let key = normalize(name);

        if let Some(previous) = self.normalized.insert(key.clone(), id) {
            if previous != id {
                log::warn!(
                    "Province name '{key}' is shared by {previous} and {id}; {id} takes the mapping"
                );
            }
        }

        if self.exact.insert(name.to_string(), id).is_none() {
            self.scan_order.push(name.to_string());
        }
    }

    /// Looks up a province by an already-normalized name.
    #[must_use]
    pub fn lookup(&self, normalized: &str) -> Option<ProvinceId> {
        self.normalized.get(normalized).copied()
    }

    /// Looks up a province by its verbatim registered name.
    #[must_use]
    pub fn resolve_exact(&self, name: &str) -> Option<ProvinceId> {
        self.exact.get(name).copied()
    }

    /// Scans registered names in registration order and returns the first
    /// province whose normalized name equals, contains, or is contained in
    /// `normalized`.
    ///
    /// When several provinces qualify the earliest registered name wins.
    #[must_use]
    pub fn fuzzy_match(&self, normalized: &str) -> Option<ProvinceId> {
        if normalized.is_empty() {
            return None;
        }

        self.scan_order
            .iter()
            .find(|name| loosely_matches(&normalize(name), normalized))
            .and_then(|name| self.resolve_exact(name))
    }

    /// Returns the province with the given identity, if it is indexed.
    #[must_use]
    pub fn province(&self, id: ProvinceId) -> Option<&Province> {
        self.provinces.get(&id)
    }

    /// Iterates indexed provinces in collection order.
    pub fn provinces(&self) -> impl Iterator<Item = &Province> {
        self.provinces.values()
    }

    /// Iterates `(normalized name, province)` pairs in key order.
    pub fn normalized_names(&self) -> impl Iterator<Item = (&str, ProvinceId)> {
        self.normalized.iter().map(|(name, id)| (name.as_str(), *id))
    }

    /// Returns the mountains attributed to the province known by `name`
    /// (normalized before lookup). Unknown names yield an empty slice.
    #[must_use]
    pub fn mountains_for(&self, name: &str) -> &[MountainRef] {
        self.lookup(&normalize(name))
            .and_then(|id| self.province(id))
            .map(|p| p.mountains.as_slice())
            .unwrap_or_default()
    }

    /// Returns the number of indexed provinces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.provinces.len()
    }

    /// Returns `true` if no province was indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.provinces.is_empty()
    }

    /// Returns the number of features skipped for lack of a usable name.
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.skipped
    }

    /// Sum of mountain counts across all provinces.
    #[must_use]
    pub fn total_associations(&self) -> usize {
        self.provinces.values().map(|p| p.mountain_count).sum()
    }

    /// Records that `mountain` belongs to province `id`.
    ///
    /// Returns `false` if `id` is not indexed.
    pub(crate) fn associate(&mut self, id: ProvinceId, mountain: &MountainRef) -> bool {
        let Some(province) = self.provinces.get_mut(&id) else {
            return false;
        };
        province.mountain_count += 1;
        province.mountains.push(mountain.clone());
        true
    }
}
