//! Assigns mountains to provinces.
//!
//! Each mountain's declared province names are resolved against the
//! [`ProvinceIndex`] in tier order, stopping at the first tier that
//! matches:
//!
//! 1. [`MatchTier::Exact`]: the verbatim name is registered.
//! 2. [`MatchTier::Normalized`]: the trimmed, lowercased name is registered.
//! 3. [`MatchTier::Fuzzy`]: some registered name equals, contains, or is
//!    contained in the normalized name (first in registration order wins).
//!
//! A mountain is associated with a given province at most once, however
//! many of its declared names resolve there. Unresolved names are reported
//! and logged, never fatal.

use std::sync::Arc;

use summit_map_geography_models::{Mountain, MountainFeature, MountainId, MountainRef, ProvinceId};

use crate::config::MatchingConfig;
use crate::index::ProvinceIndex;
use crate::normalize::normalize;
use crate::progress::{NullProgress, ProgressCallback};
use crate::spatial::ProvinceLocator;

/// How a mountain was attributed to a province.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, strum_macros::Display,
)]
#[strum(serialize_all = "snake_case")]
pub enum MatchTier {
    /// Verbatim name match.
    Exact,
    /// Case- and whitespace-insensitive name match.
    Normalized,
    /// Substring match in either direction.
    Fuzzy,
    /// Point-in-polygon containment (no declared province list).
    Geometric,
}

/// One mountain-to-province link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Association {
    /// The mountain.
    pub mountain: MountainId,
    /// The province it was attributed to.
    pub province: ProvinceId,
    /// The declared name that resolved, or `None` for geometric matches.
    pub declared: Option<String>,
    /// Which tier produced the match.
    pub tier: MatchTier,
}

/// A declared province name that matched no province.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmatchedName {
    /// The mountain that declared the name.
    pub mountain: MountainId,
    /// The declared name, verbatim.
    pub declared: String,
}

/// Outcome of one assignment run.
#[derive(Debug, Clone, Default)]
pub struct AssignmentReport {
    /// Every mountain, with its resolved identifier, in input order.
    pub mountains: Vec<MountainRef>,
    /// Every association made, in the order they were made.
    pub associations: Vec<Association>,
    /// Declared names that resolved to nothing.
    pub unmatched: Vec<UnmatchedName>,
    /// Mountains that ended up in no province.
    pub unassociated: Vec<MountainId>,
    /// Number of identifiers synthesized during this run.
    pub ids_assigned: u64,
}

impl AssignmentReport {
    /// Number of associations made with the given tier.
    #[must_use]
    pub fn count_by_tier(&self, tier: MatchTier) -> usize {
        self.associations.iter().filter(|a| a.tier == tier).count()
    }
}

/// Resolves mountains' declared provinces and records the associations in
/// a [`ProvinceIndex`].
pub struct MountainAssigner {
    config: MatchingConfig,
    locator: Option<ProvinceLocator>,
}

impl MountainAssigner {
    /// Creates an assigner. Geometric fallback stays off until a locator is
    /// supplied with [`Self::with_locator`], regardless of `config`.
    #[must_use]
    pub const fn new(config: MatchingConfig) -> Self {
        Self {
            config,
            locator: None,
        }
    }

    /// Supplies the polygon index used for geometric fallback. Only
    /// consulted when `geometric_fallback` is enabled.
    #[must_use]
    pub fn with_locator(mut self, locator: ProvinceLocator) -> Self {
        self.locator = Some(locator);
        self
    }

    /// Assigns every mountain to its provinces.
    ///
    /// Mountains without an identifier get one synthesized from name,
    /// coordinates, and a counter starting at 0 for this batch; the
    /// identifier is written back to the feature so a later run keeps it.
    pub fn assign(
        &self,
        index: &mut ProvinceIndex,
        mountains: &mut [MountainFeature],
    ) -> AssignmentReport {
        self.assign_with_progress(index, mountains, &NullProgress)
    }

    /// Same as [`Self::assign`], reporting one unit of progress per
    /// mountain.
    pub fn assign_with_progress(
        &self,
        index: &mut ProvinceIndex,
        mountains: &mut [MountainFeature],
        progress: &dyn ProgressCallback,
    ) -> AssignmentReport {
        let mut report = AssignmentReport::default();
        let mut counter = 0_u64;

        progress.set_total(mountains.len() as u64);
        progress.set_message("Assigning mountains to provinces".to_string());

        for feature in mountains.iter_mut() {
            if feature.id.is_none() {
                feature.id = Some(MountainId::synthesize(
                    feature.display_name(),
                    feature.coordinates,
                    counter,
                ));
                counter += 1;
            }

            let mountain = Arc::new(resolved_mountain(feature));
            let matched = self.assign_one(index, feature, &mountain, &mut report);

            if matched == 0 {
                log::debug!("Mountain {} is not in any province", mountain.id);
                report.unassociated.push(mountain.id.clone());
            }

            report.mountains.push(mountain);
            progress.inc(1);
        }

        report.ids_assigned = counter;

        log::info!(
            "Assigned {} mountains: {} associations ({} exact, {} normalized, {} fuzzy, {} geometric), {} unmatched names, {} unassociated",
            report.mountains.len(),
            report.associations.len(),
            report.count_by_tier(MatchTier::Exact),
            report.count_by_tier(MatchTier::Normalized),
            report.count_by_tier(MatchTier::Fuzzy),
            report.count_by_tier(MatchTier::Geometric),
            report.unmatched.len(),
            report.unassociated.len(),
        );
        progress.finish(format!(
            "Assigned {} mountains ({} associations)",
            report.mountains.len(),
            report.associations.len()
        ));

        report
    }

    /// Associates one mountain and returns how many provinces it joined.
    fn assign_one(
        &self,
        index: &mut ProvinceIndex,
        feature: &MountainFeature,
        mountain: &MountainRef,
        report: &mut AssignmentReport,
    ) -> usize {
        let mut joined: Vec<ProvinceId> = Vec::new();

        let Some(declared) = &feature.declared_provinces else {
            if let Some(province) = self.locate(feature) {
                if index.associate(province, mountain) {
                    log::debug!("Mountain {} placed in {province} by location", mountain.id);
                    joined.push(province);
                    report.associations.push(Association {
                        mountain: mountain.id.clone(),
                        province,
                        declared: None,
                        tier: MatchTier::Geometric,
                    });
                }
            }
            return joined.len();
        };

        for name in declared {
            let Some((province, tier)) = self.resolve(index, name) else {
                if !normalize(name).is_empty() {
                    log::warn!(
                        "No province matches '{name}' declared by mountain {}",
                        mountain.id
                    );
                    report.unmatched.push(UnmatchedName {
                        mountain: mountain.id.clone(),
                        declared: name.clone(),
                    });
                }
                continue;
            };

            if joined.contains(&province) {
                log::debug!(
                    "Mountain {} already in {province}; ignoring '{name}'",
                    mountain.id
                );
                continue;
            }

            if index.associate(province, mountain) {
                if tier == MatchTier::Fuzzy {
                    log::debug!(
                        "Fuzzy-matched '{name}' of mountain {} to {province}",
                        mountain.id
                    );
                }
                joined.push(province);
                report.associations.push(Association {
                    mountain: mountain.id.clone(),
                    province,
                    declared: Some(name.clone()),
                    tier,
                });
            }
        }

        joined.len()
    }

    /// Resolves one declared name, trying each tier in order.
    #[must_use]
    pub fn resolve(&self, index: &ProvinceIndex, declared: &str) -> Option<(ProvinceId, MatchTier)> {
        let normalized = normalize(declared);
        if normalized.is_empty() {
            return None;
        }

        if let Some(id) = index.resolve_exact(declared) {
            return Some((id, MatchTier::Exact));
        }
        if let Some(id) = index.lookup(&normalized) {
            return Some((id, MatchTier::Normalized));
        }
        if !self.config.fuzzy {
            return None;
        }
        index
            .fuzzy_match(&normalized)
            .map(|id| (id, MatchTier::Fuzzy))
    }

    fn locate(&self, feature: &MountainFeature) -> Option<ProvinceId> {
        if !self.config.geometric_fallback {
            return None;
        }
        self.locator.as_ref()?.locate(feature.coordinates)
    }
}

fn resolved_mountain(feature: &MountainFeature) -> Mountain {
    Mountain {
        id: feature
            .id
            .clone()
            .unwrap_or_else(|| MountainId::new(feature.display_name())),
        name: feature.display_name().to_string(),
        elevation: feature.elevation,
        prominence: feature.prominence,
        declared_provinces: feature.declared_provinces.clone().unwrap_or_default(),
        regions: feature.regions.clone(),
        island_group: feature.island_group.clone(),
        coordinates: feature.coordinates,
    }
}
