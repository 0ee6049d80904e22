//! One loaded generation of province and mountain data.
//!
//! A [`Dataset`] is built wholesale from two feature collections and is
//! read-only afterwards. Reloading data means building a new one.

use std::collections::BTreeMap;

use geojson::FeatureCollection;
use summit_map_geography_models::{
    ChoroplethBucket, MountainId, MountainRef, ProvinceId, UNKNOWN_PROVINCE_NAME,
};

use crate::GeographyError;
use crate::assign::{AssignmentReport, MountainAssigner};
use crate::choropleth::classify;
use crate::config::MatchingConfig;
use crate::index::ProvinceIndex;
use crate::ingest::{self, ProvinceFeature, Quarantined};
use crate::progress::{NullProgress, ProgressCallback};
use crate::spatial::ProvinceLocator;

/// Property added to every annotated province feature.
pub const MOUNTAIN_COUNT_PROPERTY: &str = "mountainCount";

/// Provinces, mountains, and their associations for one data load.
#[derive(Debug, Clone)]
pub struct Dataset {
    collection: FeatureCollection,
    provinces: Vec<ProvinceFeature>,
    index: ProvinceIndex,
    report: AssignmentReport,
    quarantined: Vec<Quarantined>,
}

impl Default for Dataset {
    fn default() -> Self {
        Self {
            collection: FeatureCollection {
                bbox: None,
                features: Vec::new(),
                foreign_members: None,
            },
            provinces: Vec::new(),
            index: ProvinceIndex::default(),
            report: AssignmentReport::default(),
            quarantined: Vec::new(),
        }
    }
}

impl Dataset {
    /// Builds a dataset from parsed province and mountain collections.
    #[must_use]
    pub fn build(
        provinces: FeatureCollection,
        mountains: &FeatureCollection,
        config: &MatchingConfig,
    ) -> Self {
        Self::build_with_progress(provinces, mountains, config, &NullProgress)
    }

    /// Same as [`Self::build`], reporting assignment progress.
    #[must_use]
    pub fn build_with_progress(
        provinces: FeatureCollection,
        mountains: &FeatureCollection,
        config: &MatchingConfig,
        progress: &dyn ProgressCallback,
    ) -> Self {
        let province_features = ingest::province_features(&provinces);
        let mountain_ingest = ingest::mountain_features(mountains);
        let mut mountain_features = mountain_ingest.accepted;

        let mut index = ProvinceIndex::build(&province_features);

        let mut assigner = MountainAssigner::new(*config);
        if config.geometric_fallback {
            assigner = assigner.with_locator(ProvinceLocator::build(&province_features));
        }

        let report = assigner.assign_with_progress(&mut index, &mut mountain_features, progress);

        log::info!(
            "Built dataset: {} provinces ({} indexed), {} mountains ({} quarantined), {} associations",
            province_features.len(),
            index.len(),
            report.mountains.len(),
            mountain_ingest.quarantined.len(),
            index.total_associations()
        );

        Self {
            collection: provinces,
            provinces: province_features,
            index,
            report,
            quarantined: mountain_ingest.quarantined,
        }
    }

    /// Parses both collections from `GeoJSON` text and builds a dataset.
    ///
    /// # Errors
    ///
    /// Returns an error if either text is not a `GeoJSON` `FeatureCollection`.
    pub fn from_geojson_str(
        provinces: &str,
        mountains: &str,
        config: &MatchingConfig,
    ) -> Result<Self, GeographyError> {
        let provinces = ingest::parse_collection(provinces)?;
        let mountains = ingest::parse_collection(mountains)?;
        Ok(Self::build(provinces, &mountains, config))
    }

    /// The name index, with per-province counts and mountain lists.
    #[must_use]
    pub const fn index(&self) -> &ProvinceIndex {
        &self.index
    }

    /// Outcome of mountain assignment.
    #[must_use]
    pub const fn report(&self) -> &AssignmentReport {
        &self.report
    }

    /// Mountain features rejected at ingestion.
    #[must_use]
    pub fn quarantined(&self) -> &[Quarantined] {
        &self.quarantined
    }

    /// Every province feature, named or not, in collection order.
    #[must_use]
    pub fn provinces(&self) -> &[ProvinceFeature] {
        &self.provinces
    }

    /// Identities of every rendered province, in collection order.
    pub fn province_ids(&self) -> impl Iterator<Item = ProvinceId> + '_ {
        self.provinces.iter().map(|p| p.id)
    }

    /// Returns `true` if `id` names a province feature in this dataset.
    #[must_use]
    pub fn contains(&self, id: ProvinceId) -> bool {
        id.index() < self.provinces.len()
    }

    /// Every mountain that passed ingestion, in input order.
    #[must_use]
    pub fn mountains(&self) -> &[MountainRef] {
        &self.report.mountains
    }

    /// Finds a mountain by identifier.
    #[must_use]
    pub fn mountain(&self, id: &MountainId) -> Option<&MountainRef> {
        self.report.mountains.iter().find(|m| &m.id == id)
    }

    /// Name shown for a province, or a placeholder for unknown ids.
    #[must_use]
    pub fn display_name(&self, id: ProvinceId) -> &str {
        self.provinces
            .get(id.index())
            .map_or(UNKNOWN_PROVINCE_NAME, ProvinceFeature::display_name)
    }

    /// Mountains attributed to a province. Unnamed or unknown provinces
    /// have none.
    #[must_use]
    pub fn mountains_of(&self, id: ProvinceId) -> &[MountainRef] {
        self.index
            .province(id)
            .map(|p| p.mountains.as_slice())
            .unwrap_or_default()
    }

    /// Number of mountains attributed to a province.
    #[must_use]
    pub fn mountain_count(&self, id: ProvinceId) -> usize {
        self.index.province(id).map_or(0, |p| p.mountain_count)
    }

    /// Choropleth tier of a province.
    #[must_use]
    pub fn bucket(&self, id: ProvinceId) -> ChoroplethBucket {
        classify(self.mountain_count(id))
    }

    /// Returns the input province collection with a `mountainCount`
    /// property added to every feature.
    #[must_use]
    pub fn annotated_provinces(&self) -> FeatureCollection {
        let mut annotated = self.collection.clone();

        for (position, feature) in annotated.features.iter_mut().enumerate() {
            let count = self.mountain_count(ProvinceId(position));
            feature
                .properties
                .get_or_insert_with(serde_json::Map::new)
                .insert(MOUNTAIN_COUNT_PROPERTY.to_string(), count.into());
        }

        annotated
    }

    /// Returns the normalized province name to mountain list lookup.
    ///
    /// Both names of a province map to the same list.
    #[must_use]
    pub fn mountains_by_province(&self) -> BTreeMap<String, Vec<MountainRef>> {
        self.index
            .normalized_names()
            .map(|(name, id)| (name.to_string(), self.mountains_of(id).to_vec()))
            .collect()
    }
}
