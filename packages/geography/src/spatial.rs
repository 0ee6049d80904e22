//! Point-in-polygon province lookup for geometric attribution.
//!
//! Only used when `matching.geometric_fallback` is enabled, for mountains
//! whose declared province list is missing. Province polygons go into an
//! R-tree keyed by bounding box; candidates are then tested for exact
//! containment.

use geo::{BoundingRect, Contains, MultiPolygon};
use rstar::{AABB, RTree, RTreeObject};
use summit_map_geography_models::{Coordinates, ProvinceId};

use crate::ingest::ProvinceFeature;

/// A province polygon stored in the R-tree.
struct ProvinceEntry {
    id: ProvinceId,
    envelope: AABB<[f64; 2]>,
    polygon: MultiPolygon<f64>,
}

impl RTreeObject for ProvinceEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// R-tree over named province polygons.
pub struct ProvinceLocator {
    tree: RTree<ProvinceEntry>,
}

impl ProvinceLocator {
    /// Builds the locator from province features.
    ///
    /// Features without a usable name or without polygon geometry are left
    /// out, since they cannot receive mountains anyway.
    #[must_use]
    pub fn build(features: &[ProvinceFeature]) -> Self {
        let entries: Vec<ProvinceEntry> = features
            .iter()
            .filter(|f| f.has_usable_name())
            .filter_map(|f| {
                let polygon = f.geometry.clone()?;
                let envelope = compute_envelope(&polygon)?;
                Some(ProvinceEntry {
                    id: f.id,
                    envelope,
                    polygon,
                })
            })
            .collect();

        log::info!("Loaded {} province polygons into spatial index", entries.len());

        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Returns the province containing `point`.
    ///
    /// Provinces should not overlap; if they do, the one earliest in the
    /// collection wins.
    #[must_use]
    pub fn locate(&self, point: Coordinates) -> Option<ProvinceId> {
        let geo_point = geo::Point::new(point.lon, point.lat);
        let query_env = AABB::from_point([point.lon, point.lat]);

        self.tree
            .locate_in_envelope_intersecting(&query_env)
            .filter(|entry| entry.polygon.contains(&geo_point))
            .map(|entry| entry.id)
            .min()
    }

    /// Number of indexed polygons.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Returns `true` if no polygon was indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

/// Computes the bounding box envelope of a [`MultiPolygon`], or `None`
/// for an empty one.
fn compute_envelope(mp: &MultiPolygon<f64>) -> Option<AABB<[f64; 2]>> {
    mp.bounding_rect()
        .map(|rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]))
}
