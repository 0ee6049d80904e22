//! Validates raw `GeoJSON` features into typed province and mountain
//! features.
//!
//! Province features are always kept (a province without a usable name
//! still renders, it just cannot receive mountains). Mountain features
//! without a usable point location are quarantined, since they can neither
//! render nor fall back to geometric attribution.

use geo::MultiPolygon;
use geojson::{Feature, FeatureCollection, GeoJson};
use serde_json::Value;
use summit_map_geography_models::{
    Coordinates, MountainFeature, MountainId, ProvinceId, UNKNOWN_PROVINCE_NAME,
};

use crate::GeographyError;
use crate::normalize::is_usable;

/// Property holding a province's primary name.
pub const PROVINCE_NAME_FIELD: &str = "name";

/// Property holding a province's alternate (administrative) name.
pub const PROVINCE_ALT_NAME_FIELD: &str = "adm2_en";

/// A validated province polygon feature.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvinceFeature {
    /// Position of the feature in its collection.
    pub id: ProvinceId,
    /// Primary name (`name`), if present and non-blank.
    pub name: Option<String>,
    /// Alternate name (`adm2_en`), if present and non-blank.
    pub alt_name: Option<String>,
    /// Polygon geometry, if the feature has a polygonal one.
    pub geometry: Option<MultiPolygon<f64>>,
}

impl ProvinceFeature {
    /// Creates a province with the given names and no geometry.
    #[must_use]
    pub fn named(id: usize, name: Option<&str>, alt_name: Option<&str>) -> Self {
        Self {
            id: ProvinceId(id),
            name: name.filter(|n| is_usable(n)).map(str::to_string),
            alt_name: alt_name.filter(|n| is_usable(n)).map(str::to_string),
            geometry: None,
        }
    }

    /// Returns the name shown to users: the primary name, then the
    /// alternate name, then a placeholder.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.alt_name.as_deref())
            .unwrap_or(UNKNOWN_PROVINCE_NAME)
    }

    /// Returns the names this province is registered under: the primary
    /// name, plus the alternate name when it differs.
    #[must_use]
    pub fn index_names(&self) -> Vec<&str> {
        let mut names = Vec::with_capacity(2);
        if let Some(name) = self.name.as_deref() {
            names.push(name);
        }
        if let Some(alt) = self.alt_name.as_deref() {
            if Some(alt) != self.name.as_deref() {
                names.push(alt);
            }
        }
        names
    }

    /// Returns `true` if the province has at least one usable name.
    #[must_use]
    pub const fn has_usable_name(&self) -> bool {
        self.name.is_some() || self.alt_name.is_some()
    }
}

/// Why a mountain feature was rejected at ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum QuarantineReason {
    /// The feature has no geometry.
    MissingGeometry,
    /// The geometry is not a `Point`.
    NotAPoint,
    /// The point has fewer than two coordinates or a non-finite one.
    InvalidCoordinates,
}

/// A feature rejected at ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quarantined {
    /// Position of the feature in its collection.
    pub index: usize,
    /// Name property, if the feature had one.
    pub name: Option<String>,
    /// Rejection reason.
    pub reason: QuarantineReason,
}

/// Result of validating a mountain collection.
#[derive(Debug, Clone, Default)]
pub struct MountainIngest {
    /// Features that passed validation, in collection order.
    pub accepted: Vec<MountainFeature>,
    /// Features that were rejected.
    pub quarantined: Vec<Quarantined>,
}

/// Parses `GeoJSON` text that must contain a `FeatureCollection`.
///
/// # Errors
///
/// Returns an error if the text is not valid `GeoJSON` or is not a
/// `FeatureCollection`.
pub fn parse_collection(text: &str) -> Result<FeatureCollection, GeographyError> {
    let geojson: GeoJson = text.parse()?;
    match geojson {
        GeoJson::FeatureCollection(collection) => Ok(collection),
        GeoJson::Feature(_) => Err(GeographyError::InvalidCollection {
            message: "expected a FeatureCollection, found a Feature".to_string(),
        }),
        GeoJson::Geometry(_) => Err(GeographyError::InvalidCollection {
            message: "expected a FeatureCollection, found a Geometry".to_string(),
        }),
    }
}

/// Validates every feature of a province collection.
///
/// Never drops a feature: the output has exactly one entry per input
/// feature, so [`ProvinceId`]s line up with collection positions.
#[must_use]
pub fn province_features(collection: &FeatureCollection) -> Vec<ProvinceFeature> {
    collection
        .features
        .iter()
        .enumerate()
        .map(|(index, feature)| province_feature(index, feature))
        .collect()
}

fn province_feature(index: usize, feature: &Feature) -> ProvinceFeature {
    let name = string_property(feature, PROVINCE_NAME_FIELD);
    let alt_name = string_property(feature, PROVINCE_ALT_NAME_FIELD);

    if name.is_none() && alt_name.is_none() {
        log::debug!("Province feature {index} has no usable name; it will not receive mountains");
    }

    let geometry = feature.geometry.as_ref().and_then(|geom| {
        let converted: Option<geo::Geometry<f64>> = geom.clone().try_into().ok();
        match converted {
            Some(geo::Geometry::MultiPolygon(mp)) => Some(mp),
            Some(geo::Geometry::Polygon(p)) => Some(MultiPolygon(vec![p])),
            _ => {
                log::debug!("Province feature {index} has non-polygonal geometry");
                None
            }
        }
    });

    ProvinceFeature {
        id: ProvinceId(index),
        name,
        alt_name,
        geometry,
    }
}

/// Validates every feature of a mountain collection, quarantining those
/// without a usable point location.
#[must_use]
pub fn mountain_features(collection: &FeatureCollection) -> MountainIngest {
    let mut ingest = MountainIngest::default();

    for (index, feature) in collection.features.iter().enumerate() {
        match mountain_feature(feature) {
            Ok(mountain) => ingest.accepted.push(mountain),
            Err(reason) => {
                let name = string_property(feature, "name");
                log::warn!(
                    "Quarantined mountain feature {index} ({}): {reason}",
                    name.as_deref().unwrap_or("unnamed")
                );
                ingest.quarantined.push(Quarantined {
                    index,
                    name,
                    reason,
                });
            }
        }
    }

    ingest
}

fn mountain_feature(feature: &Feature) -> Result<MountainFeature, QuarantineReason> {
    let coordinates = point_coordinates(feature)?;

    let elevation = number_property(feature, "elevation").or_else(|| number_property(feature, "elev"));

    Ok(MountainFeature {
        id: string_property(feature, "id").map(MountainId::new),
        name: string_property(feature, "name"),
        elevation,
        prominence: number_property(feature, "prom"),
        declared_provinces: property(feature, "prov")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            }),
        regions: string_list_property(feature, "region"),
        island_group: string_property(feature, "isl_grp"),
        alt_names: string_list_property(feature, "alt_names"),
        coordinates,
    })
}

fn point_coordinates(feature: &Feature) -> Result<Coordinates, QuarantineReason> {
    let geometry = feature
        .geometry
        .as_ref()
        .ok_or(QuarantineReason::MissingGeometry)?;

    let geojson::Value::Point(position) = &geometry.value else {
        return Err(QuarantineReason::NotAPoint);
    };

    match (position.first(), position.get(1)) {
        (Some(&lon), Some(&lat)) if lon.is_finite() && lat.is_finite() => {
            Ok(Coordinates::new(lon, lat))
        }
        _ => Err(QuarantineReason::InvalidCoordinates),
    }
}

fn property<'a>(feature: &'a Feature, key: &str) -> Option<&'a Value> {
    feature.properties.as_ref()?.get(key)
}

/// Extracts a non-blank string property. The value is returned untrimmed.
fn string_property(feature: &Feature, key: &str) -> Option<String> {
    property(feature, key)
        .and_then(Value::as_str)
        .filter(|s| is_usable(s))
        .map(str::to_string)
}

fn number_property(feature: &Feature, key: &str) -> Option<f64> {
    property(feature, key).and_then(Value::as_f64)
}

/// Extracts a property that may be a single string or a list of strings.
fn string_list_property(feature: &Feature, key: &str) -> Vec<String> {
    match property(feature, key) {
        Some(Value::String(s)) if is_usable(s) => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}
