#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Province and mountain identity, feature, and choropleth types.
//!
//! These types are shared by the reconciliation pipeline (which builds the
//! province index and assigns mountains to provinces) and the interaction
//! layer (which selects provinces and shows their mountains). They carry no
//! geometry beyond a mountain's point location.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Display name used for provinces without a usable name field.
pub const UNKNOWN_PROVINCE_NAME: &str = "Unknown Province";

/// Display name used for mountains without a `name` property.
pub const UNNAMED_MOUNTAIN_NAME: &str = "Unnamed Mountain";

/// Identity of a province within one loaded dataset.
///
/// This is the position of the province feature in its collection, so it is
/// stable for the lifetime of that dataset and meaningless across reloads.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ProvinceId(pub usize);

impl ProvinceId {
    /// Returns the position of the province feature in its collection.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for ProvinceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "province#{}", self.0)
    }
}

/// Stable mountain identifier, used as the key into the climb status store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MountainId(String);

impl MountainId {
    /// Wraps an existing identifier string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Synthesizes an identifier from a mountain's name, coordinates, and
    /// its position in the ingestion batch.
    ///
    /// The counter keeps identifiers unique even when two features share a
    /// name and location.
    #[must_use]
    pub fn synthesize(name: &str, coordinates: Coordinates, counter: u64) -> Self {
        Self(format!(
            "mountain-{name}-{}-{}-{counter}",
            coordinates.lon, coordinates.lat
        ))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MountainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MountainId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for MountainId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A WGS84 longitude/latitude pair, in `GeoJSON` axis order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Longitude in degrees.
    pub lon: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl Coordinates {
    #[must_use]
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// A validated mountain point feature, as produced by ingestion.
///
/// `id` is `None` until the mountain assigner synthesizes one. Features that
/// arrive with an `id` property keep it.
#[derive(Debug, Clone, PartialEq)]
pub struct MountainFeature {
    /// Identifier, if already assigned.
    pub id: Option<MountainId>,
    /// Mountain name.
    pub name: Option<String>,
    /// Elevation in meters (`elevation`, falling back to `elev`).
    pub elevation: Option<f64>,
    /// Topographic prominence in meters (`prom`).
    pub prominence: Option<f64>,
    /// Declared province names (`prov`). `None` when the property is missing
    /// or is not a list.
    pub declared_provinces: Option<Vec<String>>,
    /// Region names (`region`, either a string or a list).
    pub regions: Vec<String>,
    /// Island group (`isl_grp`).
    pub island_group: Option<String>,
    /// Alternate names (`alt_names`).
    pub alt_names: Vec<String>,
    /// Point location.
    pub coordinates: Coordinates,
}

impl MountainFeature {
    /// Creates a feature with only a name, declared provinces, and location.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        declared_provinces: Option<Vec<String>>,
        coordinates: Coordinates,
    ) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            elevation: None,
            prominence: None,
            declared_provinces,
            regions: Vec::new(),
            island_group: None,
            alt_names: Vec::new(),
            coordinates,
        }
    }

    /// Returns the name for display, falling back to a placeholder.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNNAMED_MOUNTAIN_NAME)
    }
}

/// A mountain with its identifier resolved.
///
/// Shared between every province list the mountain belongs to through
/// [`MountainRef`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mountain {
    /// Stable identifier.
    pub id: MountainId,
    /// Name for display.
    pub name: String,
    /// Elevation in meters.
    pub elevation: Option<f64>,
    /// Prominence in meters.
    pub prominence: Option<f64>,
    /// Declared province names, as they appeared in the source data.
    pub declared_provinces: Vec<String>,
    /// Region names.
    pub regions: Vec<String>,
    /// Island group.
    pub island_group: Option<String>,
    /// Point location.
    pub coordinates: Coordinates,
}

/// Shared handle to a resolved mountain.
pub type MountainRef = Arc<Mountain>;

/// Discrete color tier for province choropleth rendering.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChoroplethBucket {
    /// No mountains.
    Empty,
    /// 1-2 mountains.
    Tier1,
    /// 3-4 mountains.
    Tier2,
    /// 5-9 mountains.
    Tier3,
    /// 10-14 mountains.
    Tier4,
    /// 15-19 mountains.
    Tier5,
    /// 20-24 mountains.
    Tier6,
    /// 25 or more mountains.
    Tier7,
}

impl ChoroplethBucket {
    /// Returns the fill color for this tier as a hex string.
    #[must_use]
    pub const fn fill_color(self) -> &'static str {
        match self {
            Self::Empty => "#EAEAEA",
            Self::Tier1 => "#E5F5E0",
            Self::Tier2 => "#C7E9C0",
            Self::Tier3 => "#A1D99B",
            Self::Tier4 => "#74C476",
            Self::Tier5 => "#41AB5D",
            Self::Tier6 => "#238B45",
            Self::Tier7 => "#006D2C",
        }
    }

    /// Returns all variants in ascending order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Empty,
            Self::Tier1,
            Self::Tier2,
            Self::Tier3,
            Self::Tier4,
            Self::Tier5,
            Self::Tier6,
            Self::Tier7,
        ]
    }
}
