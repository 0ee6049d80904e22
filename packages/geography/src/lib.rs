#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Province indexing and mountain-to-province reconciliation.
//!
//! Province polygons and mountain points come from different datasets whose
//! province vocabularies disagree on casing, whitespace, and abbreviation.
//! This crate validates both collections, indexes every province under its
//! primary and alternate names, resolves each mountain's declared province
//! list through a tiered matcher, and classifies the resulting per-province
//! counts into choropleth tiers.

pub mod assign;
pub mod choropleth;
pub mod config;
pub mod dataset;
pub mod index;
pub mod ingest;
pub mod normalize;
pub mod progress;
pub mod spatial;

pub use assign::{AssignmentReport, MatchTier, MountainAssigner};
pub use config::{LabelConfig, MapConfig, MatchingConfig};
pub use dataset::Dataset;
pub use index::{Province, ProvinceIndex};
pub use ingest::ProvinceFeature;

use thiserror::Error;

/// Errors that can occur while parsing data or configuration.
#[derive(Debug, Error)]
pub enum GeographyError {
    /// File read failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// `GeoJSON` parsing failed.
    #[error("GeoJSON error: {0}")]
    Geojson(#[from] geojson::Error),

    /// TOML configuration parsing failed.
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// The input parsed but is not the expected shape.
    #[error("Invalid collection: {message}")]
    InvalidCollection {
        /// Description of what went wrong.
        message: String,
    },
}
