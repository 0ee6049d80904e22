#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Map interaction events, viewport commands, and province paint types.
//!
//! The selection state machine consumes [`SelectionEvent`]s and emits
//! [`MapCommand`]s. Commands describe intent ("paint this province as
//! faded", "show these mountains"); the viewport implementation decides how
//! to render them.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};
use summit_map_geography_models::{ChoroplethBucket, MountainId, MountainRef, ProvinceId};

/// A user gesture or lifecycle event delivered to the selection controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionEvent {
    /// The pointer entered a province.
    Hover(ProvinceId),
    /// The pointer left a province.
    Unhover(ProvinceId),
    /// A province was clicked.
    Click(ProvinceId),
    /// The map zoom level changed to the given value.
    ZoomChanged(f64),
    /// The detail panel was closed by the user.
    PanelClosed,
    /// The dataset is being replaced; all derived state is stale.
    DatasetReload,
}

/// Visual state of a province polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case", tag = "type")]
#[strum(serialize_all = "snake_case")]
pub enum ProvinceVisual {
    /// Baseline style with nothing selected.
    Normal,
    /// Baseline style while another province is selected.
    Faded,
    /// Pointer emphasis. `faded_backdrop` is set while another province is
    /// selected, keeping the fill subdued.
    Hovered {
        /// Whether another province is selected.
        faded_backdrop: bool,
    },
    /// The selected province.
    Selected,
}

impl ProvinceVisual {
    /// Resolves paint parameters for this visual state and a province's
    /// choropleth tier.
    #[must_use]
    pub const fn paint(self, bucket: ChoroplethBucket) -> ProvincePaint {
        let fill_color = bucket.fill_color();
        match self {
            Self::Normal => ProvincePaint {
                fill_color,
                weight: 1,
                stroke_color: BASE_STROKE_COLOR,
                dash_array: None,
                fill_opacity: 0.8,
            },
            Self::Faded => ProvincePaint {
                fill_color,
                weight: 1,
                stroke_color: BASE_STROKE_COLOR,
                dash_array: None,
                fill_opacity: 0.3,
            },
            Self::Hovered { faded_backdrop } => ProvincePaint {
                fill_color,
                weight: 3,
                stroke_color: BASE_STROKE_COLOR,
                dash_array: None,
                fill_opacity: if faded_backdrop { 0.5 } else { 0.7 },
            },
            Self::Selected => ProvincePaint {
                fill_color,
                weight: 3,
                stroke_color: SELECTED_STROKE_COLOR,
                dash_array: Some("4, 2"),
                fill_opacity: 0.8,
            },
        }
    }
}

/// Outline color of unselected provinces.
pub const BASE_STROKE_COLOR: &str = "#627BC1";

/// Outline color of the selected province.
pub const SELECTED_STROKE_COLOR: &str = "#ff8787";

/// Concrete paint parameters for a province polygon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvincePaint {
    /// Fill color from the choropleth tier.
    pub fill_color: &'static str,
    /// Outline width in pixels.
    pub weight: u8,
    /// Outline color.
    pub stroke_color: &'static str,
    /// Outline dash pattern, if dashed.
    pub dash_array: Option<&'static str>,
    /// Fill opacity in `[0, 1]`.
    pub fill_opacity: f32,
}

/// A mountain point to render, with its climb status.
#[derive(Debug, Clone, PartialEq)]
pub struct MountainMarker {
    /// The mountain.
    pub mountain: MountainRef,
    /// Whether the user has climbed it.
    pub climbed: bool,
}

/// Contents of the province detail panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvinceSummary {
    /// The selected province.
    pub province: ProvinceId,
    /// Name shown in the panel title.
    pub name: String,
    /// Number of mountains attributed to the province.
    pub mountain_count: usize,
    /// Number of those the user has climbed.
    pub climbed_count: usize,
}

impl ProvinceSummary {
    /// Climbed share as a percentage. A province without mountains reports
    /// zero.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress_percent(&self) -> f64 {
        self.climbed_count as f64 / self.mountain_count.max(1) as f64 * 100.0
    }
}

/// An instruction for the map viewport.
#[derive(Debug, Clone, PartialEq)]
pub enum MapCommand {
    /// Paint a province polygon.
    SetProvinceStyle {
        /// Target province.
        province: ProvinceId,
        /// Visual state.
        visual: ProvinceVisual,
        /// Choropleth tier, for the fill color.
        bucket: ChoroplethBucket,
    },
    /// Raise a province polygon above its neighbours.
    BringToFront(ProvinceId),
    /// Enable or disable a province's informational tooltip.
    SetTooltipEnabled {
        /// Target province.
        province: ProvinceId,
        /// Whether the tooltip shows on hover.
        enabled: bool,
    },
    /// Replace the mountain point layer with these markers.
    ShowMountains(Vec<MountainMarker>),
    /// Remove the mountain point layer.
    HideMountains,
    /// Recolor one visible mountain marker.
    SetMarkerClimbed {
        /// Target mountain.
        mountain: MountainId,
        /// New climb status.
        climbed: bool,
    },
    /// Draw name labels for these mountains.
    ShowLabels(Vec<MountainRef>),
    /// Remove every mountain name label.
    ClearLabels,
    /// Open (or refresh) the detail panel.
    ShowPanel(ProvinceSummary),
    /// Close the detail panel.
    HidePanel,
}
