//! The rendering seam.
//!
//! A [`MapViewport`] executes [`MapCommand`]s. [`HeadlessViewport`] keeps
//! the resulting map state in memory, for tests and for tools that want to
//! inspect what a map would show.

use std::collections::{BTreeMap, BTreeSet};

use summit_map_geography_models::{ChoroplethBucket, MountainRef, ProvinceId};
use summit_map_selection_models::{MapCommand, MountainMarker, ProvinceSummary, ProvinceVisual};

/// Something that can render map commands.
pub trait MapViewport {
    /// Current zoom level.
    fn zoom(&self) -> f64;

    /// Executes one command.
    fn apply(&mut self, command: &MapCommand);

    /// Executes commands in order.
    fn apply_all(&mut self, commands: &[MapCommand]) {
        for command in commands {
            self.apply(command);
        }
    }
}

/// In-memory viewport that tracks what a real map would display.
#[derive(Debug, Clone, Default)]
pub struct HeadlessViewport {
    zoom: f64,
    /// Last style applied to each province.
    pub styles: BTreeMap<ProvinceId, (ProvinceVisual, ChoroplethBucket)>,
    /// Provinces whose tooltip is currently disabled.
    pub disabled_tooltips: BTreeSet<ProvinceId>,
    /// Bring-to-front order; the last entry is topmost.
    pub front_order: Vec<ProvinceId>,
    /// Mountain markers on the map.
    pub markers: Vec<MountainMarker>,
    /// Mountains whose name labels are drawn.
    pub labels: Vec<MountainRef>,
    /// Open detail panel, if any.
    pub panel: Option<ProvinceSummary>,
    /// Every command applied so far.
    pub history: Vec<MapCommand>,
}

impl HeadlessViewport {
    #[must_use]
    pub fn new(zoom: f64) -> Self {
        Self {
            zoom,
            ..Self::default()
        }
    }

    pub const fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    /// Last visual applied to a province.
    #[must_use]
    pub fn visual(&self, id: ProvinceId) -> Option<ProvinceVisual> {
        self.styles.get(&id).map(|(visual, _)| *visual)
    }

    /// Topmost province, if any was raised.
    #[must_use]
    pub fn topmost(&self) -> Option<ProvinceId> {
        self.front_order.last().copied()
    }
}

impl MapViewport for HeadlessViewport {
    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn apply(&mut self, command: &MapCommand) {
        match command {
            MapCommand::SetProvinceStyle {
                province,
                visual,
                bucket,
            } => {
                self.styles.insert(*province, (*visual, *bucket));
            }
            MapCommand::BringToFront(province) => {
                self.front_order.retain(|p| p != province);
                self.front_order.push(*province);
            }
            MapCommand::SetTooltipEnabled { province, enabled } => {
                if *enabled {
                    self.disabled_tooltips.remove(province);
                } else {
                    self.disabled_tooltips.insert(*province);
                }
            }
            MapCommand::ShowMountains(markers) => {
                self.markers.clone_from(markers);
            }
            MapCommand::HideMountains => self.markers.clear(),
            MapCommand::SetMarkerClimbed { mountain, climbed } => {
                for marker in self
                    .markers
                    .iter_mut()
                    .filter(|m| &m.mountain.id == mountain)
                {
                    marker.climbed = *climbed;
                }
            }
            MapCommand::ShowLabels(mountains) => {
                self.labels.extend(mountains.iter().cloned());
            }
            MapCommand::ClearLabels => self.labels.clear(),
            MapCommand::ShowPanel(summary) => self.panel = Some(summary.clone()),
            MapCommand::HidePanel => self.panel = None,
        }
        self.history.push(command.clone());
    }
}
