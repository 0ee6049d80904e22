//! One map session's selection state, dataset generation, and zoom.

use std::sync::Arc;

use summit_map_climbs::{ClimbStatusStore, MemoryClimbStore};
use summit_map_geography::{Dataset, LabelConfig};
use summit_map_geography_models::{MountainId, ProvinceId};
use summit_map_selection_models::{MapCommand, ProvinceSummary, ProvinceVisual, SelectionEvent};

use crate::state::{self, SelectionState, TransitionContext, transition};
use crate::viewport::MapViewport;

/// Proof that a dataset load was started at a particular generation.
///
/// Only the ticket from the most recent [`SelectionController::begin_load`]
/// can install a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    /// Load generation this ticket was issued for.
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.generation
    }
}

/// Owns the selection state for one map session.
///
/// Until a dataset is installed every interaction is ignored.
#[derive(Debug)]
pub struct SelectionController {
    state: SelectionState,
    dataset: Option<Arc<Dataset>>,
    labels: LabelConfig,
    zoom: f64,
    generation: u64,
}

impl SelectionController {
    /// Creates an idle controller with no dataset at the given zoom.
    #[must_use]
    pub const fn new(labels: LabelConfig, zoom: f64) -> Self {
        Self {
            state: SelectionState {
                selected: None,
                hovered: None,
                visible_mountains: Vec::new(),
            },
            dataset: None,
            labels,
            zoom,
            generation: 0,
        }
    }

    /// Starts a new dataset load, invalidating any in flight.
    pub const fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Installs a loaded dataset if `ticket` is still current.
    ///
    /// Returns `None` for a stale ticket. Otherwise resets the selection and
    /// returns the commands that clear the old session and paint every
    /// province of the new dataset in its baseline style.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        dataset: Arc<Dataset>,
    ) -> Option<Vec<MapCommand>> {
        if ticket.generation != self.generation {
            log::debug!(
                "Discarding dataset from load generation {} (current {})",
                ticket.generation,
                self.generation
            );
            return None;
        }

        let mut commands = self.reset(&MemoryClimbStore::new());

        for id in dataset.province_ids() {
            commands.push(MapCommand::SetProvinceStyle {
                province: id,
                visual: ProvinceVisual::Normal,
                bucket: dataset.bucket(id),
            });
            commands.push(MapCommand::SetTooltipEnabled {
                province: id,
                enabled: true,
            });
        }

        log::info!(
            "Installed dataset generation {} with {} provinces",
            self.generation,
            dataset.provinces().len()
        );

        self.dataset = Some(dataset);
        Some(commands)
    }

    /// Ends the session. Pending loads are discarded and the controller
    /// returns to idle with no dataset.
    pub fn teardown(&mut self) {
        self.generation += 1;
        self.dataset = None;
        self.state = SelectionState::default();
        log::debug!("Selection controller torn down");
    }

    /// Applies an event and returns the resulting viewport commands.
    ///
    /// [`SelectionEvent::DatasetReload`] restores every province's baseline
    /// look and drops the dataset, so later interaction is ignored until the
    /// next [`Self::finish_load`].
    pub fn dispatch(
        &mut self,
        event: SelectionEvent,
        climbs: &dyn ClimbStatusStore,
    ) -> Vec<MapCommand> {
        if let SelectionEvent::ZoomChanged(zoom) = event {
            self.zoom = zoom;
        }
        if matches!(event, SelectionEvent::DatasetReload) {
            let commands = self.reset(climbs);
            self.dataset = None;
            log::debug!("Dataset reload requested; ignoring interaction until the next load");
            return commands;
        }

        let Some(dataset) = self.dataset.as_deref() else {
            return Vec::new();
        };

        let ctx = TransitionContext {
            dataset,
            climbs,
            labels: self.labels,
            zoom: self.zoom,
        };
        let next = transition(&self.state, event, &ctx);
        self.state = next.state;
        next.commands
    }

    /// Dispatches an event and applies the commands to `viewport`.
    ///
    /// The viewport's zoom is taken as current before the event is handled.
    pub fn dispatch_to(
        &mut self,
        viewport: &mut dyn MapViewport,
        event: SelectionEvent,
        climbs: &dyn ClimbStatusStore,
    ) {
        self.zoom = viewport.zoom();
        let commands = self.dispatch(event, climbs);
        viewport.apply_all(&commands);
    }

    /// Flips a mountain's climb status and refreshes what shows it.
    pub fn toggle_climbed(
        &mut self,
        climbs: &mut dyn ClimbStatusStore,
        id: &MountainId,
    ) -> Vec<MapCommand> {
        let climbed = climbs.toggle(id);
        log::debug!("Mountain {id} climbed={climbed}");

        let mut commands = Vec::new();
        if self.state.visible_mountains.iter().any(|m| &m.id == id) {
            commands.push(MapCommand::SetMarkerClimbed {
                mountain: id.clone(),
                climbed,
            });
        }
        if let Some(summary) = self.summary(climbs) {
            commands.push(MapCommand::ShowPanel(summary));
        }
        commands
    }

    /// Detail panel contents for the selected province.
    #[must_use]
    pub fn summary(&self, climbs: &dyn ClimbStatusStore) -> Option<ProvinceSummary> {
        let dataset = self.dataset.as_deref()?;
        let selected = self.state.selected?;
        Some(state::summary(dataset, climbs, selected))
    }

    /// Current selection state.
    #[must_use]
    pub const fn state(&self) -> &SelectionState {
        &self.state
    }

    /// The selected province, if any.
    #[must_use]
    pub fn selected(&self) -> Option<ProvinceId> {
        self.state.selected
    }

    /// The installed dataset, if any.
    #[must_use]
    pub fn dataset(&self) -> Option<&Arc<Dataset>> {
        self.dataset.as_ref()
    }

    /// Last zoom level seen.
    #[must_use]
    pub const fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Returns to idle, restoring the baseline look of the installed
    /// dataset's provinces.
    fn reset(&mut self, climbs: &dyn ClimbStatusStore) -> Vec<MapCommand> {
        let Some(dataset) = self.dataset.as_deref() else {
            self.state = SelectionState::default();
            return Vec::new();
        };

        let ctx = TransitionContext {
            dataset,
            climbs,
            labels: self.labels,
            zoom: self.zoom,
        };
        let next = transition(&self.state, SelectionEvent::DatasetReload, &ctx);
        self.state = next.state;
        next.commands
    }
}
