//! Pure selection state transitions.
//!
//! [`transition`] maps the current [`SelectionState`] and one
//! [`SelectionEvent`] to the next state plus the viewport commands that
//! realise it. It reads the dataset and climb store but never mutates them,
//! so every path can be tested without a map.

use summit_map_climbs::{ClimbStatusStore, climbed_count};
use summit_map_geography::{Dataset, LabelConfig};
use summit_map_geography_models::{MountainRef, ProvinceId};
use summit_map_selection_models::{
    MapCommand, MountainMarker, ProvinceSummary, ProvinceVisual, SelectionEvent,
};

/// Which province is selected and which is under the pointer.
///
/// `hovered` may equal `selected` when the pointer was already over a
/// province as it got clicked. Selection styling takes precedence in that
/// case.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    /// The selected province, if any.
    pub selected: Option<ProvinceId>,
    /// The province under the pointer, if any.
    pub hovered: Option<ProvinceId>,
    /// Mountains attributed to the selected province at selection time.
    pub visible_mountains: Vec<MountainRef>,
}

/// Coarse phase of a [`SelectionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase {
    /// Nothing selected or hovered.
    Idle,
    /// Pointer over a province with nothing selected.
    Hovering(ProvinceId),
    /// A province is selected; the pointer is elsewhere or over it.
    Selected(ProvinceId),
    /// A province is selected and the pointer is over a different one.
    SelectedHovering {
        /// The selected province.
        selected: ProvinceId,
        /// The province under the pointer.
        hovered: ProvinceId,
    },
}

impl SelectionState {
    /// Classifies the state. Hovering the selected province counts as
    /// [`SelectionPhase::Selected`].
    #[must_use]
    pub const fn phase(&self) -> SelectionPhase {
        match (self.selected, self.hovered) {
            (None, None) => SelectionPhase::Idle,
            (None, Some(hovered)) => SelectionPhase::Hovering(hovered),
            (Some(selected), None) => SelectionPhase::Selected(selected),
            (Some(selected), Some(hovered)) => {
                if selected.0 == hovered.0 {
                    SelectionPhase::Selected(selected)
                } else {
                    SelectionPhase::SelectedHovering { selected, hovered }
                }
            }
        }
    }

    /// Visual state a province should currently be painted with.
    #[must_use]
    pub fn visual_for(&self, id: ProvinceId) -> ProvinceVisual {
        if self.selected == Some(id) {
            ProvinceVisual::Selected
        } else if self.hovered == Some(id) {
            ProvinceVisual::Hovered {
                faded_backdrop: self.selected.is_some(),
            }
        } else if self.selected.is_some() {
            ProvinceVisual::Faded
        } else {
            ProvinceVisual::Normal
        }
    }
}

/// Read-only inputs a transition may consult.
pub struct TransitionContext<'a> {
    /// The installed dataset.
    pub dataset: &'a Dataset,
    /// Climb status for marker colours and panel progress.
    pub climbs: &'a dyn ClimbStatusStore,
    /// Label zoom policy.
    pub labels: LabelConfig,
    /// Current map zoom.
    pub zoom: f64,
}

/// Next state and the commands that take the viewport there.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// State after the event.
    pub state: SelectionState,
    /// Viewport commands, in application order.
    pub commands: Vec<MapCommand>,
}

impl Transition {
    fn unchanged(state: &SelectionState) -> Self {
        Self {
            state: state.clone(),
            commands: Vec::new(),
        }
    }
}

/// Applies one event to `state`.
///
/// Events naming a province outside the dataset leave the state untouched
/// and emit nothing.
#[must_use]
pub fn transition(
    state: &SelectionState,
    event: SelectionEvent,
    ctx: &TransitionContext<'_>,
) -> Transition {
    match event {
        SelectionEvent::Hover(id) => hover(state, id, ctx),
        SelectionEvent::Unhover(id) => unhover(state, id, ctx),
        SelectionEvent::Click(id) => click(state, id, ctx),
        SelectionEvent::PanelClosed => match state.selected {
            Some(id) => deselect(state, id, ctx),
            None => Transition::unchanged(state),
        },
        SelectionEvent::ZoomChanged(zoom) => Transition {
            state: state.clone(),
            commands: label_commands(&state.visible_mountains, zoom, ctx.labels),
        },
        SelectionEvent::DatasetReload => reload(state, ctx),
    }
}

fn hover(state: &SelectionState, id: ProvinceId, ctx: &TransitionContext<'_>) -> Transition {
    if !ctx.dataset.contains(id) || state.selected == Some(id) || state.hovered == Some(id) {
        return Transition::unchanged(state);
    }

    let mut next = state.clone();
    let mut commands = Vec::new();

    if let Some(previous) = next.hovered.take() {
        if state.selected != Some(previous) {
            commands.push(style(&next, previous, ctx));
        }
    }

    next.hovered = Some(id);
    commands.push(style(&next, id, ctx));
    commands.push(MapCommand::BringToFront(id));
    if let Some(selected) = next.selected {
        commands.push(MapCommand::BringToFront(selected));
    }

    Transition {
        state: next,
        commands,
    }
}

fn unhover(state: &SelectionState, id: ProvinceId, ctx: &TransitionContext<'_>) -> Transition {
    if !ctx.dataset.contains(id) {
        return Transition::unchanged(state);
    }

    let mut next = state.clone();
    if next.hovered == Some(id) {
        next.hovered = None;
    }

    let commands = if next.selected == Some(id) {
        Vec::new()
    } else {
        vec![style(&next, id, ctx)]
    };

    Transition {
        state: next,
        commands,
    }
}

fn click(state: &SelectionState, id: ProvinceId, ctx: &TransitionContext<'_>) -> Transition {
    if !ctx.dataset.contains(id) {
        return Transition::unchanged(state);
    }
    if state.selected == Some(id) {
        return deselect(state, id, ctx);
    }

    let previous = state.selected;
    let next = SelectionState {
        selected: Some(id),
        hovered: state.hovered,
        visible_mountains: ctx.dataset.mountains_of(id).to_vec(),
    };

    let mut commands = restyle_all(&next, ctx);
    commands.push(MapCommand::BringToFront(id));
    if let Some(previous) = previous {
        commands.push(MapCommand::SetTooltipEnabled {
            province: previous,
            enabled: true,
        });
        commands.push(MapCommand::HideMountains);
    }
    commands.push(MapCommand::SetTooltipEnabled {
        province: id,
        enabled: false,
    });

    if !next.visible_mountains.is_empty() {
        commands.push(MapCommand::ShowMountains(markers(
            &next.visible_mountains,
            ctx.climbs,
        )));
    }
    commands.extend(label_commands(
        &next.visible_mountains,
        ctx.zoom,
        ctx.labels,
    ));
    commands.push(MapCommand::ShowPanel(summary(ctx.dataset, ctx.climbs, id)));

    log::debug!(
        "Selected {} ({}) with {} mountains",
        ctx.dataset.display_name(id),
        id,
        next.visible_mountains.len()
    );

    Transition {
        state: next,
        commands,
    }
}

fn deselect(state: &SelectionState, id: ProvinceId, ctx: &TransitionContext<'_>) -> Transition {
    let next = SelectionState {
        selected: None,
        hovered: state.hovered,
        visible_mountains: Vec::new(),
    };

    let mut commands = restyle_all(&next, ctx);
    commands.extend(
        ctx.dataset
            .province_ids()
            .map(|province| MapCommand::SetTooltipEnabled {
                province,
                enabled: true,
            }),
    );
    commands.push(MapCommand::HideMountains);
    commands.push(MapCommand::ClearLabels);
    commands.push(MapCommand::HidePanel);

    log::debug!("Deselected {}", ctx.dataset.display_name(id));

    Transition {
        state: next,
        commands,
    }
}

fn reload(state: &SelectionState, ctx: &TransitionContext<'_>) -> Transition {
    let next = SelectionState::default();

    let mut commands = restyle_all(&next, ctx);
    commands.extend(
        ctx.dataset
            .province_ids()
            .map(|province| MapCommand::SetTooltipEnabled {
                province,
                enabled: true,
            }),
    );
    if state.selected.is_some() {
        commands.push(MapCommand::HideMountains);
        commands.push(MapCommand::ClearLabels);
        commands.push(MapCommand::HidePanel);
    }

    Transition {
        state: next,
        commands,
    }
}

fn style(state: &SelectionState, id: ProvinceId, ctx: &TransitionContext<'_>) -> MapCommand {
    MapCommand::SetProvinceStyle {
        province: id,
        visual: state.visual_for(id),
        bucket: ctx.dataset.bucket(id),
    }
}

fn restyle_all(state: &SelectionState, ctx: &TransitionContext<'_>) -> Vec<MapCommand> {
    ctx.dataset
        .province_ids()
        .map(|id| style(state, id, ctx))
        .collect()
}

/// Commands that redraw mountain labels for the given zoom.
///
/// Always clears first; labels are only drawn above the configured zoom.
#[must_use]
pub fn label_commands(
    visible: &[MountainRef],
    zoom: f64,
    labels: LabelConfig,
) -> Vec<MapCommand> {
    let mut commands = vec![MapCommand::ClearLabels];
    if !visible.is_empty() && labels.labels_visible_at(zoom) {
        commands.push(MapCommand::ShowLabels(visible.to_vec()));
    }
    commands
}

/// Markers for `mountains` with their current climb status.
#[must_use]
pub fn markers(mountains: &[MountainRef], climbs: &dyn ClimbStatusStore) -> Vec<MountainMarker> {
    mountains
        .iter()
        .map(|mountain| MountainMarker {
            mountain: mountain.clone(),
            climbed: climbs.get(&mountain.id),
        })
        .collect()
}

/// Detail panel contents for a province.
#[must_use]
pub fn summary(
    dataset: &Dataset,
    climbs: &dyn ClimbStatusStore,
    id: ProvinceId,
) -> ProvinceSummary {
    ProvinceSummary {
        province: id,
        name: dataset.display_name(id).to_string(),
        mountain_count: dataset.mountain_count(id),
        climbed_count: climbed_count(climbs, dataset.mountains_of(id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use summit_map_climbs::MemoryClimbStore;
    use summit_map_geography::MatchingConfig;

    fn dataset() -> Dataset {
        let provinces = json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": { "name": "Benguet" }, "geometry": null },
                { "type": "Feature", "properties": { "name": "Ifugao" }, "geometry": null },
                { "type": "Feature", "properties": { "name": "Abra" }, "geometry": null }
            ]
        });
        let mountains = json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": { "name": "Pulag", "prov": ["Benguet"] },
                    "geometry": { "type": "Point", "coordinates": [120.8867, 16.5966] }
                },
                {
                    "type": "Feature",
                    "properties": { "name": "Amuyao", "prov": ["Ifugao"] },
                    "geometry": { "type": "Point", "coordinates": [121.1, 17.0] }
                }
            ]
        });
        Dataset::from_geojson_str(
            &provinces.to_string(),
            &mountains.to_string(),
            &MatchingConfig::default(),
        )
        .unwrap()
    }

    fn ctx<'a>(dataset: &'a Dataset, climbs: &'a MemoryClimbStore, zoom: f64) -> TransitionContext<'a> {
        TransitionContext {
            dataset,
            climbs,
            labels: LabelConfig::default(),
            zoom,
        }
    }

    fn styled(commands: &[MapCommand], id: ProvinceId) -> Option<ProvinceVisual> {
        commands.iter().rev().find_map(|c| match c {
            MapCommand::SetProvinceStyle {
                province, visual, ..
            } if *province == id => Some(*visual),
            _ => None,
        })
    }

    const BENGUET: ProvinceId = ProvinceId(0);
    const IFUGAO: ProvinceId = ProvinceId(1);
    const ABRA: ProvinceId = ProvinceId(2);

    #[test]
    fn hover_from_idle_emphasises_province() {
        let dataset = dataset();
        let climbs = MemoryClimbStore::new();
        let t = transition(
            &SelectionState::default(),
            SelectionEvent::Hover(BENGUET),
            &ctx(&dataset, &climbs, 6.0),
        );
        assert_eq!(t.state.phase(), SelectionPhase::Hovering(BENGUET));
        assert_eq!(
            styled(&t.commands, BENGUET),
            Some(ProvinceVisual::Hovered {
                faded_backdrop: false
            })
        );
        assert!(t.commands.contains(&MapCommand::BringToFront(BENGUET)));
    }

    #[test]
    fn unhover_restores_baseline() {
        let dataset = dataset();
        let climbs = MemoryClimbStore::new();
        let ctx = ctx(&dataset, &climbs, 6.0);
        let hovered = transition(&SelectionState::default(), SelectionEvent::Hover(IFUGAO), &ctx);
        let t = transition(&hovered.state, SelectionEvent::Unhover(IFUGAO), &ctx);
        assert_eq!(t.state.phase(), SelectionPhase::Idle);
        assert_eq!(styled(&t.commands, IFUGAO), Some(ProvinceVisual::Normal));
    }

    #[test]
    fn click_selects_and_fades_others() {
        let dataset = dataset();
        let climbs = MemoryClimbStore::new();
        let t = transition(
            &SelectionState::default(),
            SelectionEvent::Click(BENGUET),
            &ctx(&dataset, &climbs, 6.0),
        );

        assert_eq!(t.state.phase(), SelectionPhase::Selected(BENGUET));
        assert_eq!(t.state.visible_mountains.len(), 1);
        assert_eq!(styled(&t.commands, BENGUET), Some(ProvinceVisual::Selected));
        assert_eq!(styled(&t.commands, IFUGAO), Some(ProvinceVisual::Faded));
        assert_eq!(styled(&t.commands, ABRA), Some(ProvinceVisual::Faded));
        assert!(t.commands.contains(&MapCommand::SetTooltipEnabled {
            province: BENGUET,
            enabled: false
        }));
        assert!(t
            .commands
            .iter()
            .any(|c| matches!(c, MapCommand::ShowMountains(m) if m.len() == 1)));
        assert!(t
            .commands
            .iter()
            .any(|c| matches!(c, MapCommand::ShowLabels(m) if m.len() == 1)));
        assert!(t.commands.iter().any(
            |c| matches!(c, MapCommand::ShowPanel(s) if s.name == "Benguet" && s.mountain_count == 1)
        ));
    }

    #[test]
    fn labels_hidden_at_low_zoom() {
        let dataset = dataset();
        let climbs = MemoryClimbStore::new();
        let t = transition(
            &SelectionState::default(),
            SelectionEvent::Click(BENGUET),
            &ctx(&dataset, &climbs, 5.0),
        );
        assert!(t.commands.contains(&MapCommand::ClearLabels));
        assert!(!t
            .commands
            .iter()
            .any(|c| matches!(c, MapCommand::ShowLabels(_))));
    }

    #[test]
    fn reclick_deselects() {
        let dataset = dataset();
        let climbs = MemoryClimbStore::new();
        let ctx = ctx(&dataset, &climbs, 6.0);
        let selected = transition(&SelectionState::default(), SelectionEvent::Click(BENGUET), &ctx);
        let t = transition(&selected.state, SelectionEvent::Click(BENGUET), &ctx);

        assert_eq!(t.state, SelectionState::default());
        for id in [BENGUET, IFUGAO, ABRA] {
            assert_eq!(styled(&t.commands, id), Some(ProvinceVisual::Normal));
        }
        assert!(t.commands.contains(&MapCommand::HideMountains));
        assert!(t.commands.contains(&MapCommand::ClearLabels));
        assert!(t.commands.contains(&MapCommand::HidePanel));
        assert!(t.commands.contains(&MapCommand::SetTooltipEnabled {
            province: BENGUET,
            enabled: true
        }));
    }

    #[test]
    fn click_round_trip_restores_hover_state() {
        let dataset = dataset();
        let climbs = MemoryClimbStore::new();
        let ctx = ctx(&dataset, &climbs, 6.0);
        let hovered = transition(&SelectionState::default(), SelectionEvent::Hover(IFUGAO), &ctx);
        let selected = transition(&hovered.state, SelectionEvent::Click(IFUGAO), &ctx);
        assert_eq!(selected.state.phase(), SelectionPhase::Selected(IFUGAO));

        let back = transition(&selected.state, SelectionEvent::Click(IFUGAO), &ctx);
        assert_eq!(back.state, hovered.state);
        assert_eq!(
            styled(&back.commands, IFUGAO),
            Some(ProvinceVisual::Hovered {
                faded_backdrop: false
            })
        );
    }

    #[test]
    fn switching_selection_restores_previous_tooltip() {
        let dataset = dataset();
        let climbs = MemoryClimbStore::new();
        let ctx = ctx(&dataset, &climbs, 6.0);
        let first = transition(&SelectionState::default(), SelectionEvent::Click(BENGUET), &ctx);
        let t = transition(&first.state, SelectionEvent::Click(IFUGAO), &ctx);

        assert_eq!(t.state.selected, Some(IFUGAO));
        assert_eq!(t.state.visible_mountains[0].name, "Amuyao");
        assert_eq!(styled(&t.commands, BENGUET), Some(ProvinceVisual::Faded));
        assert!(t.commands.contains(&MapCommand::SetTooltipEnabled {
            province: BENGUET,
            enabled: true
        }));
        assert!(t.commands.contains(&MapCommand::HideMountains));
    }

    #[test]
    fn hovering_selected_province_is_ignored() {
        let dataset = dataset();
        let climbs = MemoryClimbStore::new();
        let ctx = ctx(&dataset, &climbs, 6.0);
        let selected = transition(&SelectionState::default(), SelectionEvent::Click(BENGUET), &ctx);
        let t = transition(&selected.state, SelectionEvent::Hover(BENGUET), &ctx);
        assert_eq!(t.state, selected.state);
        assert!(t.commands.is_empty());
    }

    #[test]
    fn hover_while_selected_keeps_selection_on_top() {
        let dataset = dataset();
        let climbs = MemoryClimbStore::new();
        let ctx = ctx(&dataset, &climbs, 6.0);
        let selected = transition(&SelectionState::default(), SelectionEvent::Click(BENGUET), &ctx);
        let t = transition(&selected.state, SelectionEvent::Hover(ABRA), &ctx);

        assert_eq!(
            t.state.phase(),
            SelectionPhase::SelectedHovering {
                selected: BENGUET,
                hovered: ABRA
            }
        );
        assert_eq!(
            styled(&t.commands, ABRA),
            Some(ProvinceVisual::Hovered {
                faded_backdrop: true
            })
        );
        assert_eq!(
            t.commands.last(),
            Some(&MapCommand::BringToFront(BENGUET))
        );

        let out = transition(&t.state, SelectionEvent::Unhover(ABRA), &ctx);
        assert_eq!(out.state.phase(), SelectionPhase::Selected(BENGUET));
        assert_eq!(styled(&out.commands, ABRA), Some(ProvinceVisual::Faded));
    }

    #[test]
    fn zoom_redraws_labels_only_when_selected() {
        let dataset = dataset();
        let climbs = MemoryClimbStore::new();
        let ctx = ctx(&dataset, &climbs, 4.0);

        let idle = transition(&SelectionState::default(), SelectionEvent::ZoomChanged(8.0), &ctx);
        assert_eq!(idle.commands, vec![MapCommand::ClearLabels]);

        let selected = transition(&SelectionState::default(), SelectionEvent::Click(IFUGAO), &ctx);
        let zoomed = transition(&selected.state, SelectionEvent::ZoomChanged(8.0), &ctx);
        assert_eq!(zoomed.state, selected.state);
        assert_eq!(zoomed.commands.len(), 2);
        assert!(matches!(zoomed.commands[1], MapCommand::ShowLabels(_)));

        let out = transition(&zoomed.state, SelectionEvent::ZoomChanged(3.0), &ctx);
        assert_eq!(out.commands, vec![MapCommand::ClearLabels]);
    }

    #[test]
    fn empty_province_selects_without_markers() {
        let dataset = dataset();
        let climbs = MemoryClimbStore::new();
        let t = transition(
            &SelectionState::default(),
            SelectionEvent::Click(ABRA),
            &ctx(&dataset, &climbs, 6.0),
        );
        assert_eq!(t.state.selected, Some(ABRA));
        assert!(t.state.visible_mountains.is_empty());
        assert!(!t
            .commands
            .iter()
            .any(|c| matches!(c, MapCommand::ShowMountains(_) | MapCommand::ShowLabels(_))));
        assert!(t.commands.iter().any(
            |c| matches!(c, MapCommand::ShowPanel(s) if s.mountain_count == 0 && s.progress_percent() < f64::EPSILON)
        ));
    }

    #[test]
    fn unknown_province_is_a_no_op() {
        let dataset = dataset();
        let climbs = MemoryClimbStore::new();
        let ctx = ctx(&dataset, &climbs, 6.0);
        for event in [
            SelectionEvent::Hover(ProvinceId(42)),
            SelectionEvent::Unhover(ProvinceId(42)),
            SelectionEvent::Click(ProvinceId(42)),
        ] {
            let t = transition(&SelectionState::default(), event, &ctx);
            assert_eq!(t.state, SelectionState::default());
            assert!(t.commands.is_empty());
        }
    }

    #[test]
    fn panel_close_acts_like_reclick() {
        let dataset = dataset();
        let climbs = MemoryClimbStore::new();
        let ctx = ctx(&dataset, &climbs, 6.0);
        let selected = transition(&SelectionState::default(), SelectionEvent::Click(BENGUET), &ctx);
        let closed = transition(&selected.state, SelectionEvent::PanelClosed, &ctx);
        let reclicked = transition(&selected.state, SelectionEvent::Click(BENGUET), &ctx);
        assert_eq!(closed, reclicked);

        let idle = transition(&SelectionState::default(), SelectionEvent::PanelClosed, &ctx);
        assert!(idle.commands.is_empty());
    }

    #[test]
    fn reload_returns_to_idle() {
        let dataset = dataset();
        let climbs = MemoryClimbStore::new();
        let ctx = ctx(&dataset, &climbs, 6.0);
        let selected = transition(&SelectionState::default(), SelectionEvent::Click(BENGUET), &ctx);
        let hovered = transition(&selected.state, SelectionEvent::Hover(ABRA), &ctx);
        let t = transition(&hovered.state, SelectionEvent::DatasetReload, &ctx);
        assert_eq!(t.state, SelectionState::default());
        assert!(t.commands.contains(&MapCommand::HidePanel));
        for id in [BENGUET, IFUGAO, ABRA] {
            assert_eq!(styled(&t.commands, id), Some(ProvinceVisual::Normal));
            assert!(t.commands.contains(&MapCommand::SetTooltipEnabled {
                province: id,
                enabled: true
            }));
        }
    }

    #[test]
    fn summary_counts_climbed_mountains() {
        let dataset = dataset();
        let mut climbs = MemoryClimbStore::new();
        let pulag = dataset.mountains_of(BENGUET)[0].id.clone();
        climbs.set(&pulag, true);

        let summary = summary(&dataset, &climbs, BENGUET);
        assert_eq!(summary.climbed_count, 1);
        assert!((summary.progress_percent() - 100.0).abs() < f64::EPSILON);
    }
}
