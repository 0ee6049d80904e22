use std::sync::Arc;

use serde_json::json;
use summit_map_climbs::{ClimbStatusStore, MemoryClimbStore};
use summit_map_geography::{Dataset, LabelConfig, MatchingConfig};
use summit_map_geography_models::{ChoroplethBucket, ProvinceId};
use summit_map_selection::{HeadlessViewport, MapViewport, SelectionController, SelectionPhase};
use summit_map_selection_models::{ProvinceVisual, SelectionEvent};

const BENGUET: ProvinceId = ProvinceId(0);
const IFUGAO: ProvinceId = ProvinceId(1);
const KALINGA: ProvinceId = ProvinceId(2);

fn mountain(name: &str, prov: &str, lon: f64) -> serde_json::Value {
    json!({
        "type": "Feature",
        "properties": { "name": name, "prov": [prov] },
        "geometry": { "type": "Point", "coordinates": [lon, 16.5] }
    })
}

fn dataset() -> Arc<Dataset> {
    let provinces = json!({
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "properties": { "name": "Benguet" }, "geometry": null },
            { "type": "Feature", "properties": { "name": "Ifugao", "adm2_en": "IFUGAO" }, "geometry": null },
            { "type": "Feature", "properties": { "name": "Kalinga" }, "geometry": null }
        ]
    });

    let mut features = vec![mountain("Amuyao", "ifugao", 121.1)];
    for (name, lon) in [
        ("Pulag", 120.88),
        ("Ugo", 120.81),
        ("Tabayoc", 120.87),
        ("Timbak", 120.85),
        ("Purgatory", 120.86),
    ] {
        features.push(mountain(name, "Benguet", lon));
    }
    let mountains = json!({ "type": "FeatureCollection", "features": features });

    Arc::new(
        Dataset::from_geojson_str(
            &provinces.to_string(),
            &mountains.to_string(),
            &MatchingConfig::default(),
        )
        .unwrap(),
    )
}

fn session(zoom: f64) -> (SelectionController, HeadlessViewport) {
    let mut viewport = HeadlessViewport::new(zoom);
    let mut controller = SelectionController::new(LabelConfig::default(), viewport.zoom());
    let ticket = controller.begin_load();
    let commands = controller.finish_load(ticket, dataset()).unwrap();
    viewport.apply_all(&commands);
    (controller, viewport)
}

#[test]
fn five_mountains_fill_tier_three() {
    let (controller, viewport) = session(6.0);
    let dataset = controller.dataset().unwrap();
    assert_eq!(dataset.mountain_count(BENGUET), 5);
    assert_eq!(dataset.bucket(BENGUET), ChoroplethBucket::Tier3);
    assert_eq!(viewport.styles[&BENGUET].1.fill_color(), "#A1D99B");
    assert_eq!(viewport.styles[&KALINGA].1, ChoroplethBucket::Empty);
}

#[test]
fn click_then_reclick_restores_map() {
    let climbs = MemoryClimbStore::new();
    let (mut controller, mut viewport) = session(6.0);
    let baseline = viewport.styles.clone();

    controller.dispatch_to(&mut viewport, SelectionEvent::Click(BENGUET), &climbs);
    assert_eq!(viewport.visual(BENGUET), Some(ProvinceVisual::Selected));
    assert_eq!(viewport.visual(IFUGAO), Some(ProvinceVisual::Faded));
    assert_eq!(viewport.markers.len(), 5);
    assert_eq!(viewport.labels.len(), 5);
    assert!(viewport.disabled_tooltips.contains(&BENGUET));
    assert_eq!(viewport.panel.as_ref().unwrap().mountain_count, 5);
    assert_eq!(controller.state().visible_mountains.len(), 5);

    controller.dispatch_to(&mut viewport, SelectionEvent::Click(BENGUET), &climbs);
    assert_eq!(viewport.styles, baseline);
    assert!(controller.state().visible_mountains.is_empty());
    assert!(viewport.markers.is_empty());
    assert!(viewport.labels.is_empty());
    assert!(viewport.disabled_tooltips.is_empty());
    assert!(viewport.panel.is_none());
    assert_eq!(controller.state().phase(), SelectionPhase::Idle);
}

#[test]
fn reselect_moves_everything_to_new_province() {
    let climbs = MemoryClimbStore::new();
    let (mut controller, mut viewport) = session(6.0);

    controller.dispatch_to(&mut viewport, SelectionEvent::Click(BENGUET), &climbs);
    controller.dispatch_to(&mut viewport, SelectionEvent::Click(IFUGAO), &climbs);

    assert_eq!(viewport.visual(BENGUET), Some(ProvinceVisual::Faded));
    assert_eq!(viewport.visual(IFUGAO), Some(ProvinceVisual::Selected));
    assert_eq!(viewport.markers.len(), 1);
    assert_eq!(viewport.markers[0].mountain.name, "Amuyao");
    assert_eq!(viewport.labels.len(), 1);
    assert!(!viewport.disabled_tooltips.contains(&BENGUET));
    assert!(viewport.disabled_tooltips.contains(&IFUGAO));
    assert_eq!(viewport.panel.as_ref().unwrap().name, "Ifugao");
}

#[test]
fn selected_stays_on_top_while_hovering_others() {
    let climbs = MemoryClimbStore::new();
    let (mut controller, mut viewport) = session(6.0);

    controller.dispatch_to(&mut viewport, SelectionEvent::Click(IFUGAO), &climbs);
    controller.dispatch_to(&mut viewport, SelectionEvent::Hover(KALINGA), &climbs);
    assert_eq!(viewport.topmost(), Some(IFUGAO));
    assert_eq!(
        viewport.visual(KALINGA),
        Some(ProvinceVisual::Hovered {
            faded_backdrop: true
        })
    );

    controller.dispatch_to(&mut viewport, SelectionEvent::Hover(IFUGAO), &climbs);
    assert_eq!(viewport.visual(IFUGAO), Some(ProvinceVisual::Selected));

    controller.dispatch_to(&mut viewport, SelectionEvent::Unhover(KALINGA), &climbs);
    assert_eq!(viewport.visual(KALINGA), Some(ProvinceVisual::Faded));
}

#[test]
fn labels_follow_zoom_without_duplicates() {
    let climbs = MemoryClimbStore::new();
    let (mut controller, mut viewport) = session(4.0);

    controller.dispatch_to(&mut viewport, SelectionEvent::Click(BENGUET), &climbs);
    assert!(viewport.labels.is_empty());

    for zoom in [6.0, 7.0, 8.0] {
        viewport.set_zoom(zoom);
        controller.dispatch_to(&mut viewport, SelectionEvent::ZoomChanged(zoom), &climbs);
        assert_eq!(viewport.labels.len(), 5);
    }

    viewport.set_zoom(5.0);
    controller.dispatch_to(&mut viewport, SelectionEvent::ZoomChanged(5.0), &climbs);
    assert!(viewport.labels.is_empty());
}

#[test]
fn closing_panel_deselects() {
    let climbs = MemoryClimbStore::new();
    let (mut controller, mut viewport) = session(6.0);

    controller.dispatch_to(&mut viewport, SelectionEvent::Click(KALINGA), &climbs);
    assert!(viewport.markers.is_empty());
    assert_eq!(viewport.panel.as_ref().unwrap().mountain_count, 0);

    controller.dispatch_to(&mut viewport, SelectionEvent::PanelClosed, &climbs);
    assert!(viewport.panel.is_none());
    assert_eq!(viewport.visual(BENGUET), Some(ProvinceVisual::Normal));
}

#[test]
fn climb_toggle_recolors_marker_and_panel() {
    let mut climbs = MemoryClimbStore::new();
    let (mut controller, mut viewport) = session(6.0);

    controller.dispatch_to(&mut viewport, SelectionEvent::Click(BENGUET), &climbs);
    let pulag = viewport.markers[0].mountain.id.clone();

    let commands = controller.toggle_climbed(&mut climbs, &pulag);
    viewport.apply_all(&commands);
    assert!(viewport.markers[0].climbed);
    assert!(viewport.markers[1..].iter().all(|m| !m.climbed));
    let panel = viewport.panel.as_ref().unwrap();
    assert_eq!(panel.climbed_count, 1);
    assert!((panel.progress_percent() - 20.0).abs() < f64::EPSILON);

    controller.dispatch_to(&mut viewport, SelectionEvent::Click(BENGUET), &climbs);
    controller.dispatch_to(&mut viewport, SelectionEvent::Click(BENGUET), &climbs);
    assert!(viewport.markers[0].climbed);
    assert!(climbs.get(&pulag));
}

#[test]
fn empty_dataset_stays_idle() {
    let climbs = MemoryClimbStore::new();
    let mut viewport = HeadlessViewport::new(6.0);
    let mut controller = SelectionController::new(LabelConfig::default(), 6.0);
    let ticket = controller.begin_load();
    let commands = controller
        .finish_load(ticket, Arc::new(Dataset::default()))
        .unwrap();
    assert!(commands.is_empty());

    controller.dispatch_to(&mut viewport, SelectionEvent::Click(ProvinceId(0)), &climbs);
    controller.dispatch_to(&mut viewport, SelectionEvent::Hover(ProvinceId(0)), &climbs);
    assert_eq!(controller.state().phase(), SelectionPhase::Idle);
    assert!(viewport.history.is_empty());
}

#[test]
fn reload_repaints_and_ignores_old_data() {
    let climbs = MemoryClimbStore::new();
    let (mut controller, mut viewport) = session(6.0);

    controller.dispatch_to(&mut viewport, SelectionEvent::Click(BENGUET), &climbs);
    controller.dispatch_to(&mut viewport, SelectionEvent::Hover(KALINGA), &climbs);
    assert_eq!(
        viewport.visual(KALINGA),
        Some(ProvinceVisual::Hovered {
            faded_backdrop: true
        })
    );

    controller.dispatch_to(&mut viewport, SelectionEvent::DatasetReload, &climbs);
    for id in [BENGUET, IFUGAO, KALINGA] {
        assert_eq!(viewport.visual(id), Some(ProvinceVisual::Normal));
    }
    assert!(viewport.disabled_tooltips.is_empty());
    assert!(viewport.markers.is_empty());
    assert!(viewport.labels.is_empty());
    assert!(viewport.panel.is_none());
    assert!(controller.dataset().is_none());

    let before = viewport.history.len();
    controller.dispatch_to(&mut viewport, SelectionEvent::Hover(IFUGAO), &climbs);
    controller.dispatch_to(&mut viewport, SelectionEvent::Click(IFUGAO), &climbs);
    assert_eq!(controller.state().phase(), SelectionPhase::Idle);
    assert_eq!(viewport.history.len(), before);
    assert_eq!(viewport.visual(IFUGAO), Some(ProvinceVisual::Normal));
}
