use serde_json::{Value, json};
use summit_map_geography::choropleth::classify;
use summit_map_geography::normalize::normalize;
use summit_map_geography::{Dataset, MatchingConfig};
use summit_map_geography_models::{ChoroplethBucket, ProvinceId};

fn province(name: &str, alt: Option<&str>) -> Value {
    let mut properties = json!({ "name": name });
    if let Some(alt) = alt {
        properties["adm2_en"] = json!(alt);
    }
    json!({ "type": "Feature", "properties": properties, "geometry": null })
}

fn mountain(name: &str, prov: &[&str], lon: f64) -> Value {
    json!({
        "type": "Feature",
        "properties": { "name": name, "prov": prov },
        "geometry": { "type": "Point", "coordinates": [lon, 16.5] }
    })
}

fn collection(features: Vec<Value>) -> String {
    json!({ "type": "FeatureCollection", "features": features }).to_string()
}

fn cordillera() -> Dataset {
    let provinces = collection(vec![
        province("Benguet", None),
        province("Ifugao", Some("IFUGAO")),
    ]);
    let mountains = collection(vec![
        mountain("Pulag", &["benguet"], 120.88),
        mountain("Amuyao", &["Ifugao"], 121.1),
        mountain("Unknown Peak", &["Nowhere"], 122.0),
    ]);
    Dataset::from_geojson_str(&provinces, &mountains, &MatchingConfig::default()).unwrap()
}

#[test]
fn cordillera_scenario() {
    let dataset = cordillera();

    assert_eq!(dataset.mountain_count(ProvinceId(0)), 1);
    assert_eq!(dataset.mountain_count(ProvinceId(1)), 1);
    assert_eq!(dataset.index().total_associations(), 2);

    let report = dataset.report();
    assert_eq!(report.associations.len(), 2);
    assert_eq!(report.unassociated.len(), 1);
    let unknown = dataset.mountain(&report.unassociated[0]).unwrap();
    assert_eq!(unknown.name, "Unknown Peak");
    assert_eq!(report.unmatched.len(), 1);
    assert_eq!(report.unmatched[0].declared, "Nowhere");
}

#[test]
fn every_input_name_is_indexed() {
    let dataset = cordillera();
    for name in ["Benguet", "Ifugao", "IFUGAO", "  benguet "] {
        assert!(
            dataset.index().lookup(&normalize(name)).is_some(),
            "{name} should resolve"
        );
    }
    assert_eq!(
        dataset.index().lookup(&normalize("IFUGAO")),
        Some(ProvinceId(1))
    );
}

#[test]
fn counts_match_list_lengths() {
    let provinces = collection(vec![
        province("Benguet", None),
        province("Ifugao", None),
        province("Mountain Province", None),
        province("Kalinga", None),
    ]);
    let mountains = collection(vec![
        mountain("Pulag", &["Benguet", "Ifugao", "benguet"], 120.88),
        mountain("Amuyao", &["Mountain"], 121.1),
        mountain("Data", &["Benguet", "Mountain Province"], 120.86),
        mountain("Ghost", &[], 121.5),
        mountain("Lost", &["Atlantis", "  "], 121.6),
    ]);
    let dataset =
        Dataset::from_geojson_str(&provinces, &mountains, &MatchingConfig::default()).unwrap();

    let mut sum = 0;
    for province in dataset.index().provinces() {
        assert_eq!(province.mountain_count, province.mountains.len());
        let mut ids: Vec<_> = province.mountains.iter().map(|m| m.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), province.mountains.len());
        sum += province.mountain_count;
    }
    assert_eq!(sum, dataset.index().total_associations());
    assert_eq!(sum, dataset.report().associations.len());

    assert_eq!(dataset.mountain_count(ProvinceId(0)), 2);
    assert_eq!(dataset.mountain_count(ProvinceId(1)), 1);
    assert_eq!(dataset.mountain_count(ProvinceId(2)), 2);
    assert_eq!(dataset.mountain_count(ProvinceId(3)), 0);
}

#[test]
fn rebuilding_does_not_accumulate() {
    let first = cordillera();
    let second = cordillera();

    for id in [ProvinceId(0), ProvinceId(1)] {
        assert_eq!(first.mountain_count(id), second.mountain_count(id));
        assert_eq!(first.mountains_of(id), second.mountains_of(id));
    }
    let ids = |d: &Dataset| d.mountains().iter().map(|m| m.id.clone()).collect::<Vec<_>>();
    assert_eq!(ids(&first), ids(&second));
}

#[test]
fn bucket_scenarios() {
    assert_eq!(classify(0), ChoroplethBucket::Empty);
    assert_eq!(classify(3), ChoroplethBucket::Tier2);
    assert_eq!(classify(24), ChoroplethBucket::Tier6);
    assert_eq!(classify(25), ChoroplethBucket::Tier7);
}

#[test]
fn empty_inputs_build_empty_dataset() {
    let empty = collection(Vec::new());
    let dataset = Dataset::from_geojson_str(&empty, &empty, &MatchingConfig::default()).unwrap();
    assert!(dataset.index().is_empty());
    assert!(dataset.mountains().is_empty());
    assert!(dataset.annotated_provinces().features.is_empty());
}
