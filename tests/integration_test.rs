extern crate boundary_simplify;

use boundary_simplify::{process_reader, Config, Error, Format};
use geojson::{GeoJson, Value};
use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};

fn get_string(cursor: &mut Cursor<Vec<u8>>) -> String {
    cursor.seek(SeekFrom::Start(0)).unwrap();
    let mut out = Vec::new();
    cursor.read_to_end(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn run(config: &Config, format: Format) -> (String, boundary_simplify::Report) {
    let mut cursor = Cursor::new(Vec::new());
    let file = File::open("./tests/data/regions.geojson").unwrap();
    let processed = process_reader(file, &mut cursor, config, format).unwrap();
    (get_string(&mut cursor), processed.report)
}

fn features(string: &str) -> Vec<geojson::Feature> {
    match string.parse::<GeoJson>().unwrap() {
        GeoJson::FeatureCollection(collection) => collection.features,
        other => panic!("expected a feature collection, got {:?}", other),
    }
}

fn name(feature: &geojson::Feature) -> &str {
    feature
        .properties
        .as_ref()
        .and_then(|properties| properties.get("name"))
        .and_then(|name| name.as_str())
        .unwrap()
}

#[test]
fn dissolve_prefectures() {
    let (string, report) = run(&Config::default(), Format::GeoJson);
    let features = features(&string);

    assert_eq!(features.len(), 2);
    assert_eq!(name(&features[0]), "東京都");
    assert_eq!(name(&features[1]), "大阪府");

    let tokyo = features[0].geometry.as_ref().unwrap();
    match &tokyo.value {
        Value::MultiPolygon(polygons) => {
            assert_eq!(polygons.len(), 2);
            assert_eq!(
                polygons[0][0],
                vec![
                    vec![139.0, 35.0],
                    vec![140.0, 35.0],
                    vec![140.0, 36.0],
                    vec![139.0, 36.0],
                    vec![139.0, 35.0],
                ]
            );
            assert_eq!(polygons[1][0].len(), 4);
        }
        other => panic!("unexpected geometry {:?}", other),
    }

    assert_eq!(report.features_in, 5);
    assert_eq!(report.features_out, 2);
    assert_eq!(report.vertices_in, 22);
    assert_eq!(report.vertices_out, 17);
    assert_eq!(report.skipped, 0);
}

#[test]
fn dissolved_features_only_carry_the_region_name() {
    let (string, _) = run(&Config::default(), Format::GeoJson);
    for feature in features(&string) {
        let properties = feature.properties.unwrap();
        assert_eq!(properties.len(), 1);
        assert!(properties.contains_key("name"));
        assert!(feature.id.is_none());
    }
}

#[test]
fn simplify_every_feature() {
    let config = Config {
        dissolve: false,
        ..Config::default()
    };
    let (string, report) = run(&config, Format::GeoJson);
    let features = features(&string);

    assert_eq!(features.len(), 5);
    assert_eq!(report.vertices_out, 17 + 4);

    let chiyoda = features[0].properties.as_ref().unwrap();
    assert_eq!(chiyoda["N03_004"], "千代田区");
    assert!(string.contains(r#""id":27"#));

    let summit = features[4].geometry.as_ref().unwrap();
    assert_eq!(summit.value, Value::Point(vec![138.7274, 35.3606]));
}

#[test]
fn keep_collection_members() {
    let config = Config {
        dissolve: false,
        ..Config::default()
    };
    let (string, _) = run(&config, Format::PrettyGeoJson);
    assert!(string.contains(r#""name": "regions""#));
}

#[test]
fn write_json_lines() {
    let (string, _) = run(&Config::default(), Format::JsonLines);
    let lines: Vec<&str> = string.trim().split('\n').collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("東京都"));
    assert!(lines[1].contains("大阪府"));
    for line in lines {
        assert!(line.parse::<GeoJson>().is_ok());
    }
}

#[test]
fn large_tolerance_collapses_rings() {
    let config = Config {
        tolerance: 10.0,
        ..Config::default()
    };
    let (string, report) = run(&config, Format::GeoJson);
    assert_eq!(report.vertices_out, 8);
    assert!(string.contains("[[[139.0,35.0],[139.0,35.0]]]"));
}

#[test]
fn parallel_matches_sequential() {
    let parallel = Config {
        parallel: true,
        ..Config::default()
    };
    let (expected, _) = run(&Config::default(), Format::GeoJson);
    let (string, _) = run(&parallel, Format::GeoJson);
    assert_eq!(string, expected);
}

#[test]
fn reject_document_without_features() {
    let mut cursor = Cursor::new(Vec::new());
    let document = r#"{"type": "Feature", "properties": {}, "geometry": null}"#;
    let result = process_reader(
        document.as_bytes(),
        &mut cursor,
        &Config::default(),
        Format::GeoJson,
    );
    assert!(matches!(result, Err(Error::InvalidInput(_))));
    assert!(get_string(&mut cursor).is_empty());
}

const MALFORMED: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {
            "type": "Feature",
            "properties": "oops",
            "geometry": { "type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]] }
        },
        null,
        {
            "type": "Feature",
            "properties": { "N03_001": "京都府" },
            "geometry": { "type": "Polygon", "coordinates": [[[5, 5], [6, 5], [6, 6], [5, 5]]] }
        },
        {
            "type": "Feature",
            "properties": { "N03_001": "京都府" },
            "geometry": { "type": "Polygon" }
        }
    ]
}"#;

fn run_document(document: &str, config: &Config) -> (String, boundary_simplify::Report) {
    let mut cursor = Cursor::new(Vec::new());
    let processed =
        process_reader(document.as_bytes(), &mut cursor, config, Format::GeoJson).unwrap();
    (get_string(&mut cursor), processed.report)
}

#[test]
fn malformed_features_do_not_fail_the_document() {
    let (string, report) = run_document(MALFORMED, &Config::default());
    let features = features(&string);
    assert_eq!(features.len(), 1);
    assert_eq!(name(&features[0]), "京都府");
    assert_eq!(report.features_in, 3);

    let config = Config {
        dissolve: false,
        ..Config::default()
    };
    let (string, report) = run_document(MALFORMED, &config);
    assert_eq!(report.features_out, 3);
    assert_eq!(report.skipped, 1);
    assert!(string.contains(r#"{"type":"Polygon"}"#));
}
