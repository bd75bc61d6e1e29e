//! End-to-end conversion tests through the library API

mod common;

use common::{encode, site_plan, DxfBuilder};
use dxf_geojson::convert::{convert, convert_in, ConvertRequest, DEFAULT_MAX_PAYLOAD_BYTES};
use dxf_geojson::ConvertError;
use serde_json::Value;

fn request(content: &str) -> ConvertRequest {
    ConvertRequest {
        dxf_base64: encode(content.as_bytes()),
        source_crs: None,
        target_crs: Some("EPSG:4326".into()),
        keep_original_coords: false,
        include_ogr_fields: true,
    }
}

fn run(request: &ConvertRequest) -> Value {
    let collection = convert(request, DEFAULT_MAX_PAYLOAD_BYTES).unwrap();
    serde_json::to_value(&collection).unwrap()
}

fn coordinates(value: &Value) -> Vec<Value> {
    value["features"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["geometry"]["coordinates"].clone())
        .collect()
}

#[test]
fn test_feature_collection_shape() {
    let value = run(&request(&site_plan()));
    assert_eq!(value["type"], "FeatureCollection");
    let features = value["features"].as_array().unwrap();
    assert_eq!(features.len(), 5);
    for feature in features {
        assert_eq!(feature["type"], "Feature");
        assert!(feature["geometry"].is_object());
        assert!(feature["properties"]["layer"].is_string());
    }
    assert_eq!(value["crs"]["type"], "name");
    assert_eq!(value["crs"]["properties"]["name"], "EPSG:4326");
}

#[test]
fn test_bbox_covers_drawing() {
    let value = run(&request(&site_plan()));
    let bbox: Vec<f64> = serde_json::from_value(value["bbox"].clone()).unwrap();
    assert_eq!(bbox, vec![0.0, 0.0, 100.0, 50.0]);
}

#[test]
fn test_keep_original_coords() {
    let mut keep = request(&site_plan());
    keep.keep_original_coords = true;
    keep.source_crs = Some("EPSG:31982".into());
    let value = run(&keep);

    assert!(value.get("crs").is_none());
    assert_eq!(value["features"][0]["geometry"]["coordinates"][1][0], 100.0);
}

#[test]
fn test_equal_crs_means_no_transform() {
    let plain = run(&request(&site_plan()));

    let mut same = request(&site_plan());
    same.source_crs = Some("EPSG:4326".into());
    let value = run(&same);
    assert_eq!(coordinates(&value), coordinates(&plain));
}

#[test]
fn test_reprojection_to_wgs84() {
    let content = DxfBuilder::new()
        .begin_entities()
        .point("Survey", 480_000.0, 6_680_000.0)
        .end_section()
        .finish();
    let mut reproject = request(&content);
    reproject.source_crs = Some("EPSG:31982".into());
    let value = run(&reproject);

    let position = &value["features"][0]["geometry"]["coordinates"];
    let lon = position[0].as_f64().unwrap();
    let lat = position[1].as_f64().unwrap();
    assert!((-52.0..-50.0).contains(&lon), "lon {}", lon);
    assert!((-31.0..-29.0).contains(&lat), "lat {}", lat);
    assert_eq!(value["bbox"][0].as_f64(), Some(lon));
}

#[test]
fn test_invalid_crs_is_rejected() {
    let mut bad = request(&site_plan());
    bad.source_crs = Some("EPSG:notanumber".into());
    let err = convert(&bad, DEFAULT_MAX_PAYLOAD_BYTES).unwrap_err();
    assert_eq!(err.status_code(), 400);
    assert!(err.to_string().contains("EPSG:notanumber"));
}

#[test]
fn test_unreadable_payload() {
    let err = convert(&request("this is not a drawing"), DEFAULT_MAX_PAYLOAD_BYTES).unwrap_err();
    assert!(matches!(err, ConvertError::Unreadable(_)));
    assert_eq!(err.status_code(), 422);
}

#[test]
fn test_payload_limit() {
    let err = convert(&request(&site_plan()), 16).unwrap_err();
    assert!(matches!(err, ConvertError::PayloadTooLarge { limit: 16 }));
}

#[test]
fn test_fields_can_be_excluded() {
    let mut lean = request(&site_plan());
    lean.include_ogr_fields = false;
    let value = run(&lean);

    let label = value["features"]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["properties"]["Text"] == "Lot 7")
        .unwrap();
    let props = label["properties"].as_object().unwrap();
    let keys: Vec<_> = props.keys().map(String::as_str).collect();
    assert_eq!(keys, ["layer", "Text", "TEXT"]);
    assert_eq!(props["TEXT"], "Lot 7");
    assert!(props.get("Layer").is_none());
}

#[test]
fn test_features_keep_file_order_in_one_layer() {
    let value = run(&request(&site_plan()));
    let features = value["features"].as_array().unwrap();
    for feature in features {
        assert_eq!(feature["properties"]["layer"], "entities");
    }
    let drawing_layers: Vec<_> = features
        .iter()
        .map(|f| f["properties"]["Layer"].as_str().unwrap())
        .collect();
    assert_eq!(drawing_layers, ["Roads", "Roads", "Parcels", "Labels", "Trees"]);
}

#[test]
fn test_empty_target_crs_has_no_crs_member() {
    let mut blank = request(&site_plan());
    blank.target_crs = Some(String::new());
    let value = run(&blank);
    assert!(value.get("crs").is_none());
    assert_eq!(value["features"].as_array().unwrap().len(), 5);

    blank.target_crs = None;
    assert!(run(&blank).get("crs").is_none());
}

#[test]
fn test_staging_directory_is_removed() {
    let root = tempfile::tempdir().unwrap();
    let is_empty = || std::fs::read_dir(root.path()).unwrap().next().is_none();

    let err = convert_in(root.path(), &request("not a drawing"), DEFAULT_MAX_PAYLOAD_BYTES)
        .unwrap_err();
    assert!(matches!(err, ConvertError::Unreadable(_)));
    assert!(is_empty());

    let mut bad = request(&site_plan());
    bad.source_crs = Some("nonsense".into());
    let err = convert_in(root.path(), &bad, DEFAULT_MAX_PAYLOAD_BYTES).unwrap_err();
    assert!(matches!(err, ConvertError::InvalidCrs { .. }));
    assert!(is_empty());

    convert_in(root.path(), &request(&site_plan()), DEFAULT_MAX_PAYLOAD_BYTES).unwrap();
    assert!(is_empty());
}

#[test]
fn test_oversized_block_array_is_dropped() {
    let content = DxfBuilder::new()
        .begin_blocks()
        .begin_block("B", (0.0, 0.0))
        .point("0", 0.0, 0.0)
        .end_block()
        .end_section()
        .begin_entities()
        .insert("Grid", "B", (0.0, 0.0))
        .pair(70, 32767)
        .pair(71, 32767)
        .line("Roads", (0.0, 0.0), (1.0, 1.0))
        .end_section()
        .finish();
    let value = run(&request(&content));

    let features = value["features"].as_array().unwrap();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0]["properties"]["Layer"], "Roads");
}
