//
// Copyright (c) IAM contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::geom::{GeometryType, LineString, Polygon};
use crate::core::process::ProcessStatus;
use crate::service::map_export::{
    export_geojson, export_settings_json, geometry_json, ExportOptions,
};
use crate::service::map_service::{MapService, SourceFormat};
use crate::store::InsertMode;
use serde_json::Value;

const SAMPLE: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {
            "type": "Feature",
            "id": "bern",
            "geometry": {"type": "Point", "coordinates": [7.45, 46.95]},
            "properties": {"pop": 133000}
        },
        {
            "type": "Feature",
            "id": "l1",
            "geometry": {"type": "LineString", "coordinates": [[7.0, 47.0], [8.0, 47.0]]},
            "properties": {
                "_iam_Attributes": [
                    {"featureType": "LineString", "featureId": "l1", "name": "owner",
                     "value": "SBB", "fromYear": 1902}
                ]
            }
        },
        {
            "type": "Feature",
            "id": "_iam_Settings",
            "geometry": {"type": "Point", "coordinates": [0.0, 0.0]},
            "properties": {
                "_iam_MapSettings": {"title": "Railways"},
                "_iam_FeatureSettings": []
            }
        }
    ]
}"#;

fn sample_service() -> MapService {
    let mut service = MapService::new();
    let result = service.load_text(SourceFormat::GeoJson, SAMPLE, InsertMode::Overwrite);
    assert_eq!(result.status, ProcessStatus::Info);
    service
}

#[test]
fn test_export_document_shape() {
    let service = sample_service();
    let document = export_geojson(
        &service.store,
        &service.map_settings,
        &ExportOptions::default(),
    );
    let doc: Value = serde_json::from_str(&document).unwrap();
    assert_eq!(doc["type"], "FeatureCollection");
    let features = doc["features"].as_array().unwrap();
    // two real features plus the settings pseudo-feature
    assert_eq!(features.len(), 3);
    let settings = features.last().unwrap();
    assert_eq!(settings["id"], "_iam_Settings");
    assert_eq!(settings["properties"]["_iam_MapSettings"]["title"], "Railways");
    // standard settings are always part of the export
    assert_eq!(
        settings["properties"]["_iam_FeatureSettings"]
            .as_array()
            .unwrap()
            .len(),
        3
    );
    // the pseudo-feature sits at the bounding-box minimum corner
    assert_eq!(
        settings["geometry"]["coordinates"],
        json!([7.0, 46.95])
    );

    let line = features
        .iter()
        .find(|f| f["id"] == "l1")
        .unwrap();
    let attributes = line["properties"]["_iam_Attributes"].as_array().unwrap();
    assert_eq!(attributes.len(), 1);
    assert_eq!(attributes[0]["fromYear"], 1902);
}

#[test]
fn test_export_options() {
    let service = sample_service();
    let document = export_geojson(
        &service.store,
        &service.map_settings,
        &ExportOptions {
            with_attributes: false,
            with_settings: false,
        },
    );
    let doc: Value = serde_json::from_str(&document).unwrap();
    let features = doc["features"].as_array().unwrap();
    assert_eq!(features.len(), 2);
    assert!(features
        .iter()
        .all(|f| f["properties"].get("_iam_Attributes").is_none()));
}

#[test]
fn test_export_empty_store_pins_settings_to_origin() {
    let service = MapService::new();
    let document = export_geojson(
        &service.store,
        &service.map_settings,
        &ExportOptions::default(),
    );
    let doc: Value = serde_json::from_str(&document).unwrap();
    let features = doc["features"].as_array().unwrap();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0]["geometry"]["coordinates"], json!([0.0, 0.0]));
}

#[test]
fn test_export_import_roundtrip() {
    let service = sample_service();
    let document = export_geojson(
        &service.store,
        &service.map_settings,
        &ExportOptions::default(),
    );

    let mut restored = MapService::new();
    let result = restored.load_text(SourceFormat::GeoJson, &document, InsertMode::DropTable);
    assert_eq!(result.status, ProcessStatus::Info);
    assert_eq!(restored.store.table_sizes(), service.store.table_sizes());
    assert_eq!(restored.map_settings, service.map_settings);
    assert_eq!(
        restored.store.get_all_features(),
        service.store.get_all_features()
    );
    assert_eq!(
        restored.store.get_all_settings(),
        service.store.get_all_settings()
    );
}

#[test]
fn test_export_settings_json() {
    let service = sample_service();
    let document = export_settings_json(&service.store, &service.map_settings);
    let doc: Value = serde_json::from_str(&document).unwrap();
    assert_eq!(doc["_iam_MapSettings"]["title"], "Railways");
    assert_eq!(doc["_iam_FeatureSettings"].as_array().unwrap().len(), 3);
}

#[test]
fn test_geometry_json() {
    let line = GeometryType::LineString(LineString::from(vec![(7.0, 47.0), (8.0, 47.0)]));
    assert_eq!(
        geometry_json(&line),
        json!({"type": "LineString", "coordinates": [[7.0, 47.0], [8.0, 47.0]]})
    );

    let polygon = GeometryType::Polygon(Polygon::new(
        LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]),
        vec![LineString::from(vec![
            (0.2, 0.2),
            (0.4, 0.2),
            (0.4, 0.4),
            (0.2, 0.2),
        ])],
    ));
    let value = geometry_json(&polygon);
    assert_eq!(value["type"], "Polygon");
    assert_eq!(value["coordinates"].as_array().unwrap().len(), 2);
}
