//
// Copyright (c) IAM contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::geom::GeometryType;
use crate::core::map_settings::MapSettings;
use crate::datasource::geojson::{
    ATTRIBUTES_KEY, FEATURE_SETTINGS_KEY, MAP_SETTINGS_KEY, SETTINGS_FEATURE_ID,
};
use crate::store::FeatureStore;
use serde_json::Value;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ExportOptions {
    pub with_attributes: bool,
    pub with_settings: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            with_attributes: true,
            with_settings: true,
        }
    }
}

/// Export the store as one self-contained GeoJSON document: all features as
/// geometry+properties, attributes embedded under the side-channel key when
/// requested, plus a synthetic settings pseudo-feature at the bounding-box
/// minimum corner.
pub fn export_geojson(
    store: &FeatureStore,
    map_settings: &MapSettings,
    options: &ExportOptions,
) -> String {
    let mut features = Vec::new();
    for feature in store.get_all_features() {
        let mut properties = serde_json::Map::new();
        for (name, value) in &feature.properties {
            properties.insert(name.clone(), json!(value));
        }
        if options.with_attributes && !feature.attributes.is_empty() {
            properties.insert(ATTRIBUTES_KEY.to_string(), json!(feature.attributes));
        }
        features.push(json!({
            "type": "Feature",
            "id": feature.id,
            "geometry": geometry_json(&feature.geometry),
            "properties": properties,
        }));
    }
    if options.with_settings {
        let min_lon = store.get_min_longitude();
        let min_lat = store.get_min_latitude();
        let corner = if min_lon.is_finite() && min_lat.is_finite() {
            (min_lon, min_lat)
        } else {
            (0.0, 0.0)
        };
        features.push(json!({
            "type": "Feature",
            "id": SETTINGS_FEATURE_ID,
            "geometry": {"type": "Point", "coordinates": [corner.0, corner.1]},
            "properties": {
                (MAP_SETTINGS_KEY): map_settings,
                (FEATURE_SETTINGS_KEY): store.get_all_settings(),
            },
        }));
    }
    serde_json::to_string_pretty(&json!({
        "type": "FeatureCollection",
        "features": features,
    }))
    .expect("GeoJSON serialization")
}

/// Settings-only export document
pub fn export_settings_json(store: &FeatureStore, map_settings: &MapSettings) -> String {
    serde_json::to_string_pretty(&json!({
        (MAP_SETTINGS_KEY): map_settings,
        (FEATURE_SETTINGS_KEY): store.get_all_settings(),
    }))
    .expect("settings serialization")
}

fn coordinates_json(pairs: &[(f64, f64)]) -> Value {
    Value::Array(pairs.iter().map(|(x, y)| json!([x, y])).collect())
}

pub fn geometry_json(geometry: &GeometryType) -> Value {
    match geometry {
        GeometryType::Point(p) => json!({
            "type": "Point",
            "coordinates": [p.x(), p.y()],
        }),
        GeometryType::LineString(l) => {
            let pairs: Vec<(f64, f64)> = l.coords().map(|c| (c.x, c.y)).collect();
            json!({"type": "LineString", "coordinates": coordinates_json(&pairs)})
        }
        GeometryType::Polygon(p) => {
            let mut rings = Vec::new();
            let exterior: Vec<(f64, f64)> = p.exterior().coords().map(|c| (c.x, c.y)).collect();
            rings.push(coordinates_json(&exterior));
            for interior in p.interiors() {
                let ring: Vec<(f64, f64)> = interior.coords().map(|c| (c.x, c.y)).collect();
                rings.push(coordinates_json(&ring));
            }
            json!({"type": "Polygon", "coordinates": rings})
        }
    }
}
