//
// Copyright (c) IAM contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::feature::{
    Feature, FeatureAttribute, FeatureProperty, FeatureType, PropertyValue,
};
use crate::core::geom::{GeometryType, LineString, Point, Polygon};
use crate::core::map_settings::MapSettings;
use crate::core::process::{ProcessResult, ProcessStatus};
use crate::core::settings::FeatureSettings;
use crate::datasource::datasource::DatasourceInput;
use serde_json::Value;

/// Reserved id of the synthetic settings pseudo-feature. A feature with
/// this id is never real-world geometry.
pub const SETTINGS_FEATURE_ID: &str = "_iam_Settings";
/// Side-channel property keys of the container format
pub const MAP_SETTINGS_KEY: &str = "_iam_MapSettings";
pub const FEATURE_SETTINGS_KEY: &str = "_iam_FeatureSettings";
pub const ATTRIBUTES_KEY: &str = "_iam_Attributes";

/// GeoJSON adapter. Accepts a FeatureCollection or a single Feature;
/// understands the side-channel keys written by the exporter and plain
/// third-party GeoJSON alike.
pub struct GeoJsonDatasource {
    features: Vec<Feature>,
    properties: Vec<FeatureProperty>,
    attributes: Vec<FeatureAttribute>,
    settings: Vec<FeatureSettings>,
    map_settings: Option<MapSettings>,
}

impl GeoJsonDatasource {
    pub fn new(text: &str, result: &mut ProcessResult) -> GeoJsonDatasource {
        let mut ds = GeoJsonDatasource {
            features: Vec::new(),
            properties: Vec::new(),
            attributes: Vec::new(),
            settings: Vec::new(),
            map_settings: None,
        };
        let doc: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(err) => {
                result.fail("Could not read GeoJSON input", &err.to_string());
                return ds;
            }
        };
        match doc["type"].as_str() {
            Some("FeatureCollection") => {
                for feature in doc["features"].as_array().unwrap_or(&Vec::new()) {
                    ds.parse_feature(feature, result);
                }
            }
            Some("Feature") => ds.parse_feature(&doc, result),
            _ => {
                result.fail(
                    "Could not read GeoJSON input",
                    "Expected a FeatureCollection or Feature document",
                );
            }
        }
        ds
    }

    fn parse_feature(&mut self, value: &Value, result: &mut ProcessResult) {
        let id = match feature_id(value) {
            Some(id) => id,
            None => {
                result.add_detail(
                    ProcessStatus::Warn,
                    "Skipping feature without id or name property",
                );
                return;
            }
        };
        if id == SETTINGS_FEATURE_ID {
            self.parse_settings(value, result);
            return;
        }
        let geometry = match parse_geometry(&value["geometry"]) {
            Ok(geometry) => geometry,
            Err(err) => {
                result.add_detail(
                    ProcessStatus::Warn,
                    &format!("Skipping feature '{}': {}", id, err),
                );
                return;
            }
        };
        let feature_type = match geometry {
            GeometryType::Point(_) => FeatureType::Point,
            GeometryType::LineString(_) => FeatureType::LineString,
            GeometryType::Polygon(_) => FeatureType::Polygon,
        };
        if let Some(properties) = value["properties"].as_object() {
            for (key, prop_value) in properties {
                if key == ATTRIBUTES_KEY {
                    self.parse_attributes(&id, prop_value, result);
                    continue;
                }
                match scalar_value(prop_value) {
                    Some(scalar) => self.properties.push(FeatureProperty::new(
                        feature_type,
                        &id,
                        key,
                        scalar,
                    )),
                    None => result.add_detail(
                        ProcessStatus::Warn,
                        &format!("Skipping non-scalar property '{}' of feature '{}'", key, id),
                    ),
                }
            }
        }
        self.features.push(Feature::new(feature_type, &id, geometry));
    }

    fn parse_attributes(&mut self, id: &str, value: &Value, result: &mut ProcessResult) {
        for item in value.as_array().unwrap_or(&Vec::new()) {
            match serde_json::from_value::<FeatureAttribute>(item.clone()) {
                Ok(attribute) => self.attributes.push(attribute),
                Err(err) => result.add_detail(
                    ProcessStatus::Warn,
                    &format!("Skipping malformed attribute of feature '{}': {}", id, err),
                ),
            }
        }
    }

    fn parse_settings(&mut self, value: &Value, result: &mut ProcessResult) {
        let properties = &value["properties"];
        if !properties[MAP_SETTINGS_KEY].is_null() {
            match serde_json::from_value::<MapSettings>(properties[MAP_SETTINGS_KEY].clone()) {
                Ok(map_settings) => self.map_settings = Some(map_settings),
                Err(err) => result.add_detail(
                    ProcessStatus::Warn,
                    &format!("Skipping malformed map settings: {}", err),
                ),
            }
        }
        for item in properties[FEATURE_SETTINGS_KEY]
            .as_array()
            .unwrap_or(&Vec::new())
        {
            match serde_json::from_value::<FeatureSettings>(item.clone()) {
                Ok(settings) => self.settings.push(settings),
                Err(err) => result.add_detail(
                    ProcessStatus::Warn,
                    &format!("Skipping malformed feature settings record: {}", err),
                ),
            }
        }
    }
}

impl DatasourceInput for GeoJsonDatasource {
    fn features(&self) -> Vec<Feature> {
        self.features.clone()
    }
    fn feature_properties(&self) -> Vec<FeatureProperty> {
        self.properties.clone()
    }
    fn feature_attributes(&self) -> Vec<FeatureAttribute> {
        self.attributes.clone()
    }
    fn feature_settings(&self) -> Vec<FeatureSettings> {
        self.settings.clone()
    }
    fn map_settings(&self) -> Option<MapSettings> {
        self.map_settings.clone()
    }
}

fn feature_id(value: &Value) -> Option<String> {
    if let Some(id) = value["id"].as_str() {
        return Some(id.to_string());
    }
    if let Some(id) = value["id"].as_f64() {
        return Some(id.to_string());
    }
    let properties = &value["properties"];
    for key in ["id", "name"].iter() {
        if let Some(id) = properties[*key].as_str() {
            return Some(id.to_string());
        }
    }
    None
}

fn scalar_value(value: &Value) -> Option<PropertyValue> {
    match value {
        Value::String(s) => Some(PropertyValue::Text(s.clone())),
        Value::Number(n) => n.as_f64().map(PropertyValue::Number),
        Value::Bool(b) => Some(PropertyValue::Text(b.to_string())),
        _ => None,
    }
}

fn coordinate(value: &Value) -> Result<(f64, f64), String> {
    match (value[0].as_f64(), value[1].as_f64()) {
        (Some(x), Some(y)) => Ok((x, y)),
        _ => Err(format!("Invalid coordinate pair {}", value)),
    }
}

fn line_string(value: &Value) -> Result<LineString, String> {
    let pairs = value
        .as_array()
        .ok_or_else(|| "Expected coordinate array".to_string())?
        .iter()
        .map(coordinate)
        .collect::<Result<Vec<_>, String>>()?;
    Ok(LineString::from(pairs))
}

pub fn parse_geometry(value: &Value) -> Result<GeometryType, String> {
    let coordinates = &value["coordinates"];
    match value["type"].as_str() {
        Some("Point") => {
            let (x, y) = coordinate(coordinates)?;
            Ok(GeometryType::Point(Point::new(x, y)))
        }
        Some("LineString") => Ok(GeometryType::LineString(line_string(coordinates)?)),
        Some("Polygon") => {
            let mut rings = coordinates
                .as_array()
                .ok_or_else(|| "Expected ring array".to_string())?
                .iter()
                .map(line_string)
                .collect::<Result<Vec<_>, String>>()?;
            if rings.is_empty() {
                return Err("Polygon without rings".to_string());
            }
            let exterior = rings.remove(0);
            Ok(GeometryType::Polygon(Polygon::new(exterior, rings)))
        }
        Some(other) => Err(format!("Unsupported geometry type '{}'", other)),
        None => Err("Missing geometry".to_string()),
    }
}
