//
// Copyright (c) IAM contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::feature::{Feature, FeatureAttribute, FeatureProperty};
use crate::core::map_settings::MapSettings;
use crate::core::process::{ProcessResult, ProcessStatus};
use crate::core::settings::FeatureSettings;
use crate::datasource::datasource::DatasourceInput;
use crate::datasource::geojson::{FEATURE_SETTINGS_KEY, MAP_SETTINGS_KEY};
use serde_json::Value;

/// Settings-only JSON document adapter:
/// `{ "_iam_MapSettings": {...}, "_iam_FeatureSettings": [...] }`
pub struct JsonSettingsDatasource {
    settings: Vec<FeatureSettings>,
    map_settings: Option<MapSettings>,
}

impl JsonSettingsDatasource {
    pub fn new(text: &str, result: &mut ProcessResult) -> JsonSettingsDatasource {
        let mut ds = JsonSettingsDatasource {
            settings: Vec::new(),
            map_settings: None,
        };
        let doc: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(err) => {
                result.fail("Could not read settings input", &err.to_string());
                return ds;
            }
        };
        if !doc[MAP_SETTINGS_KEY].is_null() {
            match serde_json::from_value::<MapSettings>(doc[MAP_SETTINGS_KEY].clone()) {
                Ok(map_settings) => ds.map_settings = Some(map_settings),
                Err(err) => result.add_detail(
                    ProcessStatus::Warn,
                    &format!("Skipping malformed map settings: {}", err),
                ),
            }
        }
        for item in doc[FEATURE_SETTINGS_KEY].as_array().unwrap_or(&Vec::new()) {
            match serde_json::from_value::<FeatureSettings>(item.clone()) {
                Ok(settings) => ds.settings.push(settings),
                Err(err) => result.add_detail(
                    ProcessStatus::Warn,
                    &format!("Skipping malformed feature settings record: {}", err),
                ),
            }
        }
        ds
    }
}

impl DatasourceInput for JsonSettingsDatasource {
    fn features(&self) -> Vec<Feature> {
        Vec::new()
    }
    fn feature_properties(&self) -> Vec<FeatureProperty> {
        Vec::new()
    }
    fn feature_attributes(&self) -> Vec<FeatureAttribute> {
        Vec::new()
    }
    fn feature_settings(&self) -> Vec<FeatureSettings> {
        self.settings.clone()
    }
    fn map_settings(&self) -> Option<MapSettings> {
        self.map_settings.clone()
    }
}
