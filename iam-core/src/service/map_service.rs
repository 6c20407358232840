//
// Copyright (c) IAM contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::config::{ApplicationCfg, Config};
use crate::core::map_settings::MapSettings;
use crate::core::process::ProcessResult;
use crate::datasource::{
    CsvAttributeDatasource, CsvPropertyDatasource, DatasourceInput, GeoJsonDatasource,
    JsonSettingsDatasource, KmlDatasource,
};
use crate::store::{FeatureStore, InsertMode};
use std::fmt;
use std::fs::File;
use std::io::prelude::*;
use std::str::FromStr;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SourceFormat {
    GeoJson,
    Kml,
    CsvProperties,
    CsvAttributes,
    SettingsJson,
}

impl SourceFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::GeoJson => "geojson",
            SourceFormat::Kml => "kml",
            SourceFormat::CsvProperties => "csv-properties",
            SourceFormat::CsvAttributes => "csv-attributes",
            SourceFormat::SettingsJson => "settings",
        }
    }

    /// Derive the format from a file extension. CSV files are ambiguous and
    /// need an explicit format.
    pub fn from_path(path: &str) -> Result<SourceFormat, String> {
        let extension = path.rsplit('.').next().unwrap_or("").to_lowercase();
        match extension.as_str() {
            "geojson" => Ok(SourceFormat::GeoJson),
            "kml" => Ok(SourceFormat::Kml),
            "json" => Ok(SourceFormat::SettingsJson),
            "csv" => Err(format!(
                "Ambiguous format for '{}': specify csv-properties or csv-attributes",
                path
            )),
            _ => Err(format!("Cannot derive format of '{}'", path)),
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<SourceFormat, String> {
        match s {
            "geojson" => Ok(SourceFormat::GeoJson),
            "kml" => Ok(SourceFormat::Kml),
            "csv-properties" => Ok(SourceFormat::CsvProperties),
            "csv-attributes" => Ok(SourceFormat::CsvAttributes),
            "settings" => Ok(SourceFormat::SettingsJson),
            _ => Err(format!("Unknown datasource format '{}'", s)),
        }
    }
}

/// Facade over one feature store and the current map settings: dispatches
/// raw payloads to the matching adapter and runs the bulk loads in order
/// (features, properties, attributes, settings).
pub struct MapService {
    pub store: FeatureStore,
    pub map_settings: MapSettings,
}

impl MapService {
    pub fn new() -> MapService {
        MapService {
            store: FeatureStore::new(),
            map_settings: MapSettings::default(),
        }
    }

    pub fn load_text(
        &mut self,
        format: SourceFormat,
        text: &str,
        mode: InsertMode,
    ) -> ProcessResult {
        let mut result = ProcessResult::new(&format!("Loaded {} data", format));
        let datasource: Box<dyn DatasourceInput> = match format {
            SourceFormat::GeoJson => Box::new(GeoJsonDatasource::new(text, &mut result)),
            SourceFormat::Kml => Box::new(KmlDatasource::new(text, &mut result)),
            SourceFormat::CsvProperties => Box::new(CsvPropertyDatasource::new(text, &mut result)),
            SourceFormat::CsvAttributes => Box::new(CsvAttributeDatasource::new(text, &mut result)),
            SourceFormat::SettingsJson => Box::new(JsonSettingsDatasource::new(text, &mut result)),
        };
        if result.is_error() {
            return result;
        }
        // DROPTABLE only affects the tables the source actually delivers:
        // an attributes-only file must not wipe the features table
        let features = datasource.features();
        let properties = datasource.feature_properties();
        let attributes = datasource.feature_attributes();
        let settings = datasource.feature_settings();
        let features_mode = table_mode(mode, features.is_empty());
        let properties_mode = table_mode(mode, properties.is_empty());
        let attributes_mode = table_mode(mode, attributes.is_empty());
        let settings_mode = table_mode(mode, settings.is_empty());
        self.store.load_features(features, features_mode, &mut result);
        self.store
            .load_features_properties(properties, properties_mode, &mut result);
        self.store
            .load_features_attributes(attributes, attributes_mode, &mut result);
        self.store.load_settings(settings, settings_mode, &mut result);
        if let Some(map_settings) = datasource.map_settings() {
            self.map_settings = map_settings.merge(&self.map_settings);
        }
        result
    }

    pub fn load_file(
        &mut self,
        path: &str,
        format: Option<SourceFormat>,
        mode: InsertMode,
    ) -> ProcessResult {
        let format = match format.map_or_else(|| SourceFormat::from_path(path), Ok) {
            Ok(format) => format,
            Err(err) => {
                let mut result = ProcessResult::new("Loading data");
                result.fail("Could not derive datasource format", &err);
                return result;
            }
        };
        let mut text = String::new();
        match File::open(path) {
            Ok(mut file) => {
                if let Err(err) = file.read_to_string(&mut text) {
                    let mut result = ProcessResult::new("Loading data");
                    result.fail(
                        &format!("Could not read file '{}'", path),
                        &err.to_string(),
                    );
                    return result;
                }
            }
            Err(err) => {
                let mut result = ProcessResult::new("Loading data");
                result.fail(
                    &format!("Could not open file '{}'", path),
                    &err.to_string(),
                );
                return result;
            }
        }
        self.load_text(format, &text, mode)
    }
}

/// An empty record list downgrades DROPTABLE to OVERWRITE so the mode never
/// clears a table its source does not feed
fn table_mode(mode: InsertMode, empty: bool) -> InsertMode {
    if empty {
        InsertMode::Overwrite
    } else {
        mode
    }
}

impl Default for MapService {
    fn default() -> Self {
        MapService::new()
    }
}

impl<'a> Config<'a, ApplicationCfg> for MapService {
    fn from_config(config: &ApplicationCfg) -> Result<Self, String> {
        Ok(MapService {
            store: FeatureStore::new(),
            map_settings: MapSettings::from_config(&config.map)?,
        })
    }
    fn gen_config() -> String {
        crate::core::config::DEFAULT_CONFIG.to_string()
    }
}
