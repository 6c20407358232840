//
// Copyright (c) IAM contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::feature::{Feature, FeatureAttribute, FeatureProperty, FeatureType};
use crate::core::process::{ProcessResult, ProcessStatus};
use crate::core::settings::{FeatureSettings, SettingsLevel, HAS_CHANGED, STANDARD_LEVEL};
use crate::core::table::{KeyFilter, MultiKeyTable, Record};
use crate::store::InsertMode;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

pub const FEATURE_KEYS: [&str; 2] = ["featureType", "featureId"];
pub const PROPERTY_KEYS: [&str; 3] = ["featureType", "featureId", "propertyName"];
pub const ATTRIBUTE_KEYS: [&str; 4] = ["featureType", "featureId", "propertyName", "propertyValue"];
pub const SETTINGS_KEYS: [&str; 4] = ["featureType", "levelType", "levelName", "levelValue"];

/// In-memory feature database: four multi-key tables with referential
/// integrity between features and their properties, attributes and styling
/// settings.
///
/// Mutation is synchronous and single-writer per bulk load; each table
/// carries its own lock, taken in a fixed order (features, properties,
/// attributes, settings) for the duration of the operation.
pub struct FeatureStore {
    pub(crate) features: RwLock<MultiKeyTable<Feature>>,
    pub(crate) properties: RwLock<MultiKeyTable<FeatureProperty>>,
    pub(crate) attributes: RwLock<MultiKeyTable<FeatureAttribute>>,
    pub(crate) settings: RwLock<MultiKeyTable<FeatureSettings>>,
}

impl FeatureStore {
    pub fn new() -> FeatureStore {
        let mut settings = MultiKeyTable::new(&SETTINGS_KEYS);
        Self::seed_standard_settings(&mut settings);
        FeatureStore {
            features: RwLock::new(MultiKeyTable::new(&FEATURE_KEYS)),
            properties: RwLock::new(MultiKeyTable::new(&PROPERTY_KEYS)),
            attributes: RwLock::new(MultiKeyTable::new(&ATTRIBUTE_KEYS)),
            settings: RwLock::new(settings),
        }
    }

    /// One standard-level setting per feature type always exists; it is only
    /// ever overwritten, never deleted
    fn seed_standard_settings(settings: &mut MultiKeyTable<FeatureSettings>) {
        for feature_type in FeatureType::ALL {
            settings.add_item(FeatureSettings::standard(feature_type));
        }
    }

    /// Record counts of (features, properties, attributes, settings)
    pub fn table_sizes(&self) -> (usize, usize, usize, usize) {
        (
            self.features.read().expect("poisoned lock").len(),
            self.properties.read().expect("poisoned lock").len(),
            self.attributes.read().expect("poisoned lock").len(),
            self.settings.read().expect("poisoned lock").len(),
        )
    }

    // Bulk loaders

    /// DROPTABLE reinitializes all four tables and re-seeds the standard
    /// settings before inserting
    pub fn load_features(
        &self,
        records: Vec<Feature>,
        mode: InsertMode,
        _result: &mut ProcessResult,
    ) {
        let mut features = self.features.write().expect("poisoned lock");
        let mut properties = self.properties.write().expect("poisoned lock");
        let mut attributes = self.attributes.write().expect("poisoned lock");
        let mut settings = self.settings.write().expect("poisoned lock");
        if mode == InsertMode::DropTable {
            features.init();
            properties.init();
            attributes.init();
            settings.init();
            Self::seed_standard_settings(&mut settings);
        }
        let count = records.len();
        for feature in records {
            features.add_item(feature);
        }
        info!("loaded {} features", count);
    }

    /// Properties referencing a feature not present in the features table
    /// are rejected with a WARN detail; the load continues. DROPTABLE also
    /// clears the denormalized property cache on every stored feature.
    pub fn load_features_properties(
        &self,
        records: Vec<FeatureProperty>,
        mode: InsertMode,
        result: &mut ProcessResult,
    ) {
        let mut features = self.features.write().expect("poisoned lock");
        let mut properties = self.properties.write().expect("poisoned lock");
        if mode == InsertMode::DropTable {
            properties.init();
            features.for_each_mut(|feature| feature.properties.clear());
        }
        for property in records {
            let feature_type = property.feature_type.to_string();
            match features.get_item_mut(&[&feature_type, &property.feature_id]) {
                Some(feature) => {
                    feature
                        .properties
                        .insert(property.name.clone(), property.value.clone());
                    properties.add_item(property);
                }
                None => {
                    result.add_detail(
                        ProcessStatus::Warn,
                        &format!(
                            "Property '{}' references unknown feature {}/{}",
                            property.name, feature_type, property.feature_id
                        ),
                    );
                }
            }
        }
    }

    /// Same referential integrity and DROPTABLE cache rules as properties.
    /// Attributes are non-unique per (type, id, name): only a fully equal
    /// record overwrites an existing one.
    pub fn load_features_attributes(
        &self,
        records: Vec<FeatureAttribute>,
        mode: InsertMode,
        result: &mut ProcessResult,
    ) {
        let mut features = self.features.write().expect("poisoned lock");
        let mut attributes = self.attributes.write().expect("poisoned lock");
        if mode == InsertMode::DropTable {
            attributes.init();
            features.for_each_mut(|feature| feature.attributes.clear());
        }
        for attribute in records {
            let feature_type = attribute.feature_type.to_string();
            match features.get_item_mut(&[&feature_type, &attribute.feature_id]) {
                Some(feature) => {
                    match feature
                        .attributes
                        .iter()
                        .position(|a| attribute.replaces(a))
                    {
                        Some(pos) => feature.attributes[pos] = attribute.clone(),
                        None => feature.attributes.push(attribute.clone()),
                    }
                    attributes.add_item(attribute);
                }
                None => {
                    result.add_detail(
                        ProcessStatus::Warn,
                        &format!(
                            "Attribute '{}' references unknown feature {}/{}",
                            attribute.name, feature_type, attribute.feature_id
                        ),
                    );
                }
            }
        }
    }

    /// DROPTABLE reinitializes the settings table and re-seeds the standard
    /// settings
    pub fn load_settings(
        &self,
        records: Vec<FeatureSettings>,
        mode: InsertMode,
        _result: &mut ProcessResult,
    ) {
        let mut settings = self.settings.write().expect("poisoned lock");
        if mode == InsertMode::DropTable {
            settings.init();
            Self::seed_standard_settings(&mut settings);
        }
        for setting in records {
            settings.add_item(setting);
        }
    }

    // Settings resolution

    /// Resolve the effective style of a feature for a year window.
    ///
    /// Starts from the standard-level setting of the feature type, merges
    /// matching attribute-level settings of all attributes whose validity
    /// window overlaps [year_from, year_to] in ascending `from_year` order
    /// (later wins), applies the `hasChanged` sentinel setting for
    /// attributes whose value changes inside the window, and finally merges
    /// the feature-level setting on top.
    pub fn get_settings_of_feature(
        &self,
        feature_type: FeatureType,
        feature_id: &str,
        year_from: i32,
        year_to: i32,
    ) -> Option<FeatureSettings> {
        let attributes = self.attributes.read().expect("poisoned lock");
        let settings = self.settings.read().expect("poisoned lock");
        let type_key = feature_type.as_str();
        let standard = settings.get_item(&[type_key, SettingsLevel::Standard.as_str(), STANDARD_LEVEL, ""])?;
        let mut current = standard.clone();

        let mut active: Vec<&FeatureAttribute> = attributes
            .get_all_items(&[
                KeyFilter::Equals(type_key.to_string()),
                KeyFilter::Equals(feature_id.to_string()),
                KeyFilter::Any,
                KeyFilter::Any,
            ])
            .into_iter()
            .filter(|attribute| attribute.overlaps_years(year_from, year_to))
            .collect();
        // stable sort keeps traversal order on equal from_year
        active.sort_by_key(|attribute| attribute.from_year.unwrap_or(i32::MIN));

        for attribute in active {
            if let Some(setting) = settings.get_item(&[
                type_key,
                SettingsLevel::Attribute.as_str(),
                &attribute.name,
                &attribute.value,
            ]) {
                current = setting.merge(&current);
            }
            if attribute.starts_within(year_from, year_to) {
                if let Some(setting) = settings.get_item(&[
                    type_key,
                    SettingsLevel::Attribute.as_str(),
                    &attribute.name,
                    HAS_CHANGED,
                ]) {
                    current = setting.merge(&current);
                }
            }
        }

        if let Some(setting) = settings.get_item(&[
            type_key,
            SettingsLevel::Feature.as_str(),
            feature_id,
            "",
        ]) {
            current = setting.merge(&current);
        }
        Some(current)
    }

    // Read queries

    pub fn get_feature(&self, feature_type: FeatureType, feature_id: &str) -> Option<Feature> {
        self.features
            .read()
            .expect("poisoned lock")
            .get_item(&[feature_type.as_str(), feature_id])
            .cloned()
    }

    pub fn get_all_features(&self) -> Vec<Feature> {
        self.features
            .read()
            .expect("poisoned lock")
            .get_all_items(&[KeyFilter::Any, KeyFilter::Any])
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn get_all_features_with_type(&self, feature_type: FeatureType) -> Vec<Feature> {
        self.features
            .read()
            .expect("poisoned lock")
            .get_all_items(&[
                KeyFilter::Equals(feature_type.to_string()),
                KeyFilter::Any,
            ])
            .into_iter()
            .cloned()
            .collect()
    }

    /// Distinct property names present for a feature type
    pub fn get_all_property_names(&self, feature_type: FeatureType) -> Vec<String> {
        self.properties
            .read()
            .expect("poisoned lock")
            .get_all_keys(&[
                KeyFilter::Equals(feature_type.to_string()),
                KeyFilter::Any,
                KeyFilter::Any,
            ])
    }

    /// Distinct attribute names present for a feature type
    pub fn get_all_attribute_names(&self, feature_type: FeatureType) -> Vec<String> {
        let attributes = self.attributes.read().expect("poisoned lock");
        let type_key = feature_type.as_str();
        let mut names = BTreeSet::new();
        for feature_id in attributes.get_keys(&[type_key]) {
            for name in attributes.get_keys(&[type_key, &feature_id]) {
                names.insert(name);
            }
        }
        names.into_iter().collect()
    }

    /// Distinct values of one attribute name for a feature type
    pub fn get_all_attribute_values(
        &self,
        feature_type: FeatureType,
        attribute_name: &str,
    ) -> Vec<String> {
        self.attributes
            .read()
            .expect("poisoned lock")
            .get_all_keys(&[
                KeyFilter::Equals(feature_type.to_string()),
                KeyFilter::Any,
                KeyFilter::Equals(attribute_name.to_string()),
                KeyFilter::Any,
            ])
    }

    /// Features owning an attribute (name, value) whose validity window
    /// overlaps [year_from, year_to]
    pub fn get_all_features_with_attributes(
        &self,
        feature_type: FeatureType,
        attribute_name: &str,
        attribute_value: &str,
        year_from: i32,
        year_to: i32,
    ) -> Vec<Feature> {
        let features = self.features.read().expect("poisoned lock");
        let attributes = self.attributes.read().expect("poisoned lock");
        let mut matches: BTreeMap<String, Feature> = BTreeMap::new();
        for attribute in attributes.get_all_items(&[
            KeyFilter::Equals(feature_type.to_string()),
            KeyFilter::Any,
            KeyFilter::Equals(attribute_name.to_string()),
            KeyFilter::Equals(attribute_value.to_string()),
        ]) {
            if !attribute.overlaps_years(year_from, year_to) {
                continue;
            }
            if let Some(feature) =
                features.get_item(&[feature_type.as_str(), &attribute.feature_id])
            {
                matches
                    .entry(attribute.feature_id.clone())
                    .or_insert_with(|| feature.clone());
            }
        }
        matches.into_iter().map(|(_, feature)| feature).collect()
    }

    /// All settings records, standard levels included
    pub fn get_all_settings(&self) -> Vec<FeatureSettings> {
        self.settings
            .read()
            .expect("poisoned lock")
            .get_all_items(&[KeyFilter::Any, KeyFilter::Any, KeyFilter::Any, KeyFilter::Any])
            .into_iter()
            .cloned()
            .collect()
    }

    // Bounding box over all feature geometries. An empty store yields
    // INFINITY minima and -INFINITY maxima (documented boundary behavior).

    pub fn get_min_longitude(&self) -> f64 {
        self.fold_coordinates(f64::INFINITY, |acc, (x, _)| acc.min(x))
    }

    pub fn get_max_longitude(&self) -> f64 {
        self.fold_coordinates(f64::NEG_INFINITY, |acc, (x, _)| acc.max(x))
    }

    pub fn get_min_latitude(&self) -> f64 {
        self.fold_coordinates(f64::INFINITY, |acc, (_, y)| acc.min(y))
    }

    pub fn get_max_latitude(&self) -> f64 {
        self.fold_coordinates(f64::NEG_INFINITY, |acc, (_, y)| acc.max(y))
    }

    fn fold_coordinates<F>(&self, init: f64, fold: F) -> f64
    where
        F: Fn(f64, (f64, f64)) -> f64,
    {
        let features = self.features.read().expect("poisoned lock");
        let mut acc = init;
        for feature in features.get_all_items(&[KeyFilter::Any, KeyFilter::Any]) {
            for coordinate in feature.geometry.coordinates() {
                acc = fold(acc, coordinate);
            }
        }
        acc
    }

    /// Smallest year mentioned by any attribute validity window
    pub fn get_attributes_minimum_year(&self) -> Option<i32> {
        self.fold_years(|min, year| match min {
            Some(m) => Some(m.min(year)),
            None => Some(year),
        })
    }

    /// Largest year mentioned by any attribute validity window
    pub fn get_attributes_maximum_year(&self) -> Option<i32> {
        self.fold_years(|max, year| match max {
            Some(m) => Some(m.max(year)),
            None => Some(year),
        })
    }

    fn fold_years<F>(&self, fold: F) -> Option<i32>
    where
        F: Fn(Option<i32>, i32) -> Option<i32>,
    {
        let attributes = self.attributes.read().expect("poisoned lock");
        let mut acc = None;
        for attribute in attributes.get_all_items(&[
            KeyFilter::Any,
            KeyFilter::Any,
            KeyFilter::Any,
            KeyFilter::Any,
        ]) {
            for year in [attribute.from_year, attribute.to_year].iter().flatten() {
                acc = fold(acc, *year);
            }
        }
        acc
    }

    /// Case-insensitive substring match over any property value of any
    /// feature
    pub fn search(&self, text: &str) -> Vec<Feature> {
        let needle = text.to_lowercase();
        let features = self.features.read().expect("poisoned lock");
        features
            .get_all_items(&[KeyFilter::Any, KeyFilter::Any])
            .into_iter()
            .filter(|feature| {
                feature
                    .properties
                    .values()
                    .any(|value| value.to_string().to_lowercase().contains(&needle))
            })
            .cloned()
            .collect()
    }
}

impl Default for FeatureStore {
    fn default() -> Self {
        FeatureStore::new()
    }
}
