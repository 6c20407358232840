//
// Copyright (c) IAM contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::geom::GeometryType;
use crate::core::table::Record;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum FeatureType {
    Point,
    LineString,
    Polygon,
}

impl FeatureType {
    pub const ALL: [FeatureType; 3] = [
        FeatureType::Point,
        FeatureType::LineString,
        FeatureType::Polygon,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureType::Point => "Point",
            FeatureType::LineString => "LineString",
            FeatureType::Polygon => "Polygon",
        }
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureType {
    type Err = String;
    fn from_str(s: &str) -> Result<FeatureType, String> {
        match s {
            "Point" => Ok(FeatureType::Point),
            "LineString" => Ok(FeatureType::LineString),
            "Polygon" => Ok(FeatureType::Polygon),
            _ => Err(format!("Unknown feature type '{}'", s)),
        }
    }
}

/// Scalar property value (string or number)
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Number(f64),
    Text(String),
}

impl PropertyValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) => Some(*n),
            PropertyValue::Text(s) => s.parse().ok(),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Number(n) => write!(f, "{}", n),
            PropertyValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> PropertyValue {
        PropertyValue::Text(s.to_string())
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> PropertyValue {
        PropertyValue::Number(n)
    }
}

/// Geographic feature with immutable geometry and denormalized
/// property/attribute caches maintained by the store loaders
#[derive(Clone, PartialEq, Debug)]
pub struct Feature {
    pub feature_type: FeatureType,
    pub id: String,
    pub geometry: GeometryType,
    pub properties: BTreeMap<String, PropertyValue>,
    pub attributes: Vec<FeatureAttribute>,
}

impl Feature {
    pub fn new(feature_type: FeatureType, id: &str, geometry: GeometryType) -> Feature {
        Feature {
            feature_type,
            id: id.to_string(),
            geometry,
            properties: BTreeMap::new(),
            attributes: Vec::new(),
        }
    }
}

impl Record for Feature {
    fn key(&self, field: &str) -> String {
        match field {
            "featureType" => self.feature_type.to_string(),
            "featureId" => self.id.clone(),
            _ => String::new(),
        }
    }
    fn replaces(&self, other: &Self) -> bool {
        self.feature_type == other.feature_type && self.id == other.id
    }
}

/// Named scalar property of one feature. Replacement identity ignores the
/// value: the same name on the same feature is the same property.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureProperty {
    pub feature_type: FeatureType,
    pub feature_id: String,
    pub name: String,
    pub value: PropertyValue,
}

impl FeatureProperty {
    pub fn new(
        feature_type: FeatureType,
        feature_id: &str,
        name: &str,
        value: PropertyValue,
    ) -> FeatureProperty {
        FeatureProperty {
            feature_type,
            feature_id: feature_id.to_string(),
            name: name.to_string(),
            value,
        }
    }
}

impl Record for FeatureProperty {
    fn key(&self, field: &str) -> String {
        match field {
            "featureType" => self.feature_type.to_string(),
            "featureId" => self.feature_id.clone(),
            "propertyName" => self.name.clone(),
            _ => String::new(),
        }
    }
    fn replaces(&self, other: &Self) -> bool {
        self.feature_type == other.feature_type
            && self.feature_id == other.feature_id
            && self.name == other.name
    }
}

/// Time-varying attribute of one feature. Several attributes with the same
/// name may coexist, representing value changes over time; replacement
/// identity therefore requires all fields to be equal.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureAttribute {
    pub feature_type: FeatureType,
    pub feature_id: String,
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub from_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub from_month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub from_day: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub to_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub to_month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub to_day: Option<u32>,
}

impl FeatureAttribute {
    pub fn new(
        feature_type: FeatureType,
        feature_id: &str,
        name: &str,
        value: &str,
    ) -> FeatureAttribute {
        FeatureAttribute {
            feature_type,
            feature_id: feature_id.to_string(),
            name: name.to_string(),
            value: value.to_string(),
            from_year: None,
            from_month: None,
            from_day: None,
            to_year: None,
            to_month: None,
            to_day: None,
        }
    }

    pub fn with_years(mut self, from_year: Option<i32>, to_year: Option<i32>) -> FeatureAttribute {
        self.from_year = from_year;
        self.to_year = to_year;
        self
    }

    /// Validity window overlaps [year_from, year_to]. An attribute is
    /// excluded only if it starts after the window or ends before it;
    /// absent bounds are unbounded.
    pub fn overlaps_years(&self, year_from: i32, year_to: i32) -> bool {
        !(self.from_year.map_or(false, |y| y > year_to)
            || self.to_year.map_or(false, |y| y < year_from))
    }

    /// The value change happens inside [year_from, year_to]
    pub fn starts_within(&self, year_from: i32, year_to: i32) -> bool {
        self.from_year
            .map_or(false, |y| y >= year_from && y <= year_to)
    }
}

impl Record for FeatureAttribute {
    fn key(&self, field: &str) -> String {
        match field {
            "featureType" => self.feature_type.to_string(),
            "featureId" => self.feature_id.clone(),
            "propertyName" => self.name.clone(),
            "propertyValue" => self.value.clone(),
            // group-by fields beyond the primary keys
            "fromYear" => self.from_year.map(|y| y.to_string()).unwrap_or_default(),
            "toYear" => self.to_year.map(|y| y.to_string()).unwrap_or_default(),
            _ => String::new(),
        }
    }
    fn replaces(&self, other: &Self) -> bool {
        self == other
    }
}
