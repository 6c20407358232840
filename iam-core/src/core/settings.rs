//
// Copyright (c) IAM contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::color::Color;
use crate::core::feature::FeatureType;
use crate::core::table::Record;
use std::fmt;
use std::str::FromStr;

/// Level name of the standard settings record
pub const STANDARD_LEVEL: &str = "Standard";
/// Attribute-level sentinel value applied in the year an attribute changes
pub const HAS_CHANGED: &str = "hasChanged";

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum SettingsLevel {
    Standard,
    Attribute,
    Feature,
}

impl SettingsLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingsLevel::Standard => "Standard",
            SettingsLevel::Attribute => "Attribute",
            SettingsLevel::Feature => "Feature",
        }
    }
}

impl fmt::Display for SettingsLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingsLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<SettingsLevel, String> {
        match s {
            "Standard" => Ok(SettingsLevel::Standard),
            "Attribute" => Ok(SettingsLevel::Attribute),
            "Feature" => Ok(SettingsLevel::Feature),
            _ => Err(format!("Unknown settings level '{}'", s)),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointShape {
    Circle,
    Square,
    Triangle,
    Star,
    Cross,
}

/// Stroke settings. Undefined fields mean "unspecified - do not override
/// when merging".
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Border {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    /// Width in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash1: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash2: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash3: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash4: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash_offset: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_cap: Option<LineCap>,
}

impl Border {
    pub fn merge(&self, master: &Border) -> Border {
        Border {
            color: self.color.or(master.color),
            width: self.width.or(master.width),
            dash1: self.dash1.or(master.dash1),
            dash2: self.dash2.or(master.dash2),
            dash3: self.dash3.or(master.dash3),
            dash4: self.dash4.or(master.dash4),
            dash_offset: self.dash_offset.or(master.dash_offset),
            line_cap: self.line_cap.or(master.line_cap),
        }
    }
}

#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset_y: Option<f64>,
}

impl TextSettings {
    pub fn merge(&self, master: &TextSettings) -> TextSettings {
        TextSettings {
            font: self.font.clone().or_else(|| master.font.clone()),
            size: self.size.or(master.size),
            color: self.color.or(master.color),
            offset_x: self.offset_x.or(master.offset_x),
            offset_y: self.offset_y.or(master.offset_y),
        }
    }
}

#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PointStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<PointShape>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Color>,
    pub border: Border,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    /// Inner radius for star shapes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius2: Option<f64>,
    /// Number of points for star/regular shapes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub displacement_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub displacement_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
}

impl PointStyle {
    pub fn merge(&self, master: &PointStyle) -> PointStyle {
        PointStyle {
            shape: self.shape.or(master.shape),
            fill: self.fill.or(master.fill),
            border: self.border.merge(&master.border),
            radius: self.radius.or(master.radius),
            radius2: self.radius2.or(master.radius2),
            points: self.points.or(master.points),
            angle: self.angle.or(master.angle),
            displacement_x: self.displacement_x.or(master.displacement_x),
            displacement_y: self.displacement_y.or(master.displacement_y),
            rotation: self.rotation.or(master.rotation),
        }
    }
}

/// Two independent strokes: the line itself and an optional wider casing
/// drawn below it
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineStringStyle {
    pub line: Border,
    pub casing: Border,
}

impl LineStringStyle {
    pub fn merge(&self, master: &LineStringStyle) -> LineStringStyle {
        LineStringStyle {
            line: self.line.merge(&master.line),
            casing: self.casing.merge(&master.casing),
        }
    }
}

#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolygonStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Color>,
    pub border: Border,
}

impl PolygonStyle {
    pub fn merge(&self, master: &PolygonStyle) -> PolygonStyle {
        PolygonStyle {
            fill: self.fill.or(master.fill),
            border: self.border.merge(&master.border),
        }
    }
}

/// Geometry-specific style payload
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StyleSettings {
    Point(PointStyle),
    LineString(LineStringStyle),
    Polygon(PolygonStyle),
}

impl StyleSettings {
    pub fn empty(feature_type: FeatureType) -> StyleSettings {
        match feature_type {
            FeatureType::Point => StyleSettings::Point(PointStyle::default()),
            FeatureType::LineString => StyleSettings::LineString(LineStringStyle::default()),
            FeatureType::Polygon => StyleSettings::Polygon(PolygonStyle::default()),
        }
    }

    pub fn merge(&self, master: &StyleSettings) -> StyleSettings {
        match (self, master) {
            (StyleSettings::Point(a), StyleSettings::Point(b)) => StyleSettings::Point(a.merge(b)),
            (StyleSettings::LineString(a), StyleSettings::LineString(b)) => {
                StyleSettings::LineString(a.merge(b))
            }
            (StyleSettings::Polygon(a), StyleSettings::Polygon(b)) => {
                StyleSettings::Polygon(a.merge(b))
            }
            // mismatched variants keep the override unchanged
            _ => self.clone(),
        }
    }
}

/// Style settings record. Identity is (featureType, levelType, levelName,
/// levelValue); `level_name`/`level_value` semantics depend on the level:
/// Standard -> ("Standard", ""), Attribute -> (attribute name, attribute
/// value or the `hasChanged` sentinel), Feature -> (feature id, "").
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSettings {
    pub feature_type: FeatureType,
    pub level: SettingsLevel,
    pub level_name: String,
    pub level_value: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub show_feature: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub show_text: Option<bool>,
    #[serde(default)]
    pub text: TextSettings,
    pub style: StyleSettings,
}

impl FeatureSettings {
    /// The seeded default style for a feature type. Exactly one such record
    /// exists per feature type at all times.
    pub fn standard(feature_type: FeatureType) -> FeatureSettings {
        let black = Color::new(0, 0, 0, 1.0);
        let style = match feature_type {
            FeatureType::Point => StyleSettings::Point(PointStyle {
                shape: Some(PointShape::Circle),
                fill: Some(Color::new(200, 200, 200, 1.0)),
                border: Border {
                    color: Some(black),
                    width: Some(1.0),
                    ..Default::default()
                },
                radius: Some(5.0),
                ..Default::default()
            }),
            FeatureType::LineString => StyleSettings::LineString(LineStringStyle {
                line: Border {
                    color: Some(black),
                    width: Some(2.0),
                    ..Default::default()
                },
                casing: Border::default(),
            }),
            FeatureType::Polygon => StyleSettings::Polygon(PolygonStyle {
                fill: Some(Color::new(220, 220, 220, 0.6)),
                border: Border {
                    color: Some(black),
                    width: Some(1.0),
                    ..Default::default()
                },
            }),
        };
        FeatureSettings {
            feature_type,
            level: SettingsLevel::Standard,
            level_name: STANDARD_LEVEL.to_string(),
            level_value: String::new(),
            show_feature: Some(true),
            show_text: Some(false),
            text: TextSettings {
                font: Some("sans-serif".to_string()),
                size: Some(10.0),
                color: Some(black),
                offset_x: None,
                offset_y: None,
            },
            style,
        }
    }

    /// Empty attribute-level override for (attribute name, attribute value)
    pub fn attribute(feature_type: FeatureType, name: &str, value: &str) -> FeatureSettings {
        FeatureSettings {
            feature_type,
            level: SettingsLevel::Attribute,
            level_name: name.to_string(),
            level_value: value.to_string(),
            show_feature: None,
            show_text: None,
            text: TextSettings::default(),
            style: StyleSettings::empty(feature_type),
        }
    }

    /// Empty feature-level override for one feature id
    pub fn feature(feature_type: FeatureType, feature_id: &str) -> FeatureSettings {
        FeatureSettings {
            feature_type,
            level: SettingsLevel::Feature,
            level_name: feature_id.to_string(),
            level_value: String::new(),
            show_feature: None,
            show_text: None,
            text: TextSettings::default(),
            style: StyleSettings::empty(feature_type),
        }
    }

    /// Right-biased merge: every field defined on `self` wins, `master`
    /// only fills the undefined ones. Always returns a new value; neither
    /// input is mutated.
    pub fn merge(&self, master: &FeatureSettings) -> FeatureSettings {
        FeatureSettings {
            feature_type: self.feature_type,
            level: self.level,
            level_name: self.level_name.clone(),
            level_value: self.level_value.clone(),
            show_feature: self.show_feature.or(master.show_feature),
            show_text: self.show_text.or(master.show_text),
            text: self.text.merge(&master.text),
            style: self.style.merge(&master.style),
        }
    }
}

impl Record for FeatureSettings {
    fn key(&self, field: &str) -> String {
        match field {
            "featureType" => self.feature_type.to_string(),
            "levelType" => self.level.to_string(),
            "levelName" => self.level_name.clone(),
            "levelValue" => self.level_value.clone(),
            _ => String::new(),
        }
    }
    fn replaces(&self, other: &Self) -> bool {
        self.feature_type == other.feature_type
            && self.level == other.level
            && self.level_name == other.level_name
            && self.level_value == other.level_value
    }
}
