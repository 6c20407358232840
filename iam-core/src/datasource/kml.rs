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
use elementtree::Element;

/// KML adapter: Placemark name becomes the feature id, ExtendedData entries
/// become properties, or time-windowed attributes when the Placemark
/// carries a TimeSpan.
pub struct KmlDatasource {
    features: Vec<Feature>,
    properties: Vec<FeatureProperty>,
    attributes: Vec<FeatureAttribute>,
}

impl KmlDatasource {
    pub fn new(text: &str, result: &mut ProcessResult) -> KmlDatasource {
        let mut ds = KmlDatasource {
            features: Vec::new(),
            properties: Vec::new(),
            attributes: Vec::new(),
        };
        let root = match Element::from_reader(text.as_bytes()) {
            Ok(root) => root,
            Err(err) => {
                result.fail("Could not read KML input", &err.to_string());
                return ds;
            }
        };
        ds.walk(&root, result);
        ds
    }

    // Placemarks may be nested in Document/Folder elements at any depth
    fn walk(&mut self, element: &Element, result: &mut ProcessResult) {
        for child in element.children() {
            if child.tag().name() == "Placemark" {
                self.parse_placemark(child, result);
            } else {
                self.walk(child, result);
            }
        }
    }

    fn parse_placemark(&mut self, placemark: &Element, result: &mut ProcessResult) {
        let id = match find_child(placemark, "name") {
            Some(name) => name.text().trim().to_string(),
            None => {
                result.add_detail(ProcessStatus::Warn, "Skipping Placemark without name");
                return;
            }
        };
        let geometry = match parse_geometry(placemark) {
            Ok(geometry) => geometry,
            Err(err) => {
                result.add_detail(
                    ProcessStatus::Warn,
                    &format!("Skipping Placemark '{}': {}", id, err),
                );
                return;
            }
        };
        let feature_type = match geometry {
            GeometryType::Point(_) => FeatureType::Point,
            GeometryType::LineString(_) => FeatureType::LineString,
            GeometryType::Polygon(_) => FeatureType::Polygon,
        };

        let time_span = find_child(placemark, "TimeSpan").map(|span| {
            (
                find_child(span, "begin").and_then(|e| parse_year(e.text())),
                find_child(span, "end").and_then(|e| parse_year(e.text())),
            )
        });

        if let Some(extended) = find_child(placemark, "ExtendedData") {
            for data in extended.children().filter(|c| c.tag().name() == "Data") {
                let name = match data.get_attr("name") {
                    Some(name) => name.to_string(),
                    None => {
                        result.add_detail(
                            ProcessStatus::Warn,
                            &format!("Skipping unnamed Data element of Placemark '{}'", id),
                        );
                        continue;
                    }
                };
                let value = find_child(data, "value")
                    .map(|e| e.text().trim().to_string())
                    .unwrap_or_default();
                match time_span {
                    // a TimeSpan turns ExtendedData entries into
                    // time-windowed attributes
                    Some((from_year, to_year)) => self.attributes.push(
                        FeatureAttribute::new(feature_type, &id, &name, &value)
                            .with_years(from_year, to_year),
                    ),
                    None => {
                        let value = value
                            .parse::<f64>()
                            .map(PropertyValue::Number)
                            .unwrap_or(PropertyValue::Text(value));
                        self.properties
                            .push(FeatureProperty::new(feature_type, &id, &name, value));
                    }
                }
            }
        }
        self.features.push(Feature::new(feature_type, &id, geometry));
    }
}

impl DatasourceInput for KmlDatasource {
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
        Vec::new()
    }
    fn map_settings(&self) -> Option<MapSettings> {
        None
    }
}

/// Find a direct child by local name, ignoring the KML namespace
fn find_child<'a>(element: &'a Element, name: &str) -> Option<&'a Element> {
    element.children().find(|child| child.tag().name() == name)
}

/// Leading year of a KML date ("1900" or "1900-01-01")
fn parse_year(text: &str) -> Option<i32> {
    text.trim().split('-').next()?.parse().ok()
}

fn parse_coordinates(text: &str) -> Result<Vec<(f64, f64)>, String> {
    text.split_whitespace()
        .map(|tuple| {
            let mut parts = tuple.split(',');
            let lon = parts.next().and_then(|p| p.parse::<f64>().ok());
            let lat = parts.next().and_then(|p| p.parse::<f64>().ok());
            match (lon, lat) {
                (Some(lon), Some(lat)) => Ok((lon, lat)),
                _ => Err(format!("Invalid coordinate tuple '{}'", tuple)),
            }
        })
        .collect()
}

fn ring(element: &Element) -> Result<LineString, String> {
    let coordinates = find_child(element, "coordinates")
        .ok_or_else(|| "Missing coordinates".to_string())?;
    Ok(LineString::from(parse_coordinates(coordinates.text())?))
}

fn parse_geometry(placemark: &Element) -> Result<GeometryType, String> {
    if let Some(point) = find_child(placemark, "Point") {
        let coordinates = find_child(point, "coordinates")
            .ok_or_else(|| "Missing coordinates".to_string())?;
        let pairs = parse_coordinates(coordinates.text())?;
        let (x, y) = *pairs.first().ok_or_else(|| "Empty coordinates".to_string())?;
        return Ok(GeometryType::Point(Point::new(x, y)));
    }
    if let Some(line) = find_child(placemark, "LineString") {
        return Ok(GeometryType::LineString(ring(line)?));
    }
    if let Some(polygon) = find_child(placemark, "Polygon") {
        let outer = find_child(polygon, "outerBoundaryIs")
            .and_then(|b| find_child(b, "LinearRing"))
            .ok_or_else(|| "Polygon without outer boundary".to_string())?;
        let exterior = ring(outer)?;
        let interiors = polygon
            .children()
            .filter(|c| c.tag().name() == "innerBoundaryIs")
            .filter_map(|b| find_child(b, "LinearRing"))
            .map(ring)
            .collect::<Result<Vec<_>, String>>()?;
        return Ok(GeometryType::Polygon(Polygon::new(exterior, interiors)));
    }
    Err("Unsupported or missing geometry".to_string())
}
