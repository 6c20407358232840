//
// Copyright (c) IAM contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::feature::{
    Feature, FeatureAttribute, FeatureProperty, FeatureType, PropertyValue,
};
use crate::core::map_settings::MapSettings;
use crate::core::process::{ProcessResult, ProcessStatus};
use crate::core::settings::FeatureSettings;
use crate::datasource::datasource::DatasourceInput;
use csv::StringRecord;
use std::str::FromStr;

pub const PROPERTY_HEADER: [&str; 4] = ["featureType", "featureId", "propertyName", "propertyValue"];
pub const ATTRIBUTE_HEADER: [&str; 10] = [
    "featureType",
    "featureId",
    "attributeName",
    "attributeValue",
    "fromYear",
    "fromMonth",
    "fromDay",
    "toYear",
    "toMonth",
    "toDay",
];

/// Validate a fixed header template: too few columns fails the whole
/// adapter, a wrong column name only downgrades to a warning
fn check_header(
    headers: &StringRecord,
    template: &[&str],
    result: &mut ProcessResult,
) -> Result<(), ()> {
    if headers.len() < template.len() {
        result.fail(
            "Could not read CSV input",
            &format!(
                "CSV header has {} columns, expected {}",
                headers.len(),
                template.len()
            ),
        );
        return Err(());
    }
    for (i, expected) in template.iter().enumerate() {
        let got = headers.get(i).unwrap_or("");
        if got != *expected {
            result.add_detail(
                ProcessStatus::Warn,
                &format!(
                    "Unexpected column name '{}' at position {}, expected '{}'",
                    got,
                    i + 1,
                    expected
                ),
            );
        }
    }
    Ok(())
}

fn csv_reader(text: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes())
}

fn row_feature_type(
    record: &StringRecord,
    line: usize,
    result: &mut ProcessResult,
) -> Option<FeatureType> {
    let raw = record.get(0).unwrap_or("");
    match FeatureType::from_str(raw) {
        Ok(feature_type) => Some(feature_type),
        Err(err) => {
            result.add_detail(
                ProcessStatus::Warn,
                &format!("Skipping row {}: {}", line, err),
            );
            None
        }
    }
}

/// An invalid integer drops the field, not the row
fn int_field<T: FromStr>(
    record: &StringRecord,
    index: usize,
    line: usize,
    result: &mut ProcessResult,
) -> Option<T> {
    let raw = record.get(index).unwrap_or("").trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            result.add_detail(
                ProcessStatus::Warn,
                &format!(
                    "Dropping invalid integer '{}' in column {} of row {}",
                    raw,
                    index + 1,
                    line
                ),
            );
            None
        }
    }
}

/// CSV adapter for the four-column property template
pub struct CsvPropertyDatasource {
    properties: Vec<FeatureProperty>,
}

impl CsvPropertyDatasource {
    pub fn new(text: &str, result: &mut ProcessResult) -> CsvPropertyDatasource {
        let mut ds = CsvPropertyDatasource {
            properties: Vec::new(),
        };
        let mut reader = csv_reader(text);
        let headers = match reader.headers() {
            Ok(headers) => headers.clone(),
            Err(err) => {
                result.fail("Could not read CSV input", &err.to_string());
                return ds;
            }
        };
        if check_header(&headers, &PROPERTY_HEADER, result).is_err() {
            return ds;
        }
        for (index, record) in reader.records().enumerate() {
            let line = index + 2; // header is line 1
            let record = match record {
                Ok(record) => record,
                Err(err) => {
                    result.add_detail(
                        ProcessStatus::Warn,
                        &format!("Skipping row {}: {}", line, err),
                    );
                    continue;
                }
            };
            let feature_type = match row_feature_type(&record, line, result) {
                Some(feature_type) => feature_type,
                None => continue,
            };
            let raw_value = record.get(3).unwrap_or("");
            let value = raw_value
                .parse::<f64>()
                .map(PropertyValue::Number)
                .unwrap_or_else(|_| PropertyValue::Text(raw_value.to_string()));
            ds.properties.push(FeatureProperty::new(
                feature_type,
                record.get(1).unwrap_or(""),
                record.get(2).unwrap_or(""),
                value,
            ));
        }
        ds
    }
}

impl DatasourceInput for CsvPropertyDatasource {
    fn features(&self) -> Vec<Feature> {
        Vec::new()
    }
    fn feature_properties(&self) -> Vec<FeatureProperty> {
        self.properties.clone()
    }
    fn feature_attributes(&self) -> Vec<FeatureAttribute> {
        Vec::new()
    }
    fn feature_settings(&self) -> Vec<FeatureSettings> {
        Vec::new()
    }
    fn map_settings(&self) -> Option<MapSettings> {
        None
    }
}

/// CSV adapter for the ten-column attribute template with optional
/// from/to date fields
pub struct CsvAttributeDatasource {
    attributes: Vec<FeatureAttribute>,
}

impl CsvAttributeDatasource {
    pub fn new(text: &str, result: &mut ProcessResult) -> CsvAttributeDatasource {
        let mut ds = CsvAttributeDatasource {
            attributes: Vec::new(),
        };
        let mut reader = csv_reader(text);
        let headers = match reader.headers() {
            Ok(headers) => headers.clone(),
            Err(err) => {
                result.fail("Could not read CSV input", &err.to_string());
                return ds;
            }
        };
        if check_header(&headers, &ATTRIBUTE_HEADER, result).is_err() {
            return ds;
        }
        for (index, record) in reader.records().enumerate() {
            let line = index + 2;
            let record = match record {
                Ok(record) => record,
                Err(err) => {
                    result.add_detail(
                        ProcessStatus::Warn,
                        &format!("Skipping row {}: {}", line, err),
                    );
                    continue;
                }
            };
            let feature_type = match row_feature_type(&record, line, result) {
                Some(feature_type) => feature_type,
                None => continue,
            };
            let mut attribute = FeatureAttribute::new(
                feature_type,
                record.get(1).unwrap_or(""),
                record.get(2).unwrap_or(""),
                record.get(3).unwrap_or(""),
            );
            attribute.from_year = int_field(&record, 4, line, result);
            attribute.from_month = int_field(&record, 5, line, result);
            attribute.from_day = int_field(&record, 6, line, result);
            attribute.to_year = int_field(&record, 7, line, result);
            attribute.to_month = int_field(&record, 8, line, result);
            attribute.to_day = int_field(&record, 9, line, result);
            ds.attributes.push(attribute);
        }
        ds
    }
}

impl DatasourceInput for CsvAttributeDatasource {
    fn features(&self) -> Vec<Feature> {
        Vec::new()
    }
    fn feature_properties(&self) -> Vec<FeatureProperty> {
        Vec::new()
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
