//
// Copyright (c) IAM contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::feature::{Feature, FeatureAttribute, FeatureType};
use crate::core::table::{GroupedTable, KeyFilter, MultiKeyTable};
use crate::store::store::FeatureStore;
use std::collections::BTreeMap;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AggregateType {
    /// Sum of the owning features' lengths in km (or their numeric `length`
    /// property override)
    Sum,
    /// Number of matching attribute records
    Count,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AggregateCourse {
    /// Flow view: records grouped by the year their value becomes valid
    PointInTime,
    /// Stock view: running total of activations minus expirations,
    /// accumulated year over year
    TimeInterval,
}

/// Dense per-year series for one attribute value; every year of the
/// requested window is present (zero-filled), keyed ascending
#[derive(Clone, PartialEq, Debug)]
pub struct YearSeries {
    pub attribute_value: String,
    pub years: BTreeMap<i32, f64>,
}

impl FeatureStore {
    /// Group matching attributes by (attribute value, year) and aggregate
    /// into one dense year series per requested value, for charting.
    pub fn get_attribute_aggregation_per_year(
        &self,
        feature_type: FeatureType,
        attribute_name: &str,
        attribute_values: &[String],
        year_from: i32,
        year_to: i32,
        aggregate_type: AggregateType,
        course: AggregateCourse,
    ) -> Vec<YearSeries> {
        if year_from > year_to || attribute_values.is_empty() {
            return Vec::new();
        }
        let features = self.features.read().expect("poisoned lock");
        let attributes = self.attributes.read().expect("poisoned lock");
        let filters = [
            KeyFilter::Equals(feature_type.to_string()),
            KeyFilter::Any,
            KeyFilter::Equals(attribute_name.to_string()),
            KeyFilter::OneOf(attribute_values.to_vec()),
        ];
        let aggregate = |items: &[&FeatureAttribute]| -> f64 {
            match aggregate_type {
                AggregateType::Count => items.len() as f64,
                AggregateType::Sum => items
                    .iter()
                    .map(|attribute| feature_measure(&features, attribute))
                    .sum(),
            }
        };

        let from_series = attributes.group_by(&filters, &["propertyValue", "fromYear"], &aggregate);
        match course {
            AggregateCourse::PointInTime => attribute_values
                .iter()
                .map(|value| {
                    let mut years = BTreeMap::new();
                    for year in year_from..=year_to {
                        years.insert(
                            year,
                            from_series
                                .get(&[value, &year.to_string()])
                                .unwrap_or(0.0),
                        );
                    }
                    YearSeries {
                        attribute_value: value.clone(),
                        years,
                    }
                })
                .collect(),
            AggregateCourse::TimeInterval => {
                let to_series =
                    attributes.group_by(&filters, &["propertyValue", "toYear"], &aggregate);
                attribute_values
                    .iter()
                    .map(|value| {
                        // Accumulate from the earliest grouped year so that
                        // activations before the requested window still count
                        // toward the stock inside it.
                        let start = earliest_year(&from_series, &to_series, value)
                            .map_or(year_from, |y| y.min(year_from));
                        let mut years = BTreeMap::new();
                        let mut running = 0.0;
                        for year in start..=year_to {
                            let year_key = year.to_string();
                            running += from_series.get(&[value, &year_key]).unwrap_or(0.0);
                            running -= to_series.get(&[value, &year_key]).unwrap_or(0.0);
                            if year >= year_from {
                                years.insert(year, running);
                            }
                        }
                        YearSeries {
                            attribute_value: value.clone(),
                            years,
                        }
                    })
                    .collect()
            }
        }
    }
}

fn earliest_year(
    from_series: &GroupedTable,
    to_series: &GroupedTable,
    value: &str,
) -> Option<i32> {
    from_series
        .get_keys(&[value])
        .iter()
        .chain(to_series.get_keys(&[value]).iter())
        .filter_map(|key| key.parse::<i32>().ok())
        .min()
}

/// Charted measure of the feature owning an attribute: an explicit numeric
/// `length` property wins, otherwise the geodesic geometry length in km
fn feature_measure(features: &MultiKeyTable<Feature>, attribute: &FeatureAttribute) -> f64 {
    match features.get_item(&[attribute.feature_type.as_str(), &attribute.feature_id]) {
        Some(feature) => feature
            .properties
            .get("length")
            .and_then(|value| value.as_number())
            .unwrap_or_else(|| feature.geometry.length_km()),
        None => 0.0,
    }
}
