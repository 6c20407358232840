//
// Copyright (c) IAM contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::color::Color;
use crate::core::feature::{
    Feature, FeatureAttribute, FeatureProperty, FeatureType, PropertyValue,
};
use crate::core::geom::{GeometryType, LineString, Point};
use crate::core::process::{ProcessResult, ProcessStatus};
use crate::core::settings::{
    Border, FeatureSettings, LineStringStyle, StyleSettings, HAS_CHANGED,
};
use crate::store::{FeatureStore, InsertMode};

fn point_feature(id: &str, x: f64, y: f64) -> Feature {
    Feature::new(FeatureType::Point, id, GeometryType::Point(Point::new(x, y)))
}

fn line_feature(id: &str) -> Feature {
    Feature::new(
        FeatureType::LineString,
        id,
        GeometryType::LineString(LineString::from(vec![(7.0, 47.0), (8.0, 47.0)])),
    )
}

fn line_settings(width: f64) -> StyleSettings {
    StyleSettings::LineString(LineStringStyle {
        line: Border {
            width: Some(width),
            ..Default::default()
        },
        casing: Border::default(),
    })
}

#[test]
fn test_new_store_is_seeded() {
    let store = FeatureStore::new();
    // one standard setting per feature type, nothing else
    assert_eq!(store.table_sizes(), (0, 0, 0, 3));
    let settings = store.get_all_settings();
    assert_eq!(settings.len(), 3);
    assert!(settings.iter().all(|s| s.level_name == "Standard"));
}

#[test]
fn test_load_features_overwrites_same_identity() {
    let store = FeatureStore::new();
    let mut result = ProcessResult::new("Loading");
    store.load_features(
        vec![point_feature("bern", 7.45, 46.95), point_feature("bern", 0.0, 0.0)],
        InsertMode::Overwrite,
        &mut result,
    );
    assert_eq!(store.table_sizes().0, 1);
    let feature = store.get_feature(FeatureType::Point, "bern").unwrap();
    assert_eq!(feature.geometry.coordinates(), vec![(0.0, 0.0)]);
}

#[test]
fn test_property_referential_integrity() {
    let store = FeatureStore::new();
    let mut result = ProcessResult::new("Loading");
    store.load_features(
        vec![point_feature("bern", 7.45, 46.95)],
        InsertMode::Overwrite,
        &mut result,
    );
    store.load_features_properties(
        vec![
            FeatureProperty::new(FeatureType::Point, "bern", "pop", PropertyValue::from(1e5)),
            FeatureProperty::new(FeatureType::Point, "basel", "pop", PropertyValue::from(2e5)),
        ],
        InsertMode::Overwrite,
        &mut result,
    );
    // the orphan is rejected with a warning, the load continues
    assert_eq!(result.status, ProcessStatus::Warn);
    assert_eq!(
        result.details,
        vec!["Property 'pop' references unknown feature Point/basel"]
    );
    assert_eq!(store.table_sizes().1, 1);
    // accepted properties are denormalized onto the feature
    let feature = store.get_feature(FeatureType::Point, "bern").unwrap();
    assert_eq!(feature.properties.get("pop"), Some(&PropertyValue::from(1e5)));
}

#[test]
fn test_attribute_referential_integrity_and_retention() {
    let store = FeatureStore::new();
    let mut result = ProcessResult::new("Loading");
    store.load_features(vec![line_feature("l1")], InsertMode::Overwrite, &mut result);
    let first = FeatureAttribute::new(FeatureType::LineString, "l1", "owner", "SBB")
        .with_years(Some(1900), Some(1950));
    let second = FeatureAttribute::new(FeatureType::LineString, "l1", "owner", "SBB")
        .with_years(Some(1950), None);
    let orphan = FeatureAttribute::new(FeatureType::LineString, "l9", "owner", "SBB");
    store.load_features_attributes(
        vec![first.clone(), second.clone(), first.clone(), orphan],
        InsertMode::Overwrite,
        &mut result,
    );
    // the identical re-insert overwrites, the different windows coexist
    assert_eq!(store.table_sizes().2, 2);
    assert_eq!(result.status, ProcessStatus::Warn);
    let feature = store.get_feature(FeatureType::LineString, "l1").unwrap();
    assert_eq!(feature.attributes, vec![first, second]);
}

#[test]
fn test_droptable_reinitializes() {
    let store = FeatureStore::new();
    let mut result = ProcessResult::new("Loading");
    store.load_features(
        vec![point_feature("bern", 7.45, 46.95)],
        InsertMode::Overwrite,
        &mut result,
    );
    store.load_features_properties(
        vec![FeatureProperty::new(
            FeatureType::Point,
            "bern",
            "pop",
            PropertyValue::from(1e5),
        )],
        InsertMode::Overwrite,
        &mut result,
    );
    store.load_settings(
        vec![FeatureSettings::feature(FeatureType::Point, "bern")],
        InsertMode::Overwrite,
        &mut result,
    );
    assert_eq!(store.table_sizes(), (1, 1, 0, 4));

    store.load_features(
        vec![point_feature("basel", 7.59, 47.56)],
        InsertMode::DropTable,
        &mut result,
    );
    // everything dropped, standards re-seeded
    assert_eq!(store.table_sizes(), (1, 0, 0, 3));
    assert!(store.get_feature(FeatureType::Point, "bern").is_none());
}

#[test]
fn test_droptable_properties_clears_feature_cache() {
    let store = FeatureStore::new();
    let mut result = ProcessResult::new("Loading");
    store.load_features(
        vec![point_feature("bern", 7.45, 46.95)],
        InsertMode::Overwrite,
        &mut result,
    );
    store.load_features_properties(
        vec![FeatureProperty::new(
            FeatureType::Point,
            "bern",
            "pop",
            PropertyValue::from(1e5),
        )],
        InsertMode::Overwrite,
        &mut result,
    );
    store.load_features_properties(
        vec![FeatureProperty::new(
            FeatureType::Point,
            "bern",
            "area",
            PropertyValue::from(51.6),
        )],
        InsertMode::DropTable,
        &mut result,
    );
    let feature = store.get_feature(FeatureType::Point, "bern").unwrap();
    assert!(feature.properties.get("pop").is_none());
    assert_eq!(feature.properties.get("area"), Some(&PropertyValue::from(51.6)));
    assert_eq!(store.table_sizes().1, 1);
}

#[test]
fn test_settings_resolution_by_year_window() {
    let store = FeatureStore::new();
    let mut result = ProcessResult::new("Loading");
    store.load_features(vec![line_feature("l1")], InsertMode::Overwrite, &mut result);
    store.load_features_attributes(
        vec![
            FeatureAttribute::new(FeatureType::LineString, "l1", "owner", "SCB")
                .with_years(Some(1900), Some(1950)),
            FeatureAttribute::new(FeatureType::LineString, "l1", "owner", "SBB")
                .with_years(Some(1950), None),
        ],
        InsertMode::Overwrite,
        &mut result,
    );
    let mut scb = FeatureSettings::attribute(FeatureType::LineString, "owner", "SCB");
    scb.style = line_settings(3.0);
    scb.text.color = Some(Color::new(255, 0, 0, 1.0));
    let mut sbb = FeatureSettings::attribute(FeatureType::LineString, "owner", "SBB");
    sbb.style = line_settings(5.0);
    store.load_settings(vec![scb, sbb], InsertMode::Overwrite, &mut result);

    let line_width = |settings: &FeatureSettings| match &settings.style {
        StyleSettings::LineString(style) => style.line.width,
        _ => panic!("expected LineString style"),
    };

    // inside the first window only the SCB override applies
    let resolved = store
        .get_settings_of_feature(FeatureType::LineString, "l1", 1920, 1930)
        .unwrap();
    assert_eq!(line_width(&resolved), Some(3.0));
    assert_eq!(resolved.text.color, Some(Color::new(255, 0, 0, 1.0)));
    // standard fields shine through where no override defines them
    assert_eq!(resolved.show_feature, Some(true));

    // after the change only SBB applies
    let resolved = store
        .get_settings_of_feature(FeatureType::LineString, "l1", 1960, 1970)
        .unwrap();
    assert_eq!(line_width(&resolved), Some(5.0));
    assert_eq!(resolved.text.color, FeatureSettings::standard(FeatureType::LineString).text.color);

    // both windows overlap 1950: the later from_year is merged last and wins
    let resolved = store
        .get_settings_of_feature(FeatureType::LineString, "l1", 1950, 1950)
        .unwrap();
    assert_eq!(line_width(&resolved), Some(5.0));
    // the SCB text color survives because SBB does not define one
    assert_eq!(resolved.text.color, Some(Color::new(255, 0, 0, 1.0)));
}

#[test]
fn test_settings_resolution_has_changed_and_feature_level() {
    let store = FeatureStore::new();
    let mut result = ProcessResult::new("Loading");
    store.load_features(vec![line_feature("l1")], InsertMode::Overwrite, &mut result);
    store.load_features_attributes(
        vec![FeatureAttribute::new(FeatureType::LineString, "l1", "owner", "SBB")
            .with_years(Some(1950), None)],
        InsertMode::Overwrite,
        &mut result,
    );
    let mut changed = FeatureSettings::attribute(FeatureType::LineString, "owner", HAS_CHANGED);
    changed.show_text = Some(true);
    let mut feature_level = FeatureSettings::feature(FeatureType::LineString, "l1");
    feature_level.show_feature = Some(false);
    store.load_settings(vec![changed, feature_level], InsertMode::Overwrite, &mut result);

    // the change year lies inside the window: the sentinel applies
    let resolved = store
        .get_settings_of_feature(FeatureType::LineString, "l1", 1940, 1960)
        .unwrap();
    assert_eq!(resolved.show_text, Some(true));
    // the feature level is merged last and always wins
    assert_eq!(resolved.show_feature, Some(false));

    // outside the change year the sentinel stays inactive
    let resolved = store
        .get_settings_of_feature(FeatureType::LineString, "l1", 1960, 1970)
        .unwrap();
    assert_eq!(resolved.show_text, Some(false));
    assert_eq!(resolved.show_feature, Some(false));
}

#[test]
fn test_attribute_name_and_value_queries() {
    let store = FeatureStore::new();
    let mut result = ProcessResult::new("Loading");
    store.load_features(
        vec![line_feature("l1"), line_feature("l2")],
        InsertMode::Overwrite,
        &mut result,
    );
    store.load_features_attributes(
        vec![
            FeatureAttribute::new(FeatureType::LineString, "l1", "owner", "SCB")
                .with_years(Some(1900), Some(1950)),
            FeatureAttribute::new(FeatureType::LineString, "l1", "owner", "SBB")
                .with_years(Some(1950), None),
            FeatureAttribute::new(FeatureType::LineString, "l2", "gauge", "1435")
                .with_years(Some(1902), None),
        ],
        InsertMode::Overwrite,
        &mut result,
    );
    assert_eq!(
        store.get_all_attribute_names(FeatureType::LineString),
        vec!["gauge", "owner"]
    );
    assert_eq!(
        store.get_all_attribute_values(FeatureType::LineString, "owner"),
        vec!["SBB", "SCB"]
    );
    assert!(store.get_all_attribute_names(FeatureType::Point).is_empty());

    let matching = store.get_all_features_with_attributes(
        FeatureType::LineString,
        "owner",
        "SCB",
        1920,
        1930,
    );
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].id, "l1");
    assert!(store
        .get_all_features_with_attributes(FeatureType::LineString, "owner", "SCB", 1960, 1970)
        .is_empty());

    assert_eq!(store.get_attributes_minimum_year(), Some(1900));
    assert_eq!(store.get_attributes_maximum_year(), Some(1950));
}

#[test]
fn test_empty_store_bounding_box() {
    let store = FeatureStore::new();
    assert_eq!(store.get_min_longitude(), f64::INFINITY);
    assert_eq!(store.get_min_latitude(), f64::INFINITY);
    assert_eq!(store.get_max_longitude(), f64::NEG_INFINITY);
    assert_eq!(store.get_max_latitude(), f64::NEG_INFINITY);
    assert_eq!(store.get_attributes_minimum_year(), None);
}

#[test]
fn test_bounding_box() {
    let store = FeatureStore::new();
    let mut result = ProcessResult::new("Loading");
    store.load_features(
        vec![point_feature("bern", 7.45, 46.95), line_feature("l1")],
        InsertMode::Overwrite,
        &mut result,
    );
    assert_eq!(store.get_min_longitude(), 7.0);
    assert_eq!(store.get_max_longitude(), 8.0);
    assert_eq!(store.get_min_latitude(), 46.95);
    assert_eq!(store.get_max_latitude(), 47.0);
}

#[test]
fn test_search() {
    let store = FeatureStore::new();
    let mut result = ProcessResult::new("Loading");
    store.load_features(
        vec![point_feature("b1", 7.45, 46.95), point_feature("b2", 7.59, 47.56)],
        InsertMode::Overwrite,
        &mut result,
    );
    store.load_features_properties(
        vec![
            FeatureProperty::new(FeatureType::Point, "b1", "name", PropertyValue::from("Bern")),
            FeatureProperty::new(FeatureType::Point, "b2", "name", PropertyValue::from("Basel")),
        ],
        InsertMode::Overwrite,
        &mut result,
    );
    let hits = store.search("bASe");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "b2");
    assert_eq!(store.search("b").len(), 2);
    assert!(store.search("zurich").is_empty());
}
