//
// Copyright (c) IAM contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::table::{KeyFilter, MultiKeyTable, Record};

#[derive(Clone, PartialEq, Debug)]
struct Measurement {
    station: String,
    sensor: String,
    value: f64,
}

impl Measurement {
    fn new(station: &str, sensor: &str, value: f64) -> Measurement {
        Measurement {
            station: station.to_string(),
            sensor: sensor.to_string(),
            value,
        }
    }
}

impl Record for Measurement {
    fn key(&self, field: &str) -> String {
        match field {
            "station" => self.station.clone(),
            "sensor" => self.sensor.clone(),
            "value" => self.value.to_string(),
            _ => String::new(),
        }
    }
    fn replaces(&self, other: &Self) -> bool {
        self.station == other.station && self.sensor == other.sensor
    }
}

fn sample_table() -> MultiKeyTable<Measurement> {
    let mut table = MultiKeyTable::new(&["station", "sensor"]);
    table.add_item(Measurement::new("basel", "temp", 12.0));
    table.add_item(Measurement::new("basel", "wind", 3.0));
    table.add_item(Measurement::new("zurich", "temp", 10.0));
    table
}

#[test]
fn test_add_item_overwrites_same_identity() {
    let mut table = sample_table();
    assert_eq!(table.len(), 3);
    table.add_item(Measurement::new("basel", "temp", 15.0));
    assert_eq!(table.len(), 3);
    let item = table.get_item(&["basel", "temp"]).unwrap();
    assert_eq!(item.value, 15.0);
}

#[test]
fn test_non_unique_terminal_key_appends() {
    #[derive(Clone, PartialEq, Debug)]
    struct Event {
        name: String,
        year: i32,
    }
    impl Record for Event {
        fn key(&self, field: &str) -> String {
            match field {
                "name" => self.name.clone(),
                _ => String::new(),
            }
        }
        fn replaces(&self, other: &Self) -> bool {
            self == other
        }
    }
    let mut table = MultiKeyTable::new(&["name"]);
    table.add_item(Event {
        name: "opening".to_string(),
        year: 1900,
    });
    table.add_item(Event {
        name: "opening".to_string(),
        year: 1950,
    });
    assert_eq!(table.len(), 2);
    // exact-match lookup returns the first record of the list
    assert_eq!(table.get_item(&["opening"]).unwrap().year, 1900);
    let items = table.get_all_items(&[KeyFilter::Equals("opening".to_string())]);
    assert_eq!(items.len(), 2);
}

#[test]
fn test_get_item_mismatched_arity() {
    let table = sample_table();
    assert!(table.get_item(&["basel"]).is_none());
    assert!(table.get_item(&["basel", "temp", "extra"]).is_none());
    assert!(table.get_item(&["bern", "temp"]).is_none());
}

#[test]
fn test_get_keys() {
    let table = sample_table();
    assert_eq!(table.get_keys(&[]), vec!["basel", "zurich"]);
    assert_eq!(table.get_keys(&["basel"]), vec!["temp", "wind"]);
    // full-arity prefix enumerates the terminal level
    assert_eq!(table.get_keys(&["basel", "temp"]), vec!["temp", "wind"]);
    assert!(table.get_keys(&["basel", "temp", "extra"]).is_empty());
    assert!(table.get_keys(&["bern"]).is_empty());
}

#[test]
fn test_get_all_items_filters() {
    let table = sample_table();
    let all = table.get_all_items(&[KeyFilter::Any, KeyFilter::Any]);
    assert_eq!(all.len(), 3);
    let temps = table.get_all_items(&[KeyFilter::Any, KeyFilter::Equals("temp".to_string())]);
    assert_eq!(temps.len(), 2);
    let some = table.get_all_items(&[
        KeyFilter::OneOf(vec!["basel".to_string(), "bern".to_string()]),
        KeyFilter::Any,
    ]);
    assert_eq!(some.len(), 2);
    // depth-first traversal in ascending key order
    assert_eq!(some[0].sensor, "temp");
    assert_eq!(some[1].sensor, "wind");
}

#[test]
fn test_wrong_filter_arity_yields_empty() {
    let table = sample_table();
    assert!(table.get_all_items(&[KeyFilter::Any]).is_empty());
    assert!(table
        .get_all_items(&[KeyFilter::Any, KeyFilter::Any, KeyFilter::Any])
        .is_empty());
    assert!(table.get_all_keys(&[KeyFilter::Any]).is_empty());
}

#[test]
fn test_get_all_keys_distinct() {
    let table = sample_table();
    let sensors = table.get_all_keys(&[KeyFilter::Any, KeyFilter::Any]);
    assert_eq!(sensors, vec!["temp", "wind"]);
}

#[test]
fn test_group_by_partitions_all_records() {
    let table = sample_table();
    let grouped = table.group_by(
        &[KeyFilter::Any, KeyFilter::Any],
        &["sensor"],
        |items| items.len() as f64,
    );
    assert_eq!(grouped.get(&["temp"]), Some(2.0));
    assert_eq!(grouped.get(&["wind"]), Some(1.0));
    assert_eq!(grouped.get(&["rain"]), None);
    // every record lands in exactly one bucket
    let total: f64 = grouped.values().iter().sum();
    assert_eq!(total as usize, table.len());
}

#[test]
fn test_group_by_non_primary_field() {
    let table = sample_table();
    let grouped = table.group_by(
        &[KeyFilter::Any, KeyFilter::Any],
        &["sensor", "value"],
        |items| items.len() as f64,
    );
    assert_eq!(grouped.get(&["temp", "12"]), Some(1.0));
    assert_eq!(grouped.get_keys(&["temp"]), vec!["10", "12"]);
}

#[test]
fn test_for_each_mut_and_init() {
    let mut table = sample_table();
    table.for_each_mut(|m| m.value = 0.0);
    assert!(table
        .get_all_items(&[KeyFilter::Any, KeyFilter::Any])
        .iter()
        .all(|m| m.value == 0.0));
    table.init();
    assert_eq!(table.len(), 0);
    assert!(table.is_empty());
    // schema survives a reinit
    assert_eq!(table.primary_keys(), &["station", "sensor"]);
    table.add_item(Measurement::new("basel", "temp", 1.0));
    assert_eq!(table.len(), 1);
}
