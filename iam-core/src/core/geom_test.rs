//
// Copyright (c) IAM contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::geom::{GeometryType, LineString, Point, Polygon};

#[test]
fn test_coordinates() {
    let point = GeometryType::Point(Point::new(8.5, 47.4));
    assert_eq!(point.coordinates(), vec![(8.5, 47.4)]);

    let line = GeometryType::LineString(LineString::from(vec![(0.0, 0.0), (1.0, 0.0)]));
    assert_eq!(line.coordinates(), vec![(0.0, 0.0), (1.0, 0.0)]);

    let polygon = GeometryType::Polygon(Polygon::new(
        LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]),
        vec![],
    ));
    assert_eq!(polygon.coordinates().len(), 4);
}

#[test]
fn test_is_empty() {
    assert!(!GeometryType::Point(Point::new(0.0, 0.0)).is_empty());
    assert!(GeometryType::LineString(LineString::from(Vec::<(f64, f64)>::new())).is_empty());
    assert!(!GeometryType::LineString(LineString::from(vec![(0.0, 0.0), (1.0, 1.0)])).is_empty());
}

#[test]
fn test_length_km() {
    assert_eq!(GeometryType::Point(Point::new(8.5, 47.4)).length_km(), 0.0);

    // one degree of longitude at the equator is about 111.2 km
    let line = GeometryType::LineString(LineString::from(vec![(0.0, 0.0), (1.0, 0.0)]));
    let km = line.length_km();
    assert!(km > 111.0 && km < 112.0, "unexpected length {}", km);
}

#[test]
fn test_polygon_length_sums_rings() {
    let exterior = LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
    let plain = GeometryType::Polygon(Polygon::new(exterior.clone(), vec![])).length_km();
    let holed = GeometryType::Polygon(Polygon::new(
        exterior,
        vec![LineString::from(vec![
            (0.2, 0.2),
            (0.4, 0.2),
            (0.4, 0.4),
            (0.2, 0.2),
        ])],
    ))
    .length_km();
    assert!(holed > plain);
}
