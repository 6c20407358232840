//
// Copyright (c) IAM contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use geo::HaversineLength;

// Aliases for geo-types geometry types (WGS84 lon/lat)
pub type Point = geo::Point<f64>;
pub type LineString = geo::LineString<f64>;
pub type Polygon = geo::Polygon<f64>;

/// Generic Geometry Data Type
#[derive(Clone, PartialEq, Debug)]
pub enum GeometryType {
    Point(Point),
    LineString(LineString),
    Polygon(Polygon),
}

impl GeometryType {
    pub fn is_empty(&self) -> bool {
        match self {
            GeometryType::Point(_) => false,
            GeometryType::LineString(l) => l.0.is_empty(),
            GeometryType::Polygon(p) => p.exterior().0.is_empty(),
        }
    }

    /// All vertices as (longitude, latitude) pairs
    pub fn coordinates(&self) -> Vec<(f64, f64)> {
        match self {
            GeometryType::Point(p) => vec![(p.x(), p.y())],
            GeometryType::LineString(l) => l.coords().map(|c| (c.x, c.y)).collect(),
            GeometryType::Polygon(p) => p
                .exterior()
                .coords()
                .chain(p.interiors().iter().flat_map(|ring| ring.coords()))
                .map(|c| (c.x, c.y))
                .collect(),
        }
    }

    /// Geodesic (haversine) length in km. Points have length 0, polygons sum
    /// the lengths of all their rings.
    pub fn length_km(&self) -> f64 {
        match self {
            GeometryType::Point(_) => 0.0,
            GeometryType::LineString(l) => l.haversine_length() / 1000.0,
            GeometryType::Polygon(p) => {
                let rings = p.exterior().haversine_length()
                    + p.interiors()
                        .iter()
                        .map(|ring| ring.haversine_length())
                        .sum::<f64>();
                rings / 1000.0
            }
        }
    }
}
