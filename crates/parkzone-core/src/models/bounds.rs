use serde::{Deserialize, Serialize};

use super::Point;

/// Axis-aligned rectangle in degrees.
///
/// Viewports that cross the antimeridian (west > east) are not supported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    /// Largest extent a web-mercator map widget can draw
    pub const MERCATOR_WORLD: Bounds =
        Bounds { south: -85.051_128_78, west: -180.0, north: 85.051_128_78, east: 180.0 };

    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self { south, west, north, east }
    }

    /// Build from the south-west and north-east corners reported by the map widget
    pub fn from_corners(south_west: Point, north_east: Point) -> Self {
        Self::new(south_west.latitude, south_west.longitude, north_east.latitude, north_east.longitude)
    }

    pub fn south_west(&self) -> Point {
        Point::new(self.south, self.west)
    }

    pub fn north_east(&self) -> Point {
        Point::new(self.north, self.east)
    }

    /// Inclusive containment test
    pub fn contains(&self, point: Point) -> bool {
        point.latitude >= self.south
            && point.latitude <= self.north
            && point.longitude >= self.west
            && point.longitude <= self.east
    }

    /// Inclusive overlap test; rectangles that only share an edge intersect
    pub fn intersects(&self, other: &Bounds) -> bool {
        let lat_overlap = self.south <= other.north && self.north >= other.south;
        let lng_overlap = self.west <= other.east && self.east >= other.west;

        lat_overlap && lng_overlap
    }

    /// Closed ring (south-west, south-east, north-east, north-west, south-west)
    pub fn to_ring(&self) -> Vec<Point> {
        vec![
            Point::new(self.south, self.west),
            Point::new(self.south, self.east),
            Point::new(self.north, self.east),
            Point::new(self.north, self.west),
            Point::new(self.south, self.west),
        ]
    }
}
