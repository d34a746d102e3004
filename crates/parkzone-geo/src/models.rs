//! Conversions between parkzone models and the `geo` crate.
//!
//! `geo` uses x = longitude, y = latitude.

use geo::algorithm::area::Area;
use parkzone_core::models::{Point, Polygon, PolygonError};

/// Convert a point to a `geo::Point`
pub fn to_geo_point(point: Point) -> geo::Point<f64> {
    geo::Point::new(point.longitude, point.latitude)
}

/// Convert a polygon to a `geo::Polygon` with no interior rings
pub fn to_geo_polygon(polygon: &Polygon) -> geo::Polygon<f64> {
    let coords: Vec<geo::Coord<f64>> = polygon
        .ring()
        .iter()
        .map(|p| geo::Coord { x: p.longitude, y: p.latitude })
        .collect();
    geo::Polygon::new(geo::LineString::new(coords), vec![])
}

/// Convert the exterior ring of a `geo::Polygon`; interior rings are dropped
pub fn from_geo_polygon(polygon: &geo::Polygon<f64>) -> Result<Polygon, PolygonError> {
    Polygon::new(polygon.exterior().coords().map(|c| Point::new(c.y, c.x)).collect())
}

/// Extension trait for Polygon with geo-crate operations
pub trait PolygonExt {
    /// Convert to geo::Polygon
    fn to_geo(&self) -> geo::Polygon<f64>;

    /// Planar area in square degrees
    fn area_sq_deg(&self) -> f64;
}

impl PolygonExt for Polygon {
    fn to_geo(&self) -> geo::Polygon<f64> {
        to_geo_polygon(self)
    }

    fn area_sq_deg(&self) -> f64 {
        self.to_geo().unsigned_area()
    }
}
