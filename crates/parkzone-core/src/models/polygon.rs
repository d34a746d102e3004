//! Closed polygon rings.
//!
//! A [`Polygon`] always stores an explicitly closed ring: the last vertex
//! repeats the first. Input rings may be open or closed; closure is
//! normalized on construction so the duplicate is never appended twice.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Point;

/// Geometry validation mode used when ingesting zone datasets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ValidityMode {
    /// Strict validation - reject a zone with any malformed vertex
    Strict,
    /// Lenient validation - drop malformed vertices and keep the zone if enough remain
    #[default]
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolygonError {
    #[error("polygon needs at least {required} distinct vertices, found {found}")]
    TooFewVertices { required: usize, found: usize },

    #[error("vertex {index} has non-finite coordinates")]
    NonFiniteVertex { index: usize },
}

/// Append a copy of the first vertex when the ring is open.
///
/// Exact float equality decides whether the ring is already closed.
pub fn close_ring(mut ring: Vec<Point>) -> Vec<Point> {
    if let (Some(first), Some(last)) = (ring.first().copied(), ring.last()) {
        if first != *last {
            ring.push(first);
        }
    }
    ring
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct Polygon {
    ring: Vec<Point>,
}

impl Polygon {
    pub const MIN_VERTICES: usize = 3;

    /// Create a polygon from an open or closed ring.
    ///
    /// Degenerate rings (fewer than three distinct vertices) are rejected here,
    /// so containment tests never see them.
    pub fn new(vertices: Vec<Point>) -> Result<Self, PolygonError> {
        if let Some(index) = vertices.iter().position(|p| !p.is_finite()) {
            return Err(PolygonError::NonFiniteVertex { index });
        }

        let ring = close_ring(vertices);
        let open = &ring[..ring.len().saturating_sub(1)];

        let mut distinct: Vec<Point> = Vec::with_capacity(open.len());
        for vertex in open {
            if !distinct.contains(vertex) {
                distinct.push(*vertex);
            }
        }

        if distinct.len() < Self::MIN_VERTICES {
            return Err(PolygonError::TooFewVertices {
                required: Self::MIN_VERTICES,
                found: distinct.len(),
            });
        }

        Ok(Self { ring })
    }

    /// Create a polygon from persisted `[lng, lat]` pairs
    pub fn from_lng_lat(coordinates: &[[f64; 2]]) -> Result<Self, PolygonError> {
        Self::new(coordinates.iter().copied().map(Point::from_lng_lat).collect())
    }

    /// The closed ring, first vertex repeated at the end
    pub fn ring(&self) -> &[Point] {
        &self.ring
    }

    /// The ring without its closing vertex
    pub fn vertices(&self) -> &[Point] {
        &self.ring[..self.ring.len() - 1]
    }

    /// Number of vertices excluding the closing one
    pub fn vertex_count(&self) -> usize {
        self.ring.len() - 1
    }

    /// Closed ring as persisted `[lng, lat]` pairs
    pub fn to_lng_lat(&self) -> Vec<[f64; 2]> {
        self.ring.iter().map(Point::to_lng_lat).collect()
    }
}

impl TryFrom<Vec<Point>> for Polygon {
    type Error = PolygonError;

    fn try_from(vertices: Vec<Point>) -> Result<Self, Self::Error> {
        Self::new(vertices)
    }
}

impl From<Polygon> for Vec<Point> {
    fn from(polygon: Polygon) -> Self {
        polygon.ring
    }
}
