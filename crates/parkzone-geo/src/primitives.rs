//! Point-in-polygon, bounding box, and centroid.
//!
//! # Boundary rule
//!
//! Containment uses the even-odd ray cast towards +longitude. An edge counts
//! as crossed when exactly one endpoint has a latitude strictly greater than
//! the point's, and the point lies strictly west of the crossing. Points on
//! the boundary are classified by that rule as-is, with no special casing:
//! for an axis-aligned rectangle the south and west edges are inside and the
//! north and east edges are outside.

use parkzone_core::models::{Bounds, Point, Polygon};

/// Strip the closing vertex of an explicitly closed ring
fn open_ring(ring: &[Point]) -> &[Point] {
    match (ring.first(), ring.last()) {
        (Some(first), Some(last)) if ring.len() > 1 && first == last => &ring[..ring.len() - 1],
        _ => ring,
    }
}

/// Even-odd containment test on a raw ring (open or closed).
///
/// Rings with fewer than three vertices contain nothing.
pub fn ring_contains(ring: &[Point], point: Point) -> bool {
    let vertices = open_ring(ring);
    if vertices.len() < Polygon::MIN_VERTICES {
        return false;
    }

    let mut inside = false;
    let mut j = vertices.len() - 1;

    for i in 0..vertices.len() {
        let a = vertices[i];
        let b = vertices[j];

        if (a.latitude > point.latitude) != (b.latitude > point.latitude) {
            let crossing_lng = a.longitude
                + (point.latitude - a.latitude) * (b.longitude - a.longitude)
                    / (b.latitude - a.latitude);

            if point.longitude < crossing_lng {
                inside = !inside;
            }
        }
        j = i;
    }

    inside
}

/// Even-odd containment test on a validated polygon
pub fn contains_point(polygon: &Polygon, point: Point) -> bool {
    ring_contains(polygon.ring(), point)
}

/// Min/max extent of a raw ring; `None` when empty
pub fn ring_bounding_box(ring: &[Point]) -> Option<Bounds> {
    let first = ring.first()?;
    let init = Bounds::new(first.latitude, first.longitude, first.latitude, first.longitude);

    Some(ring.iter().skip(1).fold(init, |acc, p| Bounds {
        south: acc.south.min(p.latitude),
        west: acc.west.min(p.longitude),
        north: acc.north.max(p.latitude),
        east: acc.east.max(p.longitude),
    }))
}

/// Min/max extent of a polygon
pub fn bounding_box(polygon: &Polygon) -> Bounds {
    // A polygon always has at least three vertices
    ring_bounding_box(polygon.ring()).unwrap_or(Bounds::new(0.0, 0.0, 0.0, 0.0))
}

/// Arithmetic mean of the given vertices.
///
/// This is a vertex average, not the area centroid; authoring output and
/// default anchors both rely on this definition.
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (lat_sum, lng_sum) = points
        .iter()
        .fold((0.0, 0.0), |(lat, lng), p| (lat + p.latitude, lng + p.longitude));

    Some(Point::new(lat_sum / n, lng_sum / n))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon {
        Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 0.0),
        ])
        .unwrap()
    }

    fn triangle_z1() -> Polygon {
        Polygon::from_lng_lat(&[[127.0, 37.5], [127.01, 37.5], [127.005, 37.51], [127.0, 37.5]])
            .unwrap()
    }

    #[test]
    fn test_point_inside_and_outside_square() {
        let square = square();
        assert!(contains_point(&square, Point::new(5.0, 5.0)));
        assert!(!contains_point(&square, Point::new(15.0, 5.0)));
        assert!(!contains_point(&square, Point::new(5.0, -1.0)));
    }

    #[test]
    fn test_triangle_scenario() {
        let zone = triangle_z1();
        assert!(contains_point(&zone, Point::new(37.502, 127.003)));
        assert!(!contains_point(&zone, Point::new(37.6, 127.0)));
    }

    #[test]
    fn test_boundary_rule_on_square_edges() {
        let square = square();

        // South and west edges are inside
        assert!(contains_point(&square, Point::new(0.0, 5.0)));
        assert!(contains_point(&square, Point::new(5.0, 0.0)));
        assert!(contains_point(&square, Point::new(0.0, 0.0)));

        // North and east edges are outside
        assert!(!contains_point(&square, Point::new(10.0, 5.0)));
        assert!(!contains_point(&square, Point::new(5.0, 10.0)));
        assert!(!contains_point(&square, Point::new(10.0, 10.0)));
    }

    #[test]
    fn test_concave_polygon() {
        // U shape opening north
        let u = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 3.0),
            Point::new(3.0, 3.0),
            Point::new(3.0, 2.0),
            Point::new(1.0, 2.0),
            Point::new(1.0, 1.0),
            Point::new(3.0, 1.0),
            Point::new(3.0, 0.0),
        ])
        .unwrap();

        assert!(contains_point(&u, Point::new(2.0, 0.5)));
        assert!(contains_point(&u, Point::new(2.0, 2.5)));
        assert!(!contains_point(&u, Point::new(2.0, 1.5)));
    }

    #[test]
    fn test_degenerate_ring_contains_nothing() {
        let line = [Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
        assert!(!ring_contains(&line, Point::new(0.5, 0.5)));
        assert!(!ring_contains(&[], Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_open_and_closed_rings_agree() {
        let square = square();
        let sample = Point::new(3.0, 7.0);
        assert_eq!(ring_contains(square.ring(), sample), ring_contains(square.vertices(), sample));
    }

    #[test]
    fn test_bounding_box() {
        let bbox = bounding_box(&triangle_z1());
        assert_eq!(bbox, Bounds::new(37.5, 127.0, 37.51, 127.01));
    }

    #[test]
    fn test_centroid_is_vertex_average() {
        // Vertex average differs from the area centroid for this quadrilateral
        let points = [
            Point::new(0.0, 0.0),
            Point::new(0.0, 4.0),
            Point::new(1.0, 4.0),
            Point::new(1.0, 3.0),
        ];
        let c = centroid(&points).unwrap();
        assert!((c.latitude - 0.5).abs() < 1e-12);
        assert!((c.longitude - 2.75).abs() < 1e-12);

        assert!(centroid(&[]).is_none());
    }
}
