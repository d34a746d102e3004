use geo::{Distance, Haversine};
use parkzone_core::models::{Bounds, Point, Zone};

use crate::models::to_geo_point;
use crate::primitives::{bounding_box, contains_point};

/// Great-circle distance in meters
pub fn distance_m(a: Point, b: Point) -> f64 {
    Haversine.distance(to_geo_point(a), to_geo_point(b))
}

/// Item nearest to `origin` within `radius_m`, ties going to the earlier item
pub fn nearest_within<'a, T, F>(items: &'a [T], origin: Point, radius_m: f64, position: F) -> Option<&'a T>
where
    F: Fn(&T) -> Point,
{
    items
        .iter()
        .map(|item| (distance_m(origin, position(item)), item))
        .filter(|(distance, _)| *distance <= radius_m)
        .fold(None, |best: Option<(f64, &T)>, (distance, item)| match best {
            Some((d, _)) if d <= distance => best,
            _ => Some((distance, item)),
        })
        .map(|(_, item)| item)
}

/// Check if a zone's bounding box overlaps the given bounds (inclusive)
pub fn zone_intersects_bounds(zone: &Zone, bounds: &Bounds) -> bool {
    bounding_box(&zone.polygon).intersects(bounds)
}

/// First zone, in input order, whose polygon contains the point.
///
/// The bounding box is checked before the full ray cast. Overlapping zones
/// resolve to whichever comes first.
pub fn first_containing<'a, I>(zones: I, point: Point) -> Option<&'a Zone>
where
    I: IntoIterator<Item = &'a Zone>,
{
    zones.into_iter().find(|zone| {
        bounding_box(&zone.polygon).contains(point) && contains_point(&zone.polygon, point)
    })
}

/// Count how many zones contain the point
pub fn count_containing<'a, I>(zones: I, point: Point) -> usize
where
    I: IntoIterator<Item = &'a Zone>,
{
    zones.into_iter().filter(|zone| contains_point(&zone.polygon, point)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use parkzone_core::models::Polygon;

    #[test]
    fn test_distance_between_known_points() {
        // one thousandth of a degree of latitude is about 111 m
        let d = distance_m(Point::new(37.5, 127.0), Point::new(37.501, 127.0));
        assert!((d - 111.2).abs() < 1.0, "distance was {d}");
        assert_eq!(distance_m(Point::new(37.5, 127.0), Point::new(37.5, 127.0)), 0.0);
    }

    #[test]
    fn test_nearest_within_radius() {
        let origin = Point::new(37.5, 127.0);
        let points = [Point::new(37.5008, 127.0), Point::new(37.5005, 127.0), Point::new(37.6, 127.0)];

        assert_eq!(nearest_within(&points, origin, 100.0, |p| *p), Some(&points[1]));
        assert_eq!(nearest_within(&points, origin, 10.0, |p| *p), None);
        assert_eq!(nearest_within(&points[2..], origin, 100.0, |p| *p), None);
    }

    fn square_zone(id: &str, south: f64, west: f64, size: f64) -> Zone {
        let polygon = Polygon::new(vec![
            Point::new(south, west),
            Point::new(south, west + size),
            Point::new(south + size, west + size),
            Point::new(south + size, west),
        ])
        .unwrap();
        Zone::new(id, id, polygon, Point::new(south + size / 2.0, west + size / 2.0))
    }

    #[test]
    fn test_distant_zone_does_not_intersect() {
        let zone = square_zone("far", 50.0, 50.0, 1.0);
        assert!(!zone_intersects_bounds(&zone, &Bounds::new(0.0, 0.0, 2.0, 2.0)));
    }

    #[test]
    fn test_edge_touching_zone_intersects() {
        let zone = square_zone("edge", 2.0, 2.0, 1.0);
        assert!(zone_intersects_bounds(&zone, &Bounds::new(0.0, 0.0, 2.0, 2.0)));
    }

    #[test]
    fn test_first_containing_prefers_input_order() {
        let zones = vec![square_zone("a", 0.0, 0.0, 2.0), square_zone("b", 1.0, 1.0, 2.0)];
        let overlap = Point::new(1.5, 1.5);

        assert_eq!(first_containing(&zones, overlap).map(|z| z.id.as_str()), Some("a"));
        assert_eq!(count_containing(&zones, overlap), 2);
        assert!(first_containing(&zones, Point::new(9.0, 9.0)).is_none());
    }
}
