//! Property tests for polygon serialization

use parkzone_core::models::{Point, Polygon};
use proptest::prelude::*;

fn coordinate() -> impl Strategy<Value = Point> {
    // Small grid so generated rings often repeat vertices
    (-3i32..3, -3i32..3).prop_map(|(lat, lng)| Point::new(f64::from(lat), f64::from(lng)))
}

proptest! {
    #[test]
    fn prop_deserialize_accepts_exactly_what_new_accepts(
        ring in prop::collection::vec(coordinate(), 0..8),
    ) {
        let json = serde_json::to_string(&ring).unwrap();
        let decoded: Result<Polygon, _> = serde_json::from_str(&json);
        let constructed = Polygon::new(ring);

        prop_assert_eq!(decoded.is_ok(), constructed.is_ok());
        if let (Ok(decoded), Ok(constructed)) = (decoded, constructed) {
            prop_assert_eq!(decoded.vertex_count(), constructed.vertex_count());
            prop_assert!(decoded.vertex_count() >= Polygon::MIN_VERTICES);
        }
    }

    #[test]
    fn prop_serialized_ring_reloads_unchanged(
        ring in prop::collection::vec(coordinate(), 3..8),
    ) {
        if let Ok(polygon) = Polygon::new(ring) {
            let json = serde_json::to_string(&polygon).unwrap();
            let reloaded: Polygon = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(reloaded, polygon);
        }
    }
}
