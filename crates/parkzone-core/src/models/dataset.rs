//! Persisted zone dataset format.
//!
//! ```json
//! { "zones": [ { "id": "z1", "name": "Lot A",
//!                "coordinates": [[127.0, 37.5], [127.01, 37.5], [127.005, 37.51], [127.0, 37.5]],
//!                "markerPosition": [127.005, 37.503] } ] }
//! ```
//!
//! Coordinates are `[longitude, latitude]`, the reverse of [`Point`].

use serde::{Deserialize, Serialize};

use super::{Point, Zone};

/// Top-level dataset written by the authoring tool
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ZoneDataset {
    pub zones: Vec<ZoneRecord>,
}

/// One zone in persisted form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneRecord {
    pub id: String,
    pub name: String,
    /// Closed ring, `[lng, lat]`
    pub coordinates: Vec<[f64; 2]>,
    /// Anchor, `[lng, lat]`
    pub marker_position: [f64; 2],
}

impl From<&Zone> for ZoneRecord {
    fn from(zone: &Zone) -> Self {
        Self {
            id: zone.id.to_string(),
            name: zone.name.clone(),
            coordinates: zone.polygon.to_lng_lat(),
            marker_position: zone.anchor.to_lng_lat(),
        }
    }
}

impl ZoneDataset {
    pub fn from_zones<'a>(zones: impl IntoIterator<Item = &'a Zone>) -> Self {
        Self { zones: zones.into_iter().map(ZoneRecord::from).collect() }
    }
}

/// Loosely typed zone record used during ingestion.
///
/// Every field is optional or untyped so one malformed zone (or vertex) can be
/// reported and skipped without failing the whole dataset.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawZoneRecord {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub marker_position: Option<serde_json::Value>,
}

impl RawZoneRecord {
    /// Identifier as a string; numeric ids are accepted and stringified
    pub fn id_string(&self) -> Option<String> {
        match self.id.as_ref()? {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Parse a `[lng, lat, ...]` array into a point.
///
/// Returns `None` for anything that is not an array of at least two finite numbers.
pub fn parse_lng_lat(value: &serde_json::Value) -> Option<Point> {
    let pair = value.as_array()?;
    if pair.len() < 2 {
        return None;
    }
    let lng = pair[0].as_f64()?;
    let lat = pair[1].as_f64()?;
    let point = Point::new(lat, lng);
    point.is_finite().then_some(point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Polygon;
    use serde_json::json;

    #[test]
    fn test_record_uses_lng_lat_order() {
        let polygon =
            Polygon::new(vec![Point::new(37.5, 127.0), Point::new(37.5, 127.01), Point::new(37.51, 127.005)])
                .unwrap();
        let zone = Zone::new("z1", "Lot A", polygon, Point::new(37.503, 127.005));

        let value = serde_json::to_value(ZoneDataset::from_zones([&zone])).unwrap();

        assert_eq!(value["zones"][0]["id"], "z1");
        assert_eq!(value["zones"][0]["coordinates"][0], json!([127.0, 37.5]));
        assert_eq!(value["zones"][0]["coordinates"][3], json!([127.0, 37.5]));
        assert_eq!(value["zones"][0]["markerPosition"], json!([127.005, 37.503]));
    }

    #[test]
    fn test_raw_record_tolerates_missing_fields() {
        let raw: RawZoneRecord = serde_json::from_value(json!({ "name": "no id" })).unwrap();
        assert!(raw.id_string().is_none());
        assert!(raw.coordinates.is_none());

        let numeric: RawZoneRecord = serde_json::from_value(json!({ "id": 7 })).unwrap();
        assert_eq!(numeric.id_string().as_deref(), Some("7"));
    }

    #[test]
    fn test_parse_lng_lat() {
        assert_eq!(parse_lng_lat(&json!([127.0, 37.5])), Some(Point::new(37.5, 127.0)));
        assert_eq!(parse_lng_lat(&json!([127.0, 37.5, 12.0])), Some(Point::new(37.5, 127.0)));
        assert_eq!(parse_lng_lat(&json!([127.0])), None);
        assert_eq!(parse_lng_lat(&json!(["127.0", 37.5])), None);
        assert_eq!(parse_lng_lat(&json!({ "lat": 37.5 })), None);
    }
}
