//! Municipal parking-lot feed.
//!
//! The feed is a plain JSON array published by the provincial open-data
//! portal. Coordinates come as strings or numbers:
//!
//! ```json
//! [ { "INST_NM": "Suwon City", "REFINE_WGS84_LAT": "37.2636", "REFINE_WGS84_LOGT": "127.0286" } ]
//! ```

use serde::{Deserialize, Serialize};

use super::Point;

/// Shown when a feed entry has no institution name
pub const DEFAULT_LOT_NAME: &str = "municipal parking stand";

/// A parking stand that loaded from the feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MunicipalLot {
    /// Position of the entry in the source array
    pub index: usize,
    pub name: String,
    pub position: Point,
}

/// Feed entry as published
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLotRecord {
    #[serde(rename = "INST_NM", default)]
    pub name: Option<String>,
    #[serde(rename = "REFINE_WGS84_LAT", default)]
    pub latitude: Option<serde_json::Value>,
    #[serde(rename = "REFINE_WGS84_LOGT", default)]
    pub longitude: Option<serde_json::Value>,
}

impl RawLotRecord {
    pub fn display_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => DEFAULT_LOT_NAME.to_string(),
        }
    }

    /// Position when both coordinates parse to finite numbers
    pub fn position(&self) -> Option<Point> {
        let point = Point::new(coordinate(self.latitude.as_ref()?)?, coordinate(self.longitude.as_ref()?)?);
        point.is_finite().then_some(point)
    }

    pub fn into_lot(self, index: usize) -> Option<MunicipalLot> {
        let position = self.position()?;
        Some(MunicipalLot { index, name: self.display_name(), position })
    }
}

fn coordinate(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
