use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Point, Polygon, ZoneColor};

/// Stable unique identifier for a zone
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(pub String);

impl ZoneId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ZoneId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Named polygonal area where parking is permitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// Unique identifier
    pub id: ZoneId,

    /// Display name
    pub name: String,

    /// Closed boundary
    pub polygon: Polygon,

    /// Marker anchor used for labels and viewport filtering
    pub anchor: Point,

    /// Display colour assigned by the authoring tool; datasets do not carry one
    pub color: Option<ZoneColor>,
}

impl Zone {
    pub fn new(id: impl Into<ZoneId>, name: impl Into<String>, polygon: Polygon, anchor: Point) -> Self {
        Self { id: id.into(), name: name.into(), polygon, anchor, color: None }
    }

    pub fn with_color(mut self, color: ZoneColor) -> Self {
        self.color = Some(color);
        self
    }
}

impl From<String> for ZoneId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
