use parkzone_core::error::{ParkzoneError, Result};
use parkzone_core::models::dataset::parse_lng_lat;
use parkzone_core::models::{Point, Polygon, RawZoneRecord, ValidityMode, Zone};

use crate::models::PolygonExt;
use crate::primitives::centroid;

/// Rings with a smaller planar area (square degrees) are treated as collinear
pub const MIN_AREA_SQ_DEG: f64 = 1e-14;

/// Validation result with details
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

/// Validation error with location details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub location: String,
    pub reason: String,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid() -> Self {
        Self { is_valid: true, errors: Vec::new() }
    }

    /// Add an error to the result
    pub fn add_error(&mut self, location: String, reason: String) {
        self.is_valid = false;
        self.errors.push(ValidationError { location, reason });
    }

    /// First error reason, if any
    pub fn first_reason(&self) -> Option<&str> {
        self.errors.first().map(|e| e.reason.as_str())
    }
}

/// Validate a raw ring before it becomes a polygon
pub fn validate_ring(ring: &[Point]) -> ValidationResult {
    let mut result = ValidationResult::valid();

    for (i, point) in ring.iter().enumerate() {
        if !point.is_finite() {
            result.add_error(format!("Ring[{}]", i), "Coordinates must be finite".to_string());
        }
    }
    if !result.is_valid {
        return result;
    }

    match Polygon::new(ring.to_vec()) {
        Ok(polygon) => {
            let area = polygon.area_sq_deg();
            if area < MIN_AREA_SQ_DEG {
                result.add_error(
                    "Ring".to_string(),
                    format!("Ring encloses no area ({:e} sq deg); vertices are collinear", area),
                );
            }
        }
        Err(e) => result.add_error("Ring".to_string(), e.to_string()),
    }

    result
}

/// Validate a constructed polygon
pub fn validate_polygon(polygon: &Polygon) -> ValidationResult {
    validate_ring(polygon.ring())
}

/// Build a zone from a loosely typed dataset record.
///
/// `index` is the record's position in the dataset; it names zones that have
/// no name and identifies records that have no id.
pub fn zone_from_record(record: &RawZoneRecord, index: usize, mode: ValidityMode) -> Result<Zone> {
    let zone_id = record.id_string().ok_or_else(|| ParkzoneError::InvalidZone {
        zone_id: format!("#{}", index),
        reason: "missing or empty id".to_string(),
    })?;

    let invalid = |reason: String| ParkzoneError::InvalidZone { zone_id: zone_id.clone(), reason };

    let raw_coordinates =
        record.coordinates.as_ref().ok_or_else(|| invalid("missing coordinates".to_string()))?;

    let mut vertices = Vec::with_capacity(raw_coordinates.len());
    for (i, value) in raw_coordinates.iter().enumerate() {
        match parse_lng_lat(value) {
            Some(point) => vertices.push(point),
            None if mode == ValidityMode::Strict => {
                return Err(invalid(format!("malformed coordinate at index {}: {}", i, value)));
            }
            None => {
                tracing::warn!(zone = %zone_id, index = i, "Dropping malformed coordinate");
            }
        }
    }

    let polygon = Polygon::new(vertices).map_err(|e| invalid(e.to_string()))?;

    let validation = validate_polygon(&polygon);
    if !validation.is_valid {
        return Err(invalid(validation.first_reason().unwrap_or("invalid polygon").to_string()));
    }

    let fallback_anchor = || centroid(polygon.vertices());
    let anchor = match record.marker_position.as_ref().map(parse_lng_lat) {
        Some(Some(anchor)) => anchor,
        Some(None) if mode == ValidityMode::Strict => {
            return Err(invalid("malformed markerPosition".to_string()));
        }
        Some(None) => {
            tracing::warn!(zone = %zone_id, "Malformed markerPosition, using vertex centroid");
            fallback_anchor().ok_or_else(|| invalid("no anchor".to_string()))?
        }
        None => fallback_anchor().ok_or_else(|| invalid("no anchor".to_string()))?,
    };

    let name = record
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Zone {}", index + 1));

    Ok(Zone::new(zone_id, name, polygon, anchor))
}
