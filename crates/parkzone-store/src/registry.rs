use std::collections::HashMap;

use parkzone_core::error::{ParkzoneError, Result};
use parkzone_core::models::{Bounds, Point, Zone, ZoneColor, ZoneId};
use parkzone_geo::spatial::{first_containing, zone_intersects_bounds};
use parkzone_geo::validation::validate_polygon;

/// Ordered set of zones keyed by id.
///
/// Iteration order is insertion order. Containment queries return the first
/// matching zone in that order, so overlapping zones resolve deterministically
/// to whichever was added first.
#[derive(Debug, Clone, Default)]
pub struct ZoneRegistry {
    zones: Vec<Zone>,
    index: HashMap<ZoneId, usize>,
}

impl ZoneRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry, failing on the first invalid or duplicate zone
    pub fn from_zones(zones: Vec<Zone>) -> Result<Self> {
        let mut registry = Self::new();
        for zone in zones {
            registry.add(zone)?;
        }
        Ok(registry)
    }

    /// Replace the whole contents.
    ///
    /// The new set is built aside and swapped in at the end. Invalid or
    /// duplicate zones are skipped and returned; they never abort the load.
    pub fn load(&mut self, zones: Vec<Zone>) -> Vec<ParkzoneError> {
        let mut next = Self::new();
        let mut rejected = Vec::new();

        for zone in zones {
            let id = zone.id.clone();
            if let Err(e) = next.add(zone) {
                tracing::warn!(zone = %id, error = %e, "Skipping zone");
                rejected.push(e);
            }
        }

        tracing::debug!(loaded = next.len(), skipped = rejected.len(), "Zone registry loaded");
        *self = next;
        rejected
    }

    /// Get a zone by id
    pub fn get(&self, id: &ZoneId) -> Option<&Zone> {
        self.index.get(id).map(|&i| &self.zones[i])
    }

    pub fn contains(&self, id: &ZoneId) -> bool {
        self.index.contains_key(id)
    }

    /// All zones in insertion order
    pub fn all(&self) -> &[Zone] {
        &self.zones
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Zones whose bounding box overlaps `bounds` (inclusive on edges)
    pub fn zones_intersecting(&self, bounds: &Bounds) -> Vec<&Zone> {
        self.zones.iter().filter(|zone| zone_intersects_bounds(zone, bounds)).collect()
    }

    /// First zone in insertion order containing the point
    pub fn first_containing(&self, point: Point) -> Option<&Zone> {
        first_containing(&self.zones, point)
    }

    /// Colours assigned to zones so far
    pub fn colors(&self) -> Vec<ZoneColor> {
        self.zones.iter().filter_map(|z| z.color).collect()
    }

    /// Add a zone at the end of the iteration order
    pub fn add(&mut self, zone: Zone) -> Result<()> {
        if self.index.contains_key(&zone.id) {
            return Err(ParkzoneError::DuplicateId { id: zone.id.to_string() });
        }

        let validation = validate_polygon(&zone.polygon);
        if !validation.is_valid {
            return Err(ParkzoneError::InvalidZone {
                zone_id: zone.id.to_string(),
                reason: validation.first_reason().unwrap_or("invalid polygon").to_string(),
            });
        }

        if !zone.anchor.is_finite() {
            return Err(ParkzoneError::InvalidZone {
                zone_id: zone.id.to_string(),
                reason: "anchor coordinates must be finite".to_string(),
            });
        }

        self.index.insert(zone.id.clone(), self.zones.len());
        self.zones.push(zone);
        Ok(())
    }

    /// Remove a zone, keeping the order of the rest
    pub fn remove(&mut self, id: &ZoneId) -> Result<Zone> {
        let position = self
            .index
            .remove(id)
            .ok_or_else(|| ParkzoneError::ZoneNotFound { id: id.to_string() })?;

        let zone = self.zones.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Ok(zone)
    }
}
