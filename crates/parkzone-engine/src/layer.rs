//! Zone outlines and anchor markers.

use std::collections::HashMap;

use parkzone_core::error::Result;
use parkzone_core::models::{Zone, ZoneId};
use parkzone_core::ports::{MapSurface, ShapeHandle, ShapeStyle};
use parkzone_store::SharedRegistry;

#[derive(Debug, Clone, Copy)]
struct DrawnZone {
    outline: ShapeHandle,
    marker: ShapeHandle,
}

/// Draws every registry zone in its colour with a labelled anchor marker
#[derive(Debug)]
pub struct ZoneLayer {
    registry: SharedRegistry,
    drawn: HashMap<ZoneId, DrawnZone>,
    rendered_generation: Option<u64>,
}

impl ZoneLayer {
    pub fn new(registry: SharedRegistry) -> Self {
        Self { registry, drawn: HashMap::new(), rendered_generation: None }
    }

    pub fn is_drawn(&self, id: &ZoneId) -> bool {
        self.drawn.contains_key(id)
    }

    pub fn drawn_count(&self) -> usize {
        self.drawn.len()
    }

    /// Bring the drawn shapes in line with the registry.
    ///
    /// Zones no longer in the registry are removed and new ones drawn. Nothing
    /// happens when the registry generation has not moved. After a failed draw
    /// the generation is left stale so the next call retries.
    pub fn sync<M: MapSurface>(&mut self, surface: &mut M) -> Result<()> {
        let (registry, generation) = self.registry.versioned_snapshot();
        if self.rendered_generation == Some(generation) {
            return Ok(());
        }

        let stale: Vec<ZoneId> =
            self.drawn.keys().filter(|id| !registry.contains(id)).cloned().collect();
        for id in stale {
            self.remove_zone(surface, &id);
        }

        for zone in registry.all() {
            if !self.drawn.contains_key(&zone.id) {
                let drawn = draw_zone(surface, zone)?;
                self.drawn.insert(zone.id.clone(), drawn);
            }
        }

        self.rendered_generation = Some(generation);
        tracing::debug!(zones = self.drawn.len(), generation, "Zone layer synced");
        Ok(())
    }

    /// Remove one zone's shapes; unknown ids are ignored
    pub fn remove_zone<M: MapSurface>(&mut self, surface: &mut M, id: &ZoneId) {
        if let Some(drawn) = self.drawn.remove(id) {
            surface.remove(drawn.outline);
            surface.remove(drawn.marker);
        }
    }

    pub fn clear<M: MapSurface>(&mut self, surface: &mut M) {
        for (_, drawn) in self.drawn.drain() {
            surface.remove(drawn.outline);
            surface.remove(drawn.marker);
        }
        self.rendered_generation = None;
    }
}

fn draw_zone<M: MapSurface>(surface: &mut M, zone: &Zone) -> Result<DrawnZone> {
    let color = zone
        .color
        .map(|c| c.to_string())
        .unwrap_or_else(|| ShapeStyle::DEFAULT_ZONE_COLOR.to_string());

    let outline = surface.draw_polygon(zone.polygon.ring(), &ShapeStyle::zone(color))?;
    let marker = match surface.place_marker(zone.anchor, &zone.name) {
        Ok(marker) => marker,
        Err(e) => {
            surface.remove(outline);
            return Err(e);
        }
    };
    Ok(DrawnZone { outline, marker })
}
