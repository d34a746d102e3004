//! Prohibition overlay.
//!
//! While active, a translucent blocking sheet covers the whole map extent and
//! each zone intersecting the viewport is painted above it as an opaque
//! cutout. Cutouts sit at a higher z-index than the sheet; drawing them at the
//! same or lower level would show them as blocked.
//!
//! Cutout rebuilds are all-or-nothing. New cutouts are drawn first, and the
//! old set is only removed once every new one rendered. A failed rebuild
//! removes whatever it drew and leaves the previous cutouts in place.

use parkzone_core::error::Result;
use parkzone_core::models::{Bounds, Point, Polygon, ZoneId};
use parkzone_core::ports::{MapSurface, ShapeHandle, ShapeStyle};
use parkzone_geo::contains_point;
use parkzone_store::SharedRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    Inactive,
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportEventKind {
    PanEnd,
    ZoomChanged,
    TilesLoaded,
}

/// Viewport change reported by the map widget
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportEvent {
    pub kind: ViewportEventKind,
    pub bounds: Bounds,
}

impl ViewportEvent {
    pub fn new(kind: ViewportEventKind, bounds: Bounds) -> Self {
        Self { kind, bounds }
    }
}

#[derive(Debug, Clone)]
struct Cutout {
    zone_id: ZoneId,
    polygon: Polygon,
    handle: ShapeHandle,
}

#[derive(Debug)]
pub struct OverlayController {
    registry: SharedRegistry,
    extent: Bounds,
    global: Option<ShapeHandle>,
    cutouts: Vec<Cutout>,
    bounds: Option<Bounds>,
    rendered_generation: Option<u64>,
}

impl OverlayController {
    pub fn new(registry: SharedRegistry) -> Self {
        Self::with_extent(registry, Bounds::MERCATOR_WORLD)
    }

    /// Use a custom blocking extent instead of the full Web Mercator world
    pub fn with_extent(registry: SharedRegistry, extent: Bounds) -> Self {
        Self { registry, extent, global: None, cutouts: Vec::new(), bounds: None, rendered_generation: None }
    }

    pub fn state(&self) -> OverlayState {
        if self.global.is_some() {
            OverlayState::Active
        } else {
            OverlayState::Inactive
        }
    }

    pub fn is_active(&self) -> bool {
        self.global.is_some()
    }

    /// Viewport the current cutouts were built for
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Zones currently rendered as cutouts, in registry order
    pub fn cutout_zone_ids(&self) -> Vec<&ZoneId> {
        self.cutouts.iter().map(|c| &c.zone_id).collect()
    }

    pub fn cutout_count(&self) -> usize {
        self.cutouts.len()
    }

    /// Show the blocking sheet and build cutouts for `bounds`.
    ///
    /// Calling this while active keeps the existing sheet and only rebuilds
    /// the cutouts. If the first activation fails, the sheet it drew is
    /// removed again and the overlay stays inactive.
    pub fn activate<M: MapSurface>(&mut self, surface: &mut M, bounds: Bounds) -> Result<()> {
        let created = match self.global {
            Some(_) => None,
            None => {
                let handle = surface.draw_polygon(&self.extent.to_ring(), &ShapeStyle::blocking())?;
                self.global = Some(handle);
                tracing::debug!(handle = handle.0, "Drew global blocking shape");
                Some(handle)
            }
        };

        if let Err(e) = self.rebuild(surface, bounds) {
            if let Some(handle) = created {
                surface.remove(handle);
                self.global = None;
            }
            return Err(e);
        }
        Ok(())
    }

    /// Rebuild cutouts for new viewport bounds; no-op while inactive
    pub fn refresh<M: MapSurface>(&mut self, surface: &mut M, bounds: Bounds) -> Result<()> {
        if !self.is_active() {
            tracing::trace!("Overlay inactive, ignoring refresh");
            return Ok(());
        }
        self.rebuild(surface, bounds)
    }

    /// Handle a viewport change; returns whether cutouts were rebuilt
    pub fn on_viewport<M: MapSurface>(&mut self, surface: &mut M, event: ViewportEvent) -> Result<bool> {
        if !self.is_active() {
            return Ok(false);
        }
        tracing::trace!(kind = ?event.kind, "Viewport changed");
        self.rebuild(surface, event.bounds)?;
        Ok(true)
    }

    /// Rebuild if the registry changed since the cutouts were drawn
    pub fn sync<M: MapSurface>(&mut self, surface: &mut M) -> Result<bool> {
        let bounds = match (self.is_active(), self.bounds) {
            (true, Some(bounds)) => bounds,
            _ => return Ok(false),
        };
        if self.rendered_generation == Some(self.registry.generation()) {
            return Ok(false);
        }
        self.rebuild(surface, bounds)?;
        Ok(true)
    }

    /// Remove the sheet and every cutout
    pub fn deactivate<M: MapSurface>(&mut self, surface: &mut M) {
        for cutout in self.cutouts.drain(..) {
            surface.remove(cutout.handle);
        }
        if let Some(handle) = self.global.take() {
            surface.remove(handle);
        }
        self.bounds = None;
        self.rendered_generation = None;
        tracing::debug!("Overlay deactivated");
    }

    /// Whether the point renders as permitted.
    ///
    /// Everything is permitted while inactive.
    pub fn is_permitted(&self, point: Point) -> bool {
        if !self.is_active() {
            return true;
        }
        self.cutouts.iter().any(|c| contains_point(&c.polygon, point))
    }

    fn rebuild<M: MapSurface>(&mut self, surface: &mut M, bounds: Bounds) -> Result<()> {
        let (registry, generation) = self.registry.versioned_snapshot();
        let style = ShapeStyle::cutout();

        let mut fresh = Vec::new();
        for zone in registry.zones_intersecting(&bounds) {
            match surface.draw_polygon(zone.polygon.ring(), &style) {
                Ok(handle) => fresh.push(Cutout {
                    zone_id: zone.id.clone(),
                    polygon: zone.polygon.clone(),
                    handle,
                }),
                Err(e) => {
                    tracing::warn!(zone = %zone.id, error = %e, "Cutout rebuild failed, keeping previous cutouts");
                    for cutout in fresh {
                        surface.remove(cutout.handle);
                    }
                    return Err(e);
                }
            }
        }

        for cutout in std::mem::replace(&mut self.cutouts, fresh) {
            surface.remove(cutout.handle);
        }
        self.bounds = Some(bounds);
        self.rendered_generation = Some(generation);

        tracing::debug!(cutouts = self.cutouts.len(), generation, "Rebuilt overlay cutouts");
        Ok(())
    }
}
