//! Device position marker.
//!
//! The last accepted fix is drawn as a "my location" marker with a circle
//! around it whose radius is the reported accuracy. The first fix after the
//! indicator was created (or cleared) also centres the view.

use parkzone_core::error::Result;
use parkzone_core::models::{Fix, Point};
use parkzone_core::ports::{MapSurface, ShapeHandle, ShapeStyle};

pub const MY_LOCATION_LABEL: &str = "my location";

#[derive(Debug, Default)]
pub struct LocationIndicator {
    marker: Option<ShapeHandle>,
    circle: Option<ShapeHandle>,
    last: Option<Point>,
}

impl LocationIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_shown(&self) -> bool {
        self.marker.is_some()
    }

    pub fn last_location(&self) -> Option<Point> {
        self.last
    }

    /// Show `fix`; returns `true` when this fix centred the view.
    ///
    /// The accuracy circle is redrawn on every fix and left out when the
    /// fix carries no usable accuracy.
    pub fn update<M: MapSurface>(&mut self, surface: &mut M, fix: &Fix) -> Result<bool> {
        let point = fix.point.validated()?;
        let first = self.marker.is_none();
        if first {
            surface.set_center(point)?;
        }

        if let Some(circle) = self.circle.take() {
            surface.remove(circle);
        }
        if let Some(radius) = fix.accuracy_m.filter(|r| r.is_finite() && *r >= 0.0) {
            self.circle = Some(surface.draw_circle(point, radius, &ShapeStyle::accuracy())?);
        }

        match self.marker {
            Some(marker) => surface.move_marker(marker, point)?,
            None => self.marker = Some(surface.place_marker(point, MY_LOCATION_LABEL)?),
        }
        self.last = Some(point);

        tracing::trace!(lat = point.latitude, lng = point.longitude, accuracy = ?fix.accuracy_m, "Location indicator moved");
        Ok(first)
    }

    /// Remove the marker and circle and forget the last location
    pub fn clear<M: MapSurface>(&mut self, surface: &mut M) {
        if let Some(circle) = self.circle.take() {
            surface.remove(circle);
        }
        if let Some(marker) = self.marker.take() {
            surface.remove(marker);
        }
        self.last = None;
    }
}
