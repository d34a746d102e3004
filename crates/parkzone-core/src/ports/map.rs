use crate::error::Result;
use crate::models::Point;

/// Handle to a shape or marker drawn on the map widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeHandle(pub u64);

/// Fill, stroke, and stacking order for a drawn polygon or circle
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeStyle {
    pub stroke_color: String,
    pub stroke_weight: u32,
    pub stroke_opacity: f32,
    pub fill_color: String,
    pub fill_opacity: f32,
    /// Higher values paint above lower ones
    pub z_index: i32,
}

impl ShapeStyle {
    pub const DEFAULT_ZONE_COLOR: &'static str = "#00AA88";

    /// Translucent grey sheet covering the world
    pub fn blocking() -> Self {
        Self {
            stroke_color: "#808080".to_string(),
            stroke_weight: 0,
            stroke_opacity: 0.0,
            fill_color: "#808080".to_string(),
            fill_opacity: 0.6,
            z_index: 1,
        }
    }

    /// Opaque permitted area painted over the blocking sheet
    pub fn cutout() -> Self {
        Self {
            stroke_color: Self::DEFAULT_ZONE_COLOR.to_string(),
            stroke_weight: 1,
            stroke_opacity: 0.8,
            fill_color: "#FFFFFF".to_string(),
            fill_opacity: 1.0,
            z_index: 2,
        }
    }

    /// Blue disc around the device position showing fix accuracy
    pub fn accuracy() -> Self {
        Self {
            stroke_color: "#0000FF".to_string(),
            stroke_weight: 1,
            stroke_opacity: 0.8,
            fill_color: "#0000FF".to_string(),
            fill_opacity: 0.2,
            z_index: 3,
        }
    }

    /// Regular zone outline in the given CSS colour
    pub fn zone(color: impl Into<String>) -> Self {
        let color = color.into();
        Self {
            stroke_color: color.clone(),
            stroke_weight: 2,
            stroke_opacity: 0.8,
            fill_color: color,
            fill_opacity: 0.3,
            z_index: 0,
        }
    }
}

/// Drawing primitives offered by the map widget.
///
/// Implementations own the rendered shapes; callers only keep handles.
pub trait MapSurface {
    /// Draw a closed ring and return a handle for later removal
    fn draw_polygon(&mut self, ring: &[Point], style: &ShapeStyle) -> Result<ShapeHandle>;

    /// Draw a circle with a radius in meters
    fn draw_circle(&mut self, center: Point, radius_m: f64, style: &ShapeStyle) -> Result<ShapeHandle>;

    /// Place a labelled marker
    fn place_marker(&mut self, position: Point, label: &str) -> Result<ShapeHandle>;

    /// Move an existing marker
    fn move_marker(&mut self, handle: ShapeHandle, position: Point) -> Result<()>;

    /// Remove a shape or marker; unknown handles are ignored
    fn remove(&mut self, handle: ShapeHandle);

    /// Pan the view so `center` is in the middle
    fn set_center(&mut self, center: Point) -> Result<()>;
}

impl<M: MapSurface + ?Sized> MapSurface for &mut M {
    fn draw_polygon(&mut self, ring: &[Point], style: &ShapeStyle) -> Result<ShapeHandle> {
        (**self).draw_polygon(ring, style)
    }

    fn draw_circle(&mut self, center: Point, radius_m: f64, style: &ShapeStyle) -> Result<ShapeHandle> {
        (**self).draw_circle(center, radius_m, style)
    }

    fn place_marker(&mut self, position: Point, label: &str) -> Result<ShapeHandle> {
        (**self).place_marker(position, label)
    }

    fn move_marker(&mut self, handle: ShapeHandle, position: Point) -> Result<()> {
        (**self).move_marker(handle, position)
    }

    fn remove(&mut self, handle: ShapeHandle) {
        (**self).remove(handle)
    }

    fn set_center(&mut self, center: Point) -> Result<()> {
        (**self).set_center(center)
    }
}
