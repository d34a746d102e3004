//! In-memory map surface.
//!
//! Keeps every drawn shape so the overlay and zone layer can run headless
//! (CLI, tests). `paint_at` answers what a viewer would see at a point: the
//! style of the top-most polygon covering it. Circles and markers never
//! take part in `paint_at`.

use std::collections::BTreeMap;

use parkzone_core::error::{ParkzoneError, Result};
use parkzone_core::models::Point;
use parkzone_core::ports::{MapSurface, ShapeHandle, ShapeStyle};
use parkzone_geo::ring_contains;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawnShape {
    Polygon { ring: Vec<Point>, style: ShapeStyle },
    Circle { center: Point, radius_m: f64, style: ShapeStyle },
    Marker { position: Point, label: String },
}

#[derive(Debug, Default)]
pub struct MemorySurface {
    shapes: BTreeMap<ShapeHandle, DrawnShape>,
    next_handle: u64,
    draw_budget: Option<usize>,
    center: Option<Point>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let the next `draws` polygon draws succeed, then fail every draw
    /// until [`clear_draw_limit`](Self::clear_draw_limit) is called
    pub fn limit_draws(&mut self, draws: usize) {
        self.draw_budget = Some(draws);
    }

    pub fn clear_draw_limit(&mut self) {
        self.draw_budget = None;
    }

    pub fn get(&self, handle: ShapeHandle) -> Option<&DrawnShape> {
        self.shapes.get(&handle)
    }

    pub fn shapes(&self) -> impl Iterator<Item = (&ShapeHandle, &DrawnShape)> {
        self.shapes.iter()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Polygons drawn at the given z-index
    pub fn polygons_at_z(&self, z_index: i32) -> Vec<&[Point]> {
        self.shapes
            .values()
            .filter_map(|shape| match shape {
                DrawnShape::Polygon { ring, style } if style.z_index == z_index => {
                    Some(ring.as_slice())
                }
                _ => None,
            })
            .collect()
    }

    /// Last center set on the view
    pub fn center(&self) -> Option<Point> {
        self.center
    }

    /// Center and radius of every circle on the surface
    pub fn circles(&self) -> Vec<(Point, f64)> {
        self.shapes
            .values()
            .filter_map(|shape| match shape {
                DrawnShape::Circle { center, radius_m, .. } => Some((*center, *radius_m)),
                _ => None,
            })
            .collect()
    }

    /// Position of the first marker carrying `label`
    pub fn marker_position(&self, label: &str) -> Option<Point> {
        self.shapes.values().find_map(|shape| match shape {
            DrawnShape::Marker { position, label: l } if l == label => Some(*position),
            _ => None,
        })
    }

    pub fn marker_labels(&self) -> Vec<&str> {
        self.shapes
            .values()
            .filter_map(|shape| match shape {
                DrawnShape::Marker { label, .. } => Some(label.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Style of the top-most polygon covering the point.
    ///
    /// Higher z-index wins; among equal z-indices the later drawn shape wins.
    pub fn paint_at(&self, point: Point) -> Option<&ShapeStyle> {
        self.shapes
            .iter()
            .filter_map(|(handle, shape)| match shape {
                DrawnShape::Polygon { ring, style } if ring_contains(ring, point) => {
                    Some((style.z_index, *handle, style))
                }
                _ => None,
            })
            .max_by_key(|(z, handle, _)| (*z, *handle))
            .map(|(_, _, style)| style)
    }

    fn allocate(&mut self, shape: DrawnShape) -> ShapeHandle {
        self.next_handle += 1;
        let handle = ShapeHandle(self.next_handle);
        self.shapes.insert(handle, shape);
        handle
    }
}

impl MapSurface for MemorySurface {
    fn draw_polygon(&mut self, ring: &[Point], style: &ShapeStyle) -> Result<ShapeHandle> {
        if let Some(budget) = self.draw_budget.as_mut() {
            if *budget == 0 {
                return Err(ParkzoneError::OverlayRender {
                    reason: "map surface refused to draw polygon".to_string(),
                });
            }
            *budget -= 1;
        }

        Ok(self.allocate(DrawnShape::Polygon { ring: ring.to_vec(), style: style.clone() }))
    }

    fn draw_circle(&mut self, center: Point, radius_m: f64, style: &ShapeStyle) -> Result<ShapeHandle> {
        if !center.is_finite() || !radius_m.is_finite() || radius_m < 0.0 {
            return Err(ParkzoneError::OverlayRender {
                reason: format!("cannot draw circle of radius {radius_m} m"),
            });
        }
        Ok(self.allocate(DrawnShape::Circle { center, radius_m, style: style.clone() }))
    }

    fn place_marker(&mut self, position: Point, label: &str) -> Result<ShapeHandle> {
        Ok(self.allocate(DrawnShape::Marker { position, label: label.to_string() }))
    }

    fn move_marker(&mut self, handle: ShapeHandle, position: Point) -> Result<()> {
        match self.shapes.get_mut(&handle) {
            Some(DrawnShape::Marker { position: current, .. }) => {
                *current = position;
                Ok(())
            }
            _ => Err(ParkzoneError::OverlayRender {
                reason: format!("no marker with handle {}", handle.0),
            }),
        }
    }

    fn remove(&mut self, handle: ShapeHandle) {
        self.shapes.remove(&handle);
    }

    fn set_center(&mut self, center: Point) -> Result<()> {
        let center = center.validated()?;
        self.center = Some(center);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parkzone_core::models::Bounds;

    #[test]
    fn test_paint_at_prefers_higher_z() {
        let mut surface = MemorySurface::new();
        let world = Bounds::new(-10.0, -10.0, 10.0, 10.0).to_ring();
        let small = Bounds::new(0.0, 0.0, 1.0, 1.0).to_ring();

        surface.draw_polygon(&small, &ShapeStyle::cutout()).unwrap();
        surface.draw_polygon(&world, &ShapeStyle::blocking()).unwrap();

        assert_eq!(surface.paint_at(Point::new(0.5, 0.5)).unwrap().z_index, 2);
        assert_eq!(surface.paint_at(Point::new(5.0, 5.0)).unwrap().z_index, 1);
        assert!(surface.paint_at(Point::new(50.0, 50.0)).is_none());
    }

    #[test]
    fn test_draw_limit() {
        let mut surface = MemorySurface::new();
        let ring = Bounds::new(0.0, 0.0, 1.0, 1.0).to_ring();
        surface.limit_draws(1);

        assert!(surface.draw_polygon(&ring, &ShapeStyle::cutout()).is_ok());
        assert!(matches!(
            surface.draw_polygon(&ring, &ShapeStyle::cutout()),
            Err(ParkzoneError::OverlayRender { .. })
        ));
        // markers are unaffected
        assert!(surface.place_marker(Point::new(0.0, 0.0), "1").is_ok());

        surface.clear_draw_limit();
        assert!(surface.draw_polygon(&ring, &ShapeStyle::cutout()).is_ok());
        assert_eq!(surface.len(), 3);
    }

    #[test]
    fn test_move_and_remove_marker() {
        let mut surface = MemorySurface::new();
        let marker = surface.place_marker(Point::new(1.0, 1.0), "Lot A").unwrap();

        surface.move_marker(marker, Point::new(2.0, 2.0)).unwrap();
        assert_eq!(
            surface.get(marker),
            Some(&DrawnShape::Marker { position: Point::new(2.0, 2.0), label: "Lot A".to_string() })
        );

        surface.remove(marker);
        assert!(surface.is_empty());
        assert!(surface.move_marker(marker, Point::new(0.0, 0.0)).is_err());
    }

    #[test]
    fn test_circles_do_not_paint() {
        let mut surface = MemorySurface::new();
        let circle = surface.draw_circle(Point::new(0.5, 0.5), 30.0, &ShapeStyle::accuracy()).unwrap();

        assert_eq!(surface.circles(), vec![(Point::new(0.5, 0.5), 30.0)]);
        assert!(surface.paint_at(Point::new(0.5, 0.5)).is_none());
        // a circle is not a marker
        assert!(surface.move_marker(circle, Point::new(1.0, 1.0)).is_err());
        assert!(surface.draw_circle(Point::new(0.5, 0.5), f64::NAN, &ShapeStyle::accuracy()).is_err());
        assert!(surface.draw_circle(Point::new(0.5, 0.5), -1.0, &ShapeStyle::accuracy()).is_err());
    }

    #[test]
    fn test_set_center_rejects_non_finite() {
        let mut surface = MemorySurface::new();
        surface.set_center(Point::new(37.5, 127.0)).unwrap();
        assert!(surface.set_center(Point::new(f64::NAN, 127.0)).is_err());
        assert_eq!(surface.center(), Some(Point::new(37.5, 127.0)));
    }
}
