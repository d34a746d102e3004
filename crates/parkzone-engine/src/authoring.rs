//! Interactive zone capture.
//!
//! The tool is either idle or collecting points. Collected points carry
//! 1-based ordinals that are renumbered on removal so labels stay contiguous.
//! Throwing away collected points (restarting or stopping) needs the caller's
//! confirmation.

use rand::rngs::StdRng;
use rand::Rng;
use uuid::Uuid;

use parkzone_core::error::{ParkzoneError, Result};
use parkzone_core::models::{Point, Polygon, Zone, ZoneDataset, ZoneId};
use parkzone_geo::centroid;
use parkzone_store::dataset::export_registry;
use parkzone_store::SharedRegistry;

use crate::color::ColorPicker;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum AuthoringState {
    #[default]
    Idle,
    Collecting { points: Vec<Point> },
}

impl AuthoringState {
    fn describe(&self) -> String {
        match self {
            AuthoringState::Idle => "idle".to_string(),
            AuthoringState::Collecting { points } => format!("collecting {} points", points.len()),
        }
    }
}

/// A collected point with its display ordinal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabeledPoint {
    pub ordinal: usize,
    pub point: Point,
}

#[derive(Debug)]
pub struct AuthoringTool<R = StdRng> {
    registry: SharedRegistry,
    state: AuthoringState,
    colors: ColorPicker<R>,
}

impl AuthoringTool<StdRng> {
    pub fn new(registry: SharedRegistry) -> Self {
        Self::with_picker(registry, ColorPicker::default())
    }
}

impl<R: Rng> AuthoringTool<R> {
    pub fn with_picker(registry: SharedRegistry, colors: ColorPicker<R>) -> Self {
        Self { registry, state: AuthoringState::Idle, colors }
    }

    pub fn state(&self) -> &AuthoringState {
        &self.state
    }

    pub fn is_collecting(&self) -> bool {
        matches!(self.state, AuthoringState::Collecting { .. })
    }

    /// Points collected so far; empty while idle
    pub fn points(&self) -> &[Point] {
        match &self.state {
            AuthoringState::Collecting { points } => points,
            AuthoringState::Idle => &[],
        }
    }

    pub fn labeled_points(&self) -> Vec<LabeledPoint> {
        self.points()
            .iter()
            .enumerate()
            .map(|(i, &point)| LabeledPoint { ordinal: i + 1, point })
            .collect()
    }

    /// Ordinal the next added point will get
    pub fn next_ordinal(&self) -> usize {
        self.points().len() + 1
    }

    /// Begin a new capture.
    ///
    /// When points are already being collected, `confirm` is asked with the
    /// number of points that would be discarded.
    pub fn start_collecting<F>(&mut self, confirm: F) -> Result<()>
    where
        F: FnOnce(usize) -> bool,
    {
        self.confirm_discard(confirm)?;
        self.state = AuthoringState::Collecting { points: Vec::new() };
        tracing::debug!("Started collecting zone points");
        Ok(())
    }

    /// Abandon the capture and go back to idle
    pub fn stop_collecting<F>(&mut self, confirm: F) -> Result<()>
    where
        F: FnOnce(usize) -> bool,
    {
        self.confirm_discard(confirm)?;
        self.state = AuthoringState::Idle;
        Ok(())
    }

    fn confirm_discard<F>(&self, confirm: F) -> Result<()>
    where
        F: FnOnce(usize) -> bool,
    {
        let pending = self.points().len();
        if pending > 0 && !confirm(pending) {
            return Err(ParkzoneError::DiscardDeclined { pending });
        }
        Ok(())
    }

    /// Append a point; returns its ordinal
    pub fn add_point(&mut self, point: Point) -> Result<usize> {
        let point = point.validated()?;
        let points = self.collecting_mut("add a point")?;
        points.push(point);
        Ok(points.len())
    }

    /// Remove the point at `index` (0-based); later points move up one ordinal
    pub fn remove_point(&mut self, index: usize) -> Result<Point> {
        let points = self.collecting_mut("remove a point")?;
        if index >= points.len() {
            return Err(ParkzoneError::InvalidIndex { index, len: points.len() });
        }
        Ok(points.remove(index))
    }

    /// Turn the collected points into a zone and add it to the registry.
    ///
    /// The anchor is the vertex average and the colour is picked away from
    /// every existing zone colour. Without a name the zone is called
    /// `Zone N`, N being its position in the registry. On failure the
    /// collected points are kept.
    pub fn finish_zone(&mut self, name: Option<&str>) -> Result<Zone> {
        let points = self.collecting_mut("finish a zone")?.clone();
        if points.len() < Polygon::MIN_VERTICES {
            return Err(ParkzoneError::NotEnoughPoints {
                required: Polygon::MIN_VERTICES,
                found: points.len(),
            });
        }

        let id = ZoneId::new(format!("zone_{}", Uuid::new_v4().simple()));
        let polygon = Polygon::new(points).map_err(|e| ParkzoneError::InvalidZone {
            zone_id: id.to_string(),
            reason: e.to_string(),
        })?;
        let anchor = centroid(polygon.vertices()).ok_or_else(|| ParkzoneError::InvalidZone {
            zone_id: id.to_string(),
            reason: "no vertices".to_string(),
        })?;

        let registry = self.registry.snapshot();
        let color = self.colors.pick(&registry.colors());
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Zone {}", registry.len() + 1));

        let zone = Zone::new(id, name, polygon, anchor).with_color(color);
        self.registry.update(|r| r.add(zone.clone()))?;
        self.state = AuthoringState::Idle;

        tracing::info!(zone = %zone.id, name = %zone.name, color = %color, "Created zone");
        Ok(zone)
    }

    /// Delete a zone from the registry
    pub fn delete_zone(&mut self, id: &ZoneId) -> Result<Zone> {
        let zone = self.registry.update(|r| r.remove(id))?;
        tracing::info!(zone = %id, "Deleted zone");
        Ok(zone)
    }

    /// Persisted form of the whole registry
    pub fn export_registry(&self) -> ZoneDataset {
        export_registry(&self.registry.snapshot())
    }

    fn collecting_mut(&mut self, operation: &'static str) -> Result<&mut Vec<Point>> {
        match &mut self.state {
            AuthoringState::Collecting { points } => Ok(points),
            state => Err(ParkzoneError::InvalidState { operation, state: state.describe() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parkzone_store::ZoneRegistry;

    fn tool() -> (SharedRegistry, AuthoringTool) {
        let registry = SharedRegistry::new(ZoneRegistry::new());
        let picker = ColorPicker::seeded(3, 50, 30.0);
        (registry.clone(), AuthoringTool::with_picker(registry, picker))
    }

    fn collect_triangle(tool: &mut AuthoringTool, lat: f64) {
        tool.start_collecting(|_| true).unwrap();
        tool.add_point(Point::new(lat, 127.0)).unwrap();
        tool.add_point(Point::new(lat, 127.01)).unwrap();
        tool.add_point(Point::new(lat + 0.01, 127.005)).unwrap();
    }

    #[test]
    fn test_points_require_collecting() {
        let (_, mut tool) = tool();
        let err = tool.add_point(Point::new(0.0, 0.0)).unwrap_err();
        assert!(matches!(err, ParkzoneError::InvalidState { operation: "add a point", .. }));
        assert!(matches!(tool.finish_zone(None), Err(ParkzoneError::InvalidState { .. })));
    }

    #[test]
    fn test_remove_point_renumbers() {
        let (_, mut tool) = tool();
        tool.start_collecting(|_| true).unwrap();
        for i in 0..4 {
            assert_eq!(tool.add_point(Point::new(f64::from(i), 0.0)).unwrap(), i as usize + 1);
        }

        assert_eq!(tool.remove_point(1).unwrap(), Point::new(1.0, 0.0));
        let labels: Vec<(usize, f64)> =
            tool.labeled_points().iter().map(|p| (p.ordinal, p.point.latitude)).collect();
        assert_eq!(labels, vec![(1, 0.0), (2, 2.0), (3, 3.0)]);
        assert_eq!(tool.next_ordinal(), 4);

        assert!(matches!(tool.remove_point(3), Err(ParkzoneError::InvalidIndex { index: 3, len: 3 })));
    }

    #[test]
    fn test_restart_needs_confirmation() {
        let (_, mut tool) = tool();
        tool.start_collecting(|_| panic!("nothing to discard")).unwrap();
        tool.add_point(Point::new(0.0, 0.0)).unwrap();

        let err = tool.start_collecting(|pending| pending == 0).unwrap_err();
        assert!(matches!(err, ParkzoneError::DiscardDeclined { pending: 1 }));
        assert_eq!(tool.points().len(), 1);

        tool.start_collecting(|pending| pending == 1).unwrap();
        assert!(tool.points().is_empty());

        tool.stop_collecting(|_| false).unwrap();
        assert!(!tool.is_collecting());
    }

    #[test]
    fn test_finish_requires_three_points() {
        let (_, mut tool) = tool();
        tool.start_collecting(|_| true).unwrap();
        tool.add_point(Point::new(0.0, 0.0)).unwrap();
        tool.add_point(Point::new(0.0, 1.0)).unwrap();

        let err = tool.finish_zone(None).unwrap_err();
        assert!(matches!(err, ParkzoneError::NotEnoughPoints { required: 3, found: 2 }));
        assert!(tool.is_collecting());
    }

    #[test]
    fn test_collinear_points_are_rejected_and_kept() {
        let (registry, mut tool) = tool();
        tool.start_collecting(|_| true).unwrap();
        for i in 0..3 {
            tool.add_point(Point::new(f64::from(i), f64::from(i))).unwrap();
        }

        assert!(matches!(tool.finish_zone(None), Err(ParkzoneError::InvalidZone { .. })));
        assert_eq!(tool.points().len(), 3);
        assert_eq!(registry.generation(), 0);
    }

    #[test]
    fn test_finish_zone_adds_to_registry() {
        let (registry, mut tool) = tool();
        collect_triangle(&mut tool, 37.5);

        let zone = tool.finish_zone(None).unwrap();

        assert!(zone.id.as_str().starts_with("zone_"));
        assert_eq!(zone.id.as_str().len(), "zone_".len() + 32);
        assert_eq!(zone.name, "Zone 1");
        assert_eq!(zone.polygon.ring().len(), 4);
        assert!((zone.anchor.latitude - (37.5 + 0.01 / 3.0)).abs() < 1e-9);
        assert!((zone.anchor.longitude - 127.005).abs() < 1e-9);
        assert!(zone.color.is_some());
        assert!(!tool.is_collecting());
        assert!(registry.snapshot().contains(&zone.id));
    }

    #[test]
    fn test_five_zones_get_separated_hues() {
        let (registry, mut tool) = tool();
        for i in 0..5 {
            collect_triangle(&mut tool, 37.5 + f64::from(i) * 0.1);
            tool.finish_zone(Some(&format!("Lot {}", i))).unwrap();
        }

        let colors = registry.snapshot().colors();
        assert_eq!(colors.len(), 5);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[..i] {
                assert!(a.hue_distance(b) > 30.0, "{} vs {}", a, b);
            }
        }
    }

    #[test]
    fn test_delete_and_export() {
        let (_, mut tool) = tool();
        collect_triangle(&mut tool, 37.5);
        let first = tool.finish_zone(Some("Lot A")).unwrap();
        collect_triangle(&mut tool, 37.6);
        tool.finish_zone(Some("  ")).unwrap();

        let dataset = tool.export_registry();
        assert_eq!(dataset.zones.len(), 2);
        assert_eq!(dataset.zones[1].name, "Zone 2");

        tool.delete_zone(&first.id).unwrap();
        assert_eq!(tool.export_registry().zones.len(), 1);
        assert!(matches!(tool.delete_zone(&first.id), Err(ParkzoneError::ZoneNotFound { .. })));
    }
}
