//! Municipal parking-lot markers.

use serde::Serialize;

use parkzone_core::models::MunicipalLot;
use parkzone_core::ports::{MapSurface, ShapeHandle};

/// Markers placed and refused by the surface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LotDrawReport {
    pub drawn: usize,
    pub failed: usize,
}

/// One labelled marker per loaded lot
#[derive(Debug, Default)]
pub struct LotLayer {
    lots: Vec<MunicipalLot>,
    markers: Vec<ShapeHandle>,
}

impl LotLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lots that have a marker on the surface
    pub fn lots(&self) -> &[MunicipalLot] {
        &self.lots
    }

    /// Lot by its index in the source feed
    pub fn get(&self, index: usize) -> Option<&MunicipalLot> {
        self.lots.iter().find(|lot| lot.index == index)
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Replace the layer with `lots`.
    ///
    /// A marker the surface refuses is counted as failed and the lot is left
    /// out of the layer.
    pub fn show<M: MapSurface>(&mut self, surface: &mut M, lots: Vec<MunicipalLot>) -> LotDrawReport {
        self.clear(surface);
        let mut report = LotDrawReport::default();

        for lot in lots {
            match surface.place_marker(lot.position, &lot.name) {
                Ok(marker) => {
                    self.markers.push(marker);
                    self.lots.push(lot);
                    report.drawn += 1;
                }
                Err(e) => {
                    tracing::warn!(index = lot.index, error = %e, "Parking-lot marker not placed");
                    report.failed += 1;
                }
            }
        }

        tracing::info!(drawn = report.drawn, failed = report.failed, "Parking-lot layer drawn");
        report
    }

    pub fn clear<M: MapSurface>(&mut self, surface: &mut M) {
        for marker in self.markers.drain(..) {
            surface.remove(marker);
        }
        self.lots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurface;
    use parkzone_core::models::Point;

    fn lot(index: usize, name: &str, lat: f64) -> MunicipalLot {
        MunicipalLot { index, name: name.to_string(), position: Point::new(lat, 127.0) }
    }

    #[test]
    fn test_show_places_labelled_markers() {
        let mut surface = MemorySurface::new();
        let mut layer = LotLayer::new();

        let report = layer.show(&mut surface, vec![lot(0, "Suwon", 37.26), lot(2, "Anyang", 37.39)]);

        assert_eq!(report, LotDrawReport { drawn: 2, failed: 0 });
        assert_eq!(surface.marker_labels(), vec!["Suwon", "Anyang"]);
        assert_eq!(layer.get(2).map(|l| l.name.as_str()), Some("Anyang"));
        assert!(layer.get(1).is_none());
    }

    #[test]
    fn test_show_replaces_previous_markers() {
        let mut surface = MemorySurface::new();
        let mut layer = LotLayer::new();
        layer.show(&mut surface, vec![lot(0, "Suwon", 37.26), lot(1, "Anyang", 37.39)]);

        layer.show(&mut surface, vec![lot(0, "Yongin", 37.24)]);

        assert_eq!(surface.marker_labels(), vec!["Yongin"]);
        assert_eq!(layer.marker_count(), 1);

        layer.clear(&mut surface);
        assert!(surface.is_empty());
        assert!(layer.lots().is_empty());
    }
}
