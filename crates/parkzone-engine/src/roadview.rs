//! Street-level imagery popup.
//!
//! Clicking a zone marker or a municipal lot marker opens a popup showing the
//! nearest panorama within [`ROADVIEW_RADIUS_M`]. At most one popup is open:
//! opening another replaces it and a click on the map hides it.
//!
//! Lookups are tagged with a ticket. A result that arrives after its popup
//! was replaced or hidden is dropped.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use parkzone_core::error::Result;
use parkzone_core::models::{Point, ZoneId};
use parkzone_core::ports::{PanoramaId, PanoramaLocator, ROADVIEW_RADIUS_M};
use parkzone_geo::spatial::nearest_within;

/// What the popup was opened for
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum RoadviewTarget {
    Zone(ZoneId),
    /// Index into the municipal lot feed
    Lot(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "camelCase")]
pub enum PanoramaState {
    Loading,
    Available(PanoramaId),
    /// No imagery within range of the marker
    Unavailable,
    /// The lookup itself failed
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveRoadview {
    pub target: RoadviewTarget,
    pub title: String,
    pub position: Point,
    pub panorama: PanoramaState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoadviewTicket(u64);

#[derive(Debug, Default)]
pub struct RoadviewPopup {
    active: Option<ActiveRoadview>,
    generation: u64,
}

impl RoadviewPopup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&ActiveRoadview> {
        self.active.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    /// Open a loading popup, replacing any open one
    pub fn begin(&mut self, target: RoadviewTarget, title: impl Into<String>, position: Point) -> RoadviewTicket {
        if let Some(previous) = self.active.take() {
            tracing::debug!(replaced = ?previous.target, "Replacing open roadview");
        }
        self.generation += 1;
        self.active = Some(ActiveRoadview {
            target,
            title: title.into(),
            position,
            panorama: PanoramaState::Loading,
        });
        RoadviewTicket(self.generation)
    }

    /// Apply a lookup result; `false` when the ticket is stale
    pub fn resolve(&mut self, ticket: RoadviewTicket, result: Result<Option<PanoramaId>>) -> bool {
        let current = ticket.0 == self.generation;
        let Some(active) = self.active.as_mut().filter(|_| current) else {
            tracing::debug!(ticket = ticket.0, "Dropping stale panorama lookup");
            return false;
        };

        active.panorama = match result {
            Ok(Some(id)) => PanoramaState::Available(id),
            Ok(None) => {
                tracing::info!(title = %active.title, "No roadview near marker");
                PanoramaState::Unavailable
            }
            Err(e) => {
                tracing::warn!(title = %active.title, error = %e, "Panorama lookup failed");
                PanoramaState::Failed(e.to_string())
            }
        };
        true
    }

    /// Open a popup and look up its panorama
    pub async fn open(
        &mut self,
        locator: &dyn PanoramaLocator,
        target: RoadviewTarget,
        title: impl Into<String>,
        position: Point,
    ) -> Option<&ActiveRoadview> {
        let ticket = self.begin(target, title, position);
        let result = locator.nearest(position, ROADVIEW_RADIUS_M).await;
        self.resolve(ticket, result);
        self.active()
    }

    /// Close the popup; `true` when one was open
    pub fn hide(&mut self) -> bool {
        self.generation += 1;
        self.active.take().is_some()
    }
}

/// A panorama and where it was captured
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: PanoramaId,
    pub position: Point,
}

/// In-memory `PanoramaLocator` over a fixed list of capture points
#[derive(Debug, Clone, Default)]
pub struct PanoramaCatalog {
    entries: Vec<CatalogEntry>,
}

impl PanoramaCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl PanoramaLocator for PanoramaCatalog {
    async fn nearest(&self, point: Point, radius_m: f64) -> Result<Option<PanoramaId>> {
        let point = point.validated()?;
        Ok(nearest_within(&self.entries, point, radius_m, |e| e.position).map(|e| e.id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parkzone_core::error::ParkzoneError;
    use std::sync::Mutex;

    /// Panoramas at fixed points; records every lookup
    struct Panoramas {
        known: Vec<(Point, &'static str)>,
        lookups: Mutex<Vec<f64>>,
    }

    #[async_trait]
    impl PanoramaLocator for Panoramas {
        async fn nearest(&self, point: Point, radius_m: f64) -> Result<Option<PanoramaId>> {
            self.lookups.lock().unwrap().push(radius_m);
            Ok(self.known.iter().find(|(p, _)| *p == point).map(|(_, id)| PanoramaId(id.to_string())))
        }
    }

    struct Broken;

    #[async_trait]
    impl PanoramaLocator for Broken {
        async fn nearest(&self, _point: Point, _radius_m: f64) -> Result<Option<PanoramaId>> {
            Err(ParkzoneError::Panorama { reason: "imagery service down".to_string() })
        }
    }

    #[tokio::test]
    async fn test_catalog_picks_closest_capture_in_range() {
        let catalog = PanoramaCatalog::new(vec![
            CatalogEntry { id: PanoramaId("far".to_string()), position: Point::new(37.5008, 127.0) },
            CatalogEntry { id: PanoramaId("near".to_string()), position: Point::new(37.5003, 127.0) },
        ]);
        let origin = Point::new(37.5, 127.0);

        assert_eq!(catalog.nearest(origin, ROADVIEW_RADIUS_M).await.unwrap(), Some(PanoramaId("near".to_string())));
        assert_eq!(catalog.nearest(Point::new(37.51, 127.0), ROADVIEW_RADIUS_M).await.unwrap(), None);
        assert!(catalog.nearest(Point::new(f64::NAN, 127.0), ROADVIEW_RADIUS_M).await.is_err());
    }

    fn zone(id: &str) -> RoadviewTarget {
        RoadviewTarget::Zone(ZoneId::from(id))
    }

    #[tokio::test]
    async fn test_open_finds_panorama_within_radius() {
        let locator = Panoramas { known: vec![(Point::new(37.5, 127.0), "pano-1")], lookups: Mutex::default() };
        let mut popup = RoadviewPopup::new();

        let active = popup.open(&locator, zone("z1"), "Lot A", Point::new(37.5, 127.0)).await.unwrap();

        assert_eq!(active.panorama, PanoramaState::Available(PanoramaId("pano-1".to_string())));
        assert_eq!(*locator.lookups.lock().unwrap(), vec![ROADVIEW_RADIUS_M]);
    }

    #[tokio::test]
    async fn test_missing_imagery_is_unavailable() {
        let locator = Panoramas { known: Vec::new(), lookups: Mutex::default() };
        let mut popup = RoadviewPopup::new();

        let active = popup.open(&locator, RoadviewTarget::Lot(3), "Suwon", Point::new(37.2, 127.0)).await;

        assert_eq!(active.map(|a| &a.panorama), Some(&PanoramaState::Unavailable));
    }

    #[tokio::test]
    async fn test_lookup_failure_keeps_popup_open() {
        let mut popup = RoadviewPopup::new();

        popup.open(&Broken, zone("z1"), "Lot A", Point::new(37.5, 127.0)).await;

        assert!(matches!(popup.active().map(|a| &a.panorama), Some(PanoramaState::Failed(r)) if r.contains("down")));
    }

    #[test]
    fn test_single_popup_and_stale_results() {
        let mut popup = RoadviewPopup::new();
        let first = popup.begin(zone("z1"), "Lot A", Point::new(37.5, 127.0));
        let second = popup.begin(zone("z2"), "Lot B", Point::new(37.6, 127.0));

        // the first popup was replaced, its lookup no longer applies
        assert!(!popup.resolve(first, Ok(Some(PanoramaId("old".to_string())))));
        assert_eq!(popup.active().unwrap().target, zone("z2"));
        assert_eq!(popup.active().unwrap().panorama, PanoramaState::Loading);

        assert!(popup.resolve(second, Ok(None)));
        assert_eq!(popup.active().unwrap().panorama, PanoramaState::Unavailable);
    }

    #[test]
    fn test_hide_drops_in_flight_lookup() {
        let mut popup = RoadviewPopup::new();
        let ticket = popup.begin(zone("z1"), "Lot A", Point::new(37.5, 127.0));

        assert!(popup.hide());
        assert!(!popup.hide());
        assert!(!popup.resolve(ticket, Ok(None)));
        assert!(!popup.is_open());
    }
}
