//! Engine facade.
//!
//! `ZoneEngine` owns one instance of every component and the map surface
//! they draw on. Registry mutations made through the engine are followed by a
//! view sync, so the zone layer and overlay cutouts never lag behind the
//! registry. The device position, municipal parking lots and the roadview
//! popup are drawn on the same surface.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;

use parkzone_core::config::LayeredConfig;
use parkzone_core::error::{ParkzoneError, Result};
use parkzone_core::models::{
    Bounds, Fix, InboundMessage, MembershipSnapshot, MunicipalLot, OutboundMessage, Point,
    ReturnRequestData, TransitionEvent, ValidityMode, Zone, ZoneDataset, ZoneId,
};
use parkzone_core::ports::{Geocoder, HostBridge, MapSurface, PanoramaLocator, PositionSource};
use parkzone_store::dataset::read_dataset;
use parkzone_store::lots::read_municipal_lots;
use parkzone_store::{IngestReport, LotLoadReport, SharedRegistry};

use crate::address::{location_error, AddressReporter, FALLBACK_LOCATION};
use crate::authoring::AuthoringTool;
use crate::color::{ColorPicker, DEFAULT_ATTEMPTS, DEFAULT_HUE_SEPARATION};
use crate::indicator::LocationIndicator;
use crate::layer::ZoneLayer;
use crate::lots::{LotDrawReport, LotLayer};
use crate::overlay::{OverlayController, ViewportEvent};
use crate::roadview::{ActiveRoadview, RoadviewPopup, RoadviewTarget};
use crate::session::{SessionEvent, SessionSummary, TrackingSession};
use crate::tracker::MembershipTracker;

/// Tunables taken from the layered configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    pub geometry_validity: ValidityMode,
    pub stability_updates: u32,
    pub color_attempts: u32,
    pub hue_separation: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            geometry_validity: ValidityMode::Lenient,
            stability_updates: 1,
            color_attempts: DEFAULT_ATTEMPTS,
            hue_separation: DEFAULT_HUE_SEPARATION,
        }
    }
}

impl From<&LayeredConfig> for EngineSettings {
    fn from(config: &LayeredConfig) -> Self {
        Self {
            geometry_validity: config.geometry_validity.value,
            stability_updates: config.stability_updates.value,
            color_attempts: config.color_attempts.value,
            hue_separation: config.hue_separation.value,
        }
    }
}

/// External collaborators the engine talks to
pub struct EnginePorts<S> {
    pub surface: S,
    pub positions: Arc<dyn PositionSource>,
    pub geocoder: Arc<dyn Geocoder>,
    pub panoramas: Arc<dyn PanoramaLocator>,
    pub bridge: Box<dyn HostBridge>,
}

pub struct ZoneEngine<S: MapSurface> {
    settings: EngineSettings,
    registry: SharedRegistry,
    surface: S,
    tracker: MembershipTracker,
    overlay: OverlayController,
    layer: ZoneLayer,
    indicator: LocationIndicator,
    lots: LotLayer,
    roadview: RoadviewPopup,
    authoring: AuthoringTool,
    addresses: AddressReporter,
    positions: Arc<dyn PositionSource>,
    panoramas: Arc<dyn PanoramaLocator>,
    bridge: Box<dyn HostBridge>,
}

impl<S: MapSurface> ZoneEngine<S> {
    pub fn new(registry: SharedRegistry, ports: EnginePorts<S>, settings: EngineSettings) -> Self {
        let picker = ColorPicker::new(settings.color_attempts, settings.hue_separation);
        Self {
            settings,
            tracker: MembershipTracker::new(registry.clone()).with_stability(settings.stability_updates),
            overlay: OverlayController::new(registry.clone()),
            layer: ZoneLayer::new(registry.clone()),
            indicator: LocationIndicator::new(),
            lots: LotLayer::new(),
            roadview: RoadviewPopup::new(),
            authoring: AuthoringTool::with_picker(registry.clone(), picker),
            addresses: AddressReporter::new(ports.geocoder),
            registry,
            surface: ports.surface,
            positions: ports.positions,
            panoramas: ports.panoramas,
            bridge: ports.bridge,
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn tracker(&self) -> &MembershipTracker {
        &self.tracker
    }

    pub fn overlay(&self) -> &OverlayController {
        &self.overlay
    }

    pub fn layer(&self) -> &ZoneLayer {
        &self.layer
    }

    pub fn authoring(&self) -> &AuthoringTool {
        &self.authoring
    }

    pub fn indicator(&self) -> &LocationIndicator {
        &self.indicator
    }

    pub fn lots(&self) -> &LotLayer {
        &self.lots
    }

    pub fn roadview(&self) -> Option<&ActiveRoadview> {
        self.roadview.active()
    }

    /// Replace the registry with the zones in a dataset file
    pub fn load_dataset(&mut self, path: &Path) -> Result<IngestReport> {
        let (registry, report) = read_dataset(path, self.settings.geometry_validity)?;
        self.registry.replace(registry);
        self.sync_views()?;
        Ok(report)
    }

    /// Redraw the zone layer and overlay cutouts if the registry moved on.
    ///
    /// Mutating calls run this themselves and only log a failure; a later
    /// call or viewport event retries.
    pub fn sync_views(&mut self) -> Result<()> {
        self.layer.sync(&mut self.surface)?;
        self.overlay.sync(&mut self.surface)?;
        Ok(())
    }

    fn after_registry_change(&mut self) {
        if let Err(e) = self.sync_views() {
            tracing::warn!(error = %e, "View sync after registry change failed");
        }
    }

    pub fn position_update(&mut self, fix: Fix) -> Result<Vec<TransitionEvent>> {
        self.tracker.position_update(fix)?;
        self.show_fix(&fix);
        Ok(self.tracker.drain_events().collect())
    }

    fn show_fix(&mut self, fix: &Fix) {
        if let Err(e) = self.indicator.update(&mut self.surface, fix) {
            tracing::warn!(error = %e, "Location indicator not updated");
        }
    }

    pub fn membership(&self) -> MembershipSnapshot {
        self.tracker.snapshot()
    }

    /// Center the map on the last accepted fix
    pub fn recenter(&mut self) -> Result<Point> {
        let point = self.tracker.last_fix()?.point;
        self.surface.set_center(point)?;
        Ok(point)
    }

    pub fn start_tracking(&self) -> Result<TrackingSession> {
        TrackingSession::start(Arc::clone(&self.positions))
    }

    /// Run a session to completion against the engine's tracker.
    ///
    /// Accepted fixes move the location indicator. When the session ends the
    /// tracker is back to `Unlocated` and the indicator is removed.
    pub async fn track<F>(&mut self, session: TrackingSession, mut on_event: F) -> SessionSummary
    where
        F: FnMut(SessionEvent),
    {
        // left behind by a session whose future was dropped
        self.indicator.clear(&mut self.surface);

        let Self { tracker, indicator, surface, .. } = self;
        let summary = session
            .run(tracker, |event| {
                if let SessionEvent::Position(fix) = &event {
                    if let Err(e) = indicator.update(surface, fix) {
                        tracing::warn!(error = %e, "Location indicator not updated");
                    }
                }
                on_event(event);
            })
            .await;

        self.indicator.clear(&mut self.surface);
        summary
    }

    pub fn activate_overlay(&mut self, bounds: Bounds) -> Result<()> {
        self.overlay.activate(&mut self.surface, bounds)
    }

    pub fn refresh_overlay(&mut self, bounds: Bounds) -> Result<()> {
        self.overlay.refresh(&mut self.surface, bounds)
    }

    pub fn deactivate_overlay(&mut self) {
        self.overlay.deactivate(&mut self.surface);
    }

    pub fn on_viewport(&mut self, event: ViewportEvent) -> Result<bool> {
        self.overlay.on_viewport(&mut self.surface, event)
    }

    pub fn start_collecting<F: FnOnce(usize) -> bool>(&mut self, confirm: F) -> Result<()> {
        self.authoring.start_collecting(confirm)
    }

    pub fn stop_collecting<F: FnOnce(usize) -> bool>(&mut self, confirm: F) -> Result<()> {
        self.authoring.stop_collecting(confirm)
    }

    pub fn add_point(&mut self, point: Point) -> Result<usize> {
        self.authoring.add_point(point)
    }

    pub fn remove_point(&mut self, index: usize) -> Result<Point> {
        self.authoring.remove_point(index)
    }

    pub fn finish_zone(&mut self, name: Option<&str>) -> Result<Zone> {
        let zone = self.authoring.finish_zone(name)?;
        self.after_registry_change();
        Ok(zone)
    }

    pub fn delete_zone(&mut self, id: &ZoneId) -> Result<Zone> {
        let zone = self.authoring.delete_zone(id)?;
        self.layer.remove_zone(&mut self.surface, id);
        if self.roadview.active().is_some_and(|a| a.target == RoadviewTarget::Zone(id.clone())) {
            self.roadview.hide();
        }
        self.after_registry_change();
        Ok(zone)
    }

    pub fn export_registry(&self) -> ZoneDataset {
        self.authoring.export_registry()
    }

    /// Load a municipal parking-lot feed and draw its markers
    pub fn load_lots(&mut self, path: &Path) -> Result<(LotLoadReport, LotDrawReport)> {
        let (lots, loaded) = read_municipal_lots(path)?;
        Ok((loaded, self.show_lots(lots)))
    }

    pub fn show_lots(&mut self, lots: Vec<MunicipalLot>) -> LotDrawReport {
        if self.roadview.active().is_some_and(|a| matches!(a.target, RoadviewTarget::Lot(_))) {
            self.roadview.hide();
        }
        self.lots.show(&mut self.surface, lots)
    }

    /// Open the roadview popup for a zone's marker
    pub async fn open_zone_roadview(&mut self, id: &ZoneId) -> Result<ActiveRoadview> {
        let snapshot = self.registry.snapshot();
        let zone = snapshot.get(id).ok_or_else(|| ParkzoneError::ZoneNotFound { id: id.to_string() })?;
        let target = RoadviewTarget::Zone(zone.id.clone());
        self.open_roadview(target, zone.name.clone(), zone.anchor).await
    }

    /// Open the roadview popup for a municipal lot, by feed index
    pub async fn open_lot_roadview(&mut self, index: usize) -> Result<ActiveRoadview> {
        let lot = self
            .lots
            .get(index)
            .ok_or(ParkzoneError::InvalidIndex { index, len: self.lots.lots().len() })?;
        let (title, position) = (lot.name.clone(), lot.position);
        self.open_roadview(RoadviewTarget::Lot(index), title, position).await
    }

    async fn open_roadview(&mut self, target: RoadviewTarget, title: String, position: Point) -> Result<ActiveRoadview> {
        self.roadview
            .open(self.panoramas.as_ref(), target, title, position)
            .await
            .cloned()
            .ok_or(ParkzoneError::InvalidState { operation: "open roadview", state: "closed".to_string() })
    }

    /// A click on the map background; hides the roadview popup.
    /// Returns `true` when a popup was open.
    pub fn on_map_click(&mut self) -> bool {
        self.roadview.hide()
    }

    /// Answer a message from the host shell
    pub async fn handle_inbound(&mut self, message: InboundMessage) -> Result<()> {
        tracing::debug!(?message, "Inbound host message");
        match message {
            InboundMessage::RequestReturn => {
                let snapshot = self.tracker.snapshot();
                let reply = ReturnRequestData {
                    membership: snapshot.state,
                    latitude: snapshot.last_fix.map(|f| f.point.latitude),
                    longitude: snapshot.last_fix.map(|f| f.point.longitude),
                    timestamp: Utc::now(),
                };
                self.bridge.post(&OutboundMessage::ReturnRequest(reply))
            }
            InboundMessage::GetCurrentLocation => self.report_current_location().await,
        }
    }

    async fn report_current_location(&mut self) -> Result<()> {
        let located = match self.positions.current_position().await {
            Ok(fix) => match self.tracker.position_update(fix) {
                Ok(_) => {
                    self.show_fix(&fix);
                    Some(fix.point)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring invalid current position");
                    self.bridge.post(&OutboundMessage::LocationError(location_error(&e)))?;
                    None
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Current position unavailable");
                self.bridge.post(&OutboundMessage::LocationError(location_error(&e)))?;
                None
            }
        };

        let point = located.unwrap_or(FALLBACK_LOCATION);
        let Some(mut data) = self.addresses.report(point).await else {
            return Ok(());
        };
        // membership may have moved on while the lookup was in flight
        if located.is_some() {
            data.zone_id = self.tracker.current_state().zone_id().cloned();
        }
        self.bridge.post(&OutboundMessage::LocationAddress(data))
    }
}
