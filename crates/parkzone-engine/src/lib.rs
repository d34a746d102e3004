//! Parkzone Engine - Membership tracking, prohibition overlay and zone authoring
//!
//! Components share one [`SharedRegistry`](parkzone_store::SharedRegistry)
//! and draw through the [`MapSurface`](parkzone_core::ports::MapSurface) port.
//! [`ZoneEngine`] wires them together for a single map view, along with the
//! device position indicator, municipal parking-lot markers and the roadview
//! popup.

pub mod address;
pub mod authoring;
pub mod bridge;
pub mod color;
pub mod engine;
pub mod indicator;
pub mod layer;
pub mod lots;
pub mod overlay;
pub mod roadview;
pub mod session;
pub mod surface;
pub mod tracker;

pub use address::{AddressReporter, FALLBACK_LOCATION};
pub use authoring::{AuthoringState, AuthoringTool, LabeledPoint};
pub use bridge::{JsonLinesBridge, LogBridge, MemoryBridge};
pub use color::ColorPicker;
pub use engine::{EnginePorts, EngineSettings, ZoneEngine};
pub use indicator::{LocationIndicator, MY_LOCATION_LABEL};
pub use layer::ZoneLayer;
pub use lots::{LotDrawReport, LotLayer};
pub use overlay::{OverlayController, OverlayState, ViewportEvent, ViewportEventKind};
pub use roadview::{
    ActiveRoadview, CatalogEntry, PanoramaCatalog, PanoramaState, RoadviewPopup, RoadviewTarget,
    RoadviewTicket,
};
pub use session::{
    ChannelPositionSource, PositionSender, ReplayPositionSource, SessionEvent, SessionSummary,
    TrackingSession, WatchGuard,
};
pub use surface::{DrawnShape, MemorySurface};
pub use tracker::MembershipTracker;
