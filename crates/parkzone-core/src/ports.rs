//! Port trait definitions
//!
//! These traits define the interfaces that external collaborators (map
//! widget, position source, geocoder, panorama lookup, host bridge) must
//! implement.

pub mod bridge;
pub mod geocode;
pub mod map;
pub mod panorama;
pub mod position;

pub use bridge::HostBridge;
pub use geocode::{Address, Geocoder};
pub use map::{MapSurface, ShapeHandle, ShapeStyle};
pub use panorama::{PanoramaId, PanoramaLocator, ROADVIEW_RADIUS_M};
pub use position::{PositionSource, PositionWatch, WatchId};
