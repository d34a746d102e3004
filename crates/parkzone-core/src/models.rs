pub mod bounds;
pub mod bridge;
pub mod color;
pub mod dataset;
pub mod lot;
pub mod membership;
pub mod point;
pub mod polygon;
pub mod zone;

pub use bounds::Bounds;
pub use bridge::{
    InboundMessage, LocationAddressData, LocationErrorData, OutboundMessage, ReturnRequestData,
};
pub use color::ZoneColor;
pub use dataset::{RawZoneRecord, ZoneDataset, ZoneRecord};
pub use lot::{MunicipalLot, RawLotRecord, DEFAULT_LOT_NAME};
pub use membership::{Fix, MembershipSnapshot, MembershipState, TransitionEvent};
pub use point::Point;
pub use polygon::{close_ring, Polygon, PolygonError, ValidityMode};
pub use zone::{Zone, ZoneId};
