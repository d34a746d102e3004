//! Host-shell bridge envelopes.
//!
//! Outbound messages serialize as `{ "type": ..., "data": { ... } }`; inbound
//! messages carry only a `type`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MembershipState, Point, ZoneId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum OutboundMessage {
    LocationAddress(LocationAddressData),
    LocationError(LocationErrorData),
    ReturnRequest(ReturnRequestData),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    RequestReturn,
    GetCurrentLocation,
}

/// Coordinates with their reverse-geocoded addresses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationAddressData {
    pub latitude: f64,
    pub longitude: f64,
    pub road_address: String,
    pub jibun_address: String,
    /// Set when geocoding failed; coordinates are still reported
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub zone_id: Option<ZoneId>,
}

impl LocationAddressData {
    /// Coordinates only, with empty addresses
    pub fn coordinates_only(point: Point, timestamp: DateTime<Utc>) -> Self {
        Self {
            latitude: point.latitude,
            longitude: point.longitude,
            road_address: String::new(),
            jibun_address: String::new(),
            error: None,
            timestamp,
            zone_id: None,
        }
    }
}

/// Position acquisition failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationErrorData {
    pub error: bool,
    pub message: String,
    pub code: u16,
    pub details: String,
}

/// Reply to a host `request_return`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRequestData {
    pub membership: MembershipState,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_outbound_envelope_shape() {
        let at = DateTime::parse_from_rfc3339("2025-06-14T09:00:00Z").unwrap().with_timezone(&Utc);
        let mut data = LocationAddressData::coordinates_only(Point::new(37.5, 127.0), at);
        data.road_address = "Teheran-ro 1".to_string();

        let value = serde_json::to_value(OutboundMessage::LocationAddress(data)).unwrap();

        assert_eq!(value["type"], "location_address");
        assert_eq!(value["data"]["latitude"], 37.5);
        assert_eq!(value["data"]["roadAddress"], "Teheran-ro 1");
        assert_eq!(value["data"]["jibunAddress"], "");
        assert!(value["data"].get("error").is_none());
        assert!(value["data"].get("zoneId").is_none());
    }

    #[test]
    fn test_inbound_parsing() {
        let request: InboundMessage =
            serde_json::from_value(json!({ "type": "request_return" })).unwrap();
        assert_eq!(request, InboundMessage::RequestReturn);

        let locate: InboundMessage =
            serde_json::from_str(r#"{"type":"get_current_location"}"#).unwrap();
        assert_eq!(locate, InboundMessage::GetCurrentLocation);

        assert!(serde_json::from_str::<InboundMessage>(r#"{"type":"unknown"}"#).is_err());
    }
}
