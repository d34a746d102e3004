//! Reverse-geocoded location reports for the host shell.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use parkzone_core::error::ParkzoneError;
use parkzone_core::models::{LocationAddressData, LocationErrorData, Point};
use parkzone_core::ports::Geocoder;

use crate::tracker::POSITION_UNAVAILABLE;

/// Reported when the device position cannot be read (Seoul City Hall)
pub const FALLBACK_LOCATION: Point = Point { latitude: 37.5666805, longitude: 126.9784147 };

/// Turns points into `location_address` payloads.
///
/// Each request takes a generation token. A lookup that resolves after a
/// newer request has started is dropped, so a slow response never overwrites
/// a fresher one.
pub struct AddressReporter {
    geocoder: Arc<dyn Geocoder>,
    generation: AtomicU64,
}

impl AddressReporter {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self { geocoder, generation: AtomicU64::new(0) }
    }

    /// Geocode `point`; `None` when a newer request superseded this one.
    ///
    /// A geocoder failure still yields a payload with empty addresses and
    /// the failure in `error`.
    pub async fn report(&self, point: Point) -> Option<LocationAddressData> {
        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.geocoder.reverse(point).await;

        if self.generation.load(Ordering::SeqCst) != token {
            tracing::debug!(token, lat = point.latitude, lng = point.longitude, "Dropping stale address lookup");
            return None;
        }

        let mut data = LocationAddressData::coordinates_only(point, Utc::now());
        match result {
            Ok(address) => {
                data.road_address = address.road.unwrap_or_default();
                data.jibun_address = address.lot.unwrap_or_default();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Reverse geocoding failed");
                data.error = Some(e.to_string());
            }
        }
        Some(data)
    }
}

/// `location_error` payload for a failed position request
pub fn location_error(error: &ParkzoneError) -> LocationErrorData {
    let code = match error {
        ParkzoneError::PositionUnavailable { code, .. } => *code,
        _ => POSITION_UNAVAILABLE,
    };
    LocationErrorData {
        error: true,
        message: "Could not read the current position; showing the default location".to_string(),
        code,
        details: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parkzone_core::error::Result;
    use parkzone_core::ports::Address;
    use std::time::Duration;

    /// Answers slowly for points north of 10°
    struct SlowNorth;

    #[async_trait]
    impl Geocoder for SlowNorth {
        async fn reverse(&self, point: Point) -> Result<Address> {
            let delay = if point.latitude > 10.0 { 80 } else { 5 };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(Address {
                road: Some(format!("Road {}", point.latitude)),
                lot: Some(format!("Lot {}", point.longitude)),
            })
        }
    }

    struct Failing;

    #[async_trait]
    impl Geocoder for Failing {
        async fn reverse(&self, _point: Point) -> Result<Address> {
            Err(ParkzoneError::Geocode { reason: "service not loaded".to_string() })
        }
    }

    #[tokio::test]
    async fn test_report_fills_addresses() {
        let reporter = AddressReporter::new(Arc::new(SlowNorth));
        let data = reporter.report(Point::new(1.0, 2.0)).await.unwrap();

        assert_eq!(data.road_address, "Road 1");
        assert_eq!(data.jibun_address, "Lot 2");
        assert!(data.error.is_none());
    }

    #[tokio::test]
    async fn test_stale_lookup_is_dropped() {
        let reporter = AddressReporter::new(Arc::new(SlowNorth));

        let (slow, fast) =
            tokio::join!(reporter.report(Point::new(20.0, 0.0)), reporter.report(Point::new(1.0, 0.0)));

        assert!(slow.is_none());
        assert_eq!(fast.unwrap().latitude, 1.0);
    }

    #[tokio::test]
    async fn test_geocode_failure_still_reports_coordinates() {
        let reporter = AddressReporter::new(Arc::new(Failing));
        let data = reporter.report(FALLBACK_LOCATION).await.unwrap();

        assert_eq!(data.latitude, FALLBACK_LOCATION.latitude);
        assert!(data.road_address.is_empty());
        assert!(data.error.unwrap().contains("service not loaded"));
    }

    #[test]
    fn test_location_error_keeps_code() {
        let data = location_error(&ParkzoneError::PositionUnavailable {
            code: 1,
            reason: "permission denied".to_string(),
        });
        assert!(data.error);
        assert_eq!(data.code, 1);
        assert!(data.details.contains("permission denied"));
    }
}
