use serde::{Deserialize, Serialize};

use crate::error::{ParkzoneError, Result};

/// A WGS84 position in degrees.
///
/// In memory the order is always (latitude, longitude). The persisted zone
/// format stores `[longitude, latitude]` pairs; use [`Point::from_lng_lat`]
/// and [`Point::to_lng_lat`] at that boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Build from a persisted `[lng, lat]` pair
    pub fn from_lng_lat(pair: [f64; 2]) -> Self {
        Self::new(pair[1], pair[0])
    }

    /// Convert to a persisted `[lng, lat]` pair
    pub fn to_lng_lat(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// Reject non-finite coordinates coming from a position source
    pub fn validated(self) -> Result<Self> {
        if self.is_finite() {
            Ok(self)
        } else {
            Err(ParkzoneError::InvalidPosition {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }
}
