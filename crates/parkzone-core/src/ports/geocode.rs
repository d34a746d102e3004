use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::Point;

/// Reverse-geocoded address of a point
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Address {
    /// Street-name address
    pub road: Option<String>,
    /// Lot-number (jibun) address
    pub lot: Option<String>,
}

/// Port for reverse geocoding
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn reverse(&self, point: Point) -> Result<Address>;
}
