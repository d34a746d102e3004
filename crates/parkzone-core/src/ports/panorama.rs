use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::Point;

/// Search radius used when a marker is clicked
pub const ROADVIEW_RADIUS_M: f64 = 100.0;

/// Identifier of a street-level panorama
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PanoramaId(pub String);

/// Port for street-level imagery lookups
#[async_trait]
pub trait PanoramaLocator: Send + Sync {
    /// Nearest panorama within `radius_m` meters of `point`; `None` when
    /// there is no imagery in range
    async fn nearest(&self, point: Point, radius_m: f64) -> Result<Option<PanoramaId>>;
}
