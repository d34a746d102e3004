use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::Result;
use crate::models::Fix;

/// Identifier of an active position watch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(pub u64);

/// An active watch: its id plus the stream of fixes (or acquisition errors)
pub struct PositionWatch {
    pub id: WatchId,
    pub fixes: BoxStream<'static, Result<Fix>>,
}

/// Port for the device geolocation service
#[async_trait]
pub trait PositionSource: Send + Sync {
    /// One-shot position request
    async fn current_position(&self) -> Result<Fix>;

    /// Start a continuous watch
    fn watch(&self) -> Result<PositionWatch>;

    /// Stop a watch; must be safe to call for an already cleared id
    fn clear_watch(&self, id: WatchId);
}
