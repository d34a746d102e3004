use crate::error::Result;
use crate::models::OutboundMessage;

/// Port for posting messages to the host mobile shell
pub trait HostBridge {
    fn post(&self, message: &OutboundMessage) -> Result<()>;
}
