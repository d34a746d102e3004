//! Host bridge adapters.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use parkzone_core::error::{ParkzoneError, Result};
use parkzone_core::models::OutboundMessage;
use parkzone_core::ports::HostBridge;

/// Writes one JSON message per line
#[derive(Debug)]
pub struct JsonLinesBridge<W: Write> {
    writer: Mutex<W>,
}

impl<W: Write> JsonLinesBridge<W> {
    pub fn new(writer: W) -> Self {
        Self { writer: Mutex::new(writer) }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

impl JsonLinesBridge<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> HostBridge for JsonLinesBridge<W> {
    fn post(&self, message: &OutboundMessage) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| ParkzoneError::Io(io::Error::new(io::ErrorKind::Other, "bridge writer poisoned")))?;
        serde_json::to_writer(&mut *writer, message)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// Logs messages when no host shell is attached
#[derive(Debug, Clone, Copy, Default)]
pub struct LogBridge;

impl HostBridge for LogBridge {
    fn post(&self, message: &OutboundMessage) -> Result<()> {
        let json = serde_json::to_string(message)?;
        tracing::info!(message = %json, "Host bridge message (no host attached)");
        Ok(())
    }
}

/// Keeps posted messages in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryBridge {
    messages: Arc<Mutex<Vec<OutboundMessage>>>,
}

impl MemoryBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<OutboundMessage> {
        self.messages.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn take(&self) -> Vec<OutboundMessage> {
        std::mem::take(&mut *self.messages.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

impl HostBridge for MemoryBridge {
    fn post(&self, message: &OutboundMessage) -> Result<()> {
        self.messages.lock().unwrap_or_else(|e| e.into_inner()).push(message.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use parkzone_core::models::{LocationErrorData, MembershipState, ReturnRequestData};

    #[test]
    fn test_json_lines_one_message_per_line() {
        let bridge = JsonLinesBridge::new(Vec::new());
        bridge
            .post(&OutboundMessage::LocationError(LocationErrorData {
                error: true,
                message: "no fix".to_string(),
                code: 2,
                details: "timeout".to_string(),
            }))
            .unwrap();
        bridge
            .post(&OutboundMessage::ReturnRequest(ReturnRequestData {
                membership: MembershipState::Outside,
                latitude: None,
                longitude: None,
                timestamp: Utc::now(),
            }))
            .unwrap();

        let output = String::from_utf8(bridge.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["type"], "location_error");
        assert_eq!(first["data"]["code"], 2);
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["type"], "return_request");
    }

    #[test]
    fn test_memory_bridge_shares_messages_between_clones() {
        let bridge = MemoryBridge::new();
        let handle = bridge.clone();
        LogBridge
            .post(&OutboundMessage::LocationError(LocationErrorData {
                error: true,
                message: String::new(),
                code: 1,
                details: String::new(),
            }))
            .unwrap();
        bridge
            .post(&OutboundMessage::LocationError(LocationErrorData {
                error: true,
                message: String::new(),
                code: 1,
                details: String::new(),
            }))
            .unwrap();

        assert_eq!(handle.take().len(), 1);
        assert!(bridge.messages().is_empty());
    }
}
