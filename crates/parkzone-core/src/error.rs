//! Error types for Parkzone

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParkzoneError {
    // Zone ingestion errors
    #[error("Invalid zone {zone_id}: {reason}")]
    InvalidZone { zone_id: String, reason: String },

    #[error("Zone id already exists: {id}")]
    DuplicateId { id: String },

    #[error("Zone not found: {id}")]
    ZoneNotFound { id: String },

    // Position errors
    #[error("Invalid position ({latitude}, {longitude}): coordinates must be finite")]
    InvalidPosition { latitude: f64, longitude: f64 },

    #[error("Position unavailable (code {code}): {reason}")]
    PositionUnavailable { code: u16, reason: String },

    #[error("Reverse geocoding failed: {reason}")]
    Geocode { reason: String },

    #[error("Panorama lookup failed: {reason}")]
    Panorama { reason: String },

    // Overlay errors
    #[error("Overlay rendering failed: {reason}")]
    OverlayRender { reason: String },

    // Authoring errors
    #[error("Cannot {operation} while {state}")]
    InvalidState { operation: &'static str, state: String },

    #[error("Point index {index} out of range (collected {len})")]
    InvalidIndex { index: usize, len: usize },

    #[error("At least {required} points are required, found {found}")]
    NotEnoughPoints { required: usize, found: usize },

    #[error("Discarding {pending} collected points was not confirmed")]
    DiscardDeclined { pending: usize },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ParkzoneError {
    fn from(err: serde_json::Error) -> Self {
        ParkzoneError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ParkzoneError>;
