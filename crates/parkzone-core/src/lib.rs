//! Parkzone Core - Domain models, configuration, and collaborator ports
//!
//! This crate contains the zone data model, the error type shared by every
//! parkzone crate, layered configuration, and the port traits implemented by
//! the map widget, position source, geocoder, and host bridge adapters.

pub mod config;
pub mod error;
pub mod models;
pub mod ports;

pub use error::{ParkzoneError, Result};
