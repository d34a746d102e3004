//! Parkzone Store - Zone registry and dataset persistence
//!
//! This crate holds the in-memory zone registry, the shared handle through
//! which the registry is swapped as a whole, JSON dataset I/O and the
//! municipal parking-lot feed.

pub mod dataset;
pub mod lots;
pub mod registry;
pub mod shared;

pub use dataset::{IngestReport, RejectedZone};
pub use lots::{LotLoadReport, SkippedLot};
pub use registry::ZoneRegistry;
pub use shared::SharedRegistry;
