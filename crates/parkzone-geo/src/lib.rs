//! Parkzone Geo - Polygon primitives, zone validation, and geometry interop
//!
//! This crate holds the point-in-polygon test, bounding boxes, vertex-average
//! centroids, zone ingestion checks, and conversions to the `geo` and
//! `geojson` crates.

pub mod export;
pub mod models;
pub mod primitives;
pub mod spatial;
pub mod validation;

pub use primitives::{bounding_box, centroid, contains_point, ring_contains};
