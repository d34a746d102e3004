//! Zone dataset ingestion and persistence.
//!
//! Ingestion is per record: a malformed zone is reported in the
//! [`IngestReport`] and skipped, the rest of the dataset still loads.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use parkzone_core::error::{ParkzoneError, Result};
use parkzone_core::models::{RawZoneRecord, ValidityMode, ZoneDataset};
use parkzone_geo::validation::zone_from_record;

use crate::registry::ZoneRegistry;

/// Outcome of loading a dataset
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestReport {
    pub accepted: usize,
    pub rejected: Vec<RejectedZone>,
}

/// A record that did not make it into the registry
#[derive(Debug, Clone, Serialize)]
pub struct RejectedZone {
    pub index: usize,
    pub zone_id: Option<String>,
    pub reason: String,
}

impl IngestReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Parse a dataset document into a registry
pub fn parse_dataset(json: &str, mode: ValidityMode) -> Result<(ZoneRegistry, IngestReport)> {
    let value: Value = serde_json::from_str(json)?;
    ingest_value(&value, mode)
}

/// Build a registry from an already parsed dataset document
pub fn ingest_value(value: &Value, mode: ValidityMode) -> Result<(ZoneRegistry, IngestReport)> {
    let records = value
        .get("zones")
        .and_then(Value::as_array)
        .ok_or_else(|| ParkzoneError::Serialization("dataset has no \"zones\" array".to_string()))?;

    let mut registry = ZoneRegistry::new();
    let mut report = IngestReport::default();

    for (index, raw) in records.iter().enumerate() {
        let record: RawZoneRecord = match serde_json::from_value(raw.clone()) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping unreadable zone record");
                report.rejected.push(RejectedZone { index, zone_id: None, reason: e.to_string() });
                continue;
            }
        };

        let outcome = zone_from_record(&record, index, mode).and_then(|zone| registry.add(zone));
        match outcome {
            Ok(()) => report.accepted += 1,
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping zone");
                report.rejected.push(RejectedZone {
                    index,
                    zone_id: record.id_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        accepted = report.accepted,
        rejected = report.rejected.len(),
        ?mode,
        "Zone dataset ingested"
    );
    Ok((registry, report))
}

/// Read and ingest a dataset file
pub fn read_dataset(path: &Path, mode: ValidityMode) -> Result<(ZoneRegistry, IngestReport)> {
    let json = fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), bytes = json.len(), "Read zone dataset");
    parse_dataset(&json, mode)
}

/// Persisted form of a registry, in registry order
pub fn export_registry(registry: &ZoneRegistry) -> ZoneDataset {
    ZoneDataset::from_zones(registry.all())
}

/// Write a dataset as pretty-printed JSON, creating parent directories
pub fn write_dataset(path: &Path, dataset: &ZoneDataset) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(dataset)?;
    fs::write(path, json)?;
    tracing::info!(path = %path.display(), zones = dataset.zones.len(), "Wrote zone dataset");
    Ok(())
}
