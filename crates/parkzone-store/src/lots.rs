//! Municipal parking-lot feed loading.
//!
//! Entries whose coordinates do not parse are counted and skipped. Only a
//! document that is not a JSON array fails as a whole.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use parkzone_core::error::{ParkzoneError, Result};
use parkzone_core::models::{MunicipalLot, RawLotRecord};

#[derive(Debug, Clone, Default, Serialize)]
pub struct LotLoadReport {
    pub loaded: usize,
    pub skipped: Vec<SkippedLot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedLot {
    pub index: usize,
    pub reason: String,
}

impl LotLoadReport {
    pub fn failed(&self) -> usize {
        self.skipped.len()
    }
}

/// Parse a feed document
pub fn parse_municipal_lots(json: &str) -> Result<(Vec<MunicipalLot>, LotLoadReport)> {
    let value: Value = serde_json::from_str(json)?;
    lots_from_value(&value)
}

pub fn lots_from_value(value: &Value) -> Result<(Vec<MunicipalLot>, LotLoadReport)> {
    let items = value
        .as_array()
        .ok_or_else(|| ParkzoneError::Serialization("parking-lot feed is not a JSON array".to_string()))?;

    let mut lots = Vec::with_capacity(items.len());
    let mut report = LotLoadReport::default();

    for (index, item) in items.iter().enumerate() {
        let outcome = serde_json::from_value::<RawLotRecord>(item.clone())
            .map_err(|e| e.to_string())
            .and_then(|raw| raw.into_lot(index).ok_or_else(|| "coordinates are not numbers".to_string()));

        match outcome {
            Ok(lot) => {
                lots.push(lot);
                report.loaded += 1;
            }
            Err(reason) => {
                tracing::warn!(index, %reason, "Skipping parking-lot entry");
                report.skipped.push(SkippedLot { index, reason });
            }
        }
    }

    tracing::info!(loaded = report.loaded, failed = report.failed(), "Municipal parking lots loaded");
    Ok((lots, report))
}

/// Read and parse a feed file
pub fn read_municipal_lots(path: &Path) -> Result<(Vec<MunicipalLot>, LotLoadReport)> {
    let json = fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), bytes = json.len(), "Read parking-lot feed");
    parse_municipal_lots(&json)
}
