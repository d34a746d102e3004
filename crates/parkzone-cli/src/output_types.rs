use chrono::{DateTime, Utc};
use parkzone_core::models::{MembershipState, MunicipalLot, Zone};
use parkzone_store::{RejectedZone, SkippedLot};
use serde::Serialize;
use tabled::Tabled;

/// One zone in command output
#[derive(Debug, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub struct ZoneRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Vertices")]
    pub vertices: usize,
    #[tabled(rename = "Anchor (lat, lng)")]
    pub anchor: String,
}

impl From<&Zone> for ZoneRow {
    fn from(zone: &Zone) -> Self {
        Self {
            id: zone.id.to_string(),
            name: zone.name.clone(),
            vertices: zone.polygon.vertex_count(),
            anchor: format!("{:.6}, {:.6}", zone.anchor.latitude, zone.anchor.longitude),
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
pub struct RejectedRow {
    #[tabled(rename = "#")]
    pub index: usize,
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Reason")]
    pub reason: String,
}

impl From<&RejectedZone> for RejectedRow {
    fn from(rejected: &RejectedZone) -> Self {
        Self {
            index: rejected.index,
            id: rejected.zone_id.clone().unwrap_or_else(|| "-".to_string()),
            reason: rejected.reason.clone(),
        }
    }
}

/// One municipal parking stand
#[derive(Debug, Serialize, Tabled)]
pub struct LotRow {
    #[tabled(rename = "#")]
    pub index: usize,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Position (lat, lng)")]
    pub position: String,
}

impl From<&MunicipalLot> for LotRow {
    fn from(lot: &MunicipalLot) -> Self {
        Self {
            index: lot.index,
            name: lot.name.clone(),
            position: format!("{:.6}, {:.6}", lot.position.latitude, lot.position.longitude),
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
pub struct SkippedLotRow {
    #[tabled(rename = "#")]
    pub index: usize,
    #[tabled(rename = "Reason")]
    pub reason: String,
}

impl From<&SkippedLot> for SkippedLotRow {
    fn from(skipped: &SkippedLot) -> Self {
        Self { index: skipped.index, reason: skipped.reason.clone() }
    }
}

/// Output for lots command
#[derive(Debug, Serialize)]
pub struct LotsOutput {
    pub feed: String,
    pub loaded: usize,
    pub failed: usize,
    pub markers: usize,
    pub lots: Vec<LotRow>,
    pub skipped: Vec<SkippedLotRow>,
}

/// Output for validate command
#[derive(Debug, Serialize)]
pub struct ValidateOutput {
    pub dataset: String,
    pub accepted: Vec<ZoneRow>,
    pub rejected: Vec<RejectedRow>,
}

/// Output for locate command
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocateOutput {
    pub latitude: f64,
    pub longitude: f64,
    pub membership: MembershipState,
    pub zone_name: Option<String>,
    /// Zones containing the point, including ones shadowed by an earlier zone
    pub containing_zones: usize,
}

#[derive(Debug, Serialize, Tabled)]
pub struct TransitionRow {
    #[tabled(rename = "Time")]
    pub at: DateTime<Utc>,
    #[tabled(rename = "From")]
    pub from: String,
    #[tabled(rename = "To")]
    pub to: String,
    #[tabled(rename = "Lat")]
    pub latitude: f64,
    #[tabled(rename = "Lng")]
    pub longitude: f64,
}

/// Output for replay command
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayOutput {
    pub fixes: usize,
    pub rejected: usize,
    pub final_state: MembershipState,
    pub transitions: Vec<TransitionRow>,
}

/// Output for visible command
#[derive(Debug, Serialize)]
pub struct VisibleOutput {
    pub bounds: [f64; 4],
    pub cutouts: Vec<ZoneRow>,
}

/// Output for export-geojson and author commands
#[derive(Debug, Serialize)]
pub struct WriteOutput {
    pub path: String,
    pub zones: usize,
}

#[derive(Debug, Serialize, Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}
