use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parkzone - parking zone geofencing tools
#[derive(Parser, Debug)]
#[command(name = "parkzone")]
#[command(about = "Parking zone membership, overlay and authoring tools", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ./parkzone.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Zone dataset to load
    #[arg(long, global = true, value_name = "FILE")]
    pub dataset: Option<PathBuf>,

    /// Geometry validity mode (strict or lenient)
    #[arg(long, global = true, value_name = "MODE")]
    pub validity: Option<String>,

    /// Consecutive fixes required before a membership change is reported
    #[arg(long, global = true, value_name = "N")]
    pub stability: Option<u32>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a zone dataset and list accepted and rejected zones
    Validate(ValidateArgs),

    /// Show which zone contains a point
    Locate(LocateArgs),

    /// Replay a recorded track and print membership transitions
    Replay(ReplayArgs),

    /// List the zones the prohibition overlay would cut out for a viewport
    Visible(VisibleArgs),

    /// Load a municipal parking-lot feed and list the stands it places
    Lots(LotsArgs),

    /// Export the dataset as a GeoJSON FeatureCollection
    ExportGeojson(ExportArgs),

    /// Capture zones interactively and save them as a dataset
    Author(AuthorArgs),

    /// Show configuration values and where they came from
    Config,
}

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Dataset file to check (defaults to the configured dataset)
    pub path: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct LocateArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,
}

#[derive(Parser, Debug)]
pub struct ReplayArgs {
    /// JSON array of {latitude, longitude, accuracy?, timestamp?}
    pub track: PathBuf,

    /// Timestamp of the first point when the track has none (RFC 3339)
    #[arg(long)]
    pub start: Option<String>,
}

#[derive(Parser, Debug)]
pub struct VisibleArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub south: f64,

    #[arg(long, allow_hyphen_values = true)]
    pub west: f64,

    #[arg(long, allow_hyphen_values = true)]
    pub north: f64,

    #[arg(long, allow_hyphen_values = true)]
    pub east: f64,
}

#[derive(Parser, Debug)]
pub struct LotsArgs {
    /// JSON array of {INST_NM, REFINE_WGS84_LAT, REFINE_WGS84_LOGT}
    pub feed: PathBuf,
}

#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Output GeoJSON file
    pub out: PathBuf,
}

#[derive(Parser, Debug)]
pub struct AuthorArgs {
    /// Dataset file to write
    pub out: PathBuf,

    /// Start from an empty registry instead of the configured dataset
    #[arg(long)]
    pub fresh: bool,
}
