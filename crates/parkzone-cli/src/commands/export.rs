//! GeoJSON export command implementation

use anyhow::{Context, Result};
use parkzone_core::config::LayeredConfig;
use parkzone_geo::export::to_feature_collection;
use std::fs;

use crate::cli::ExportArgs;
use crate::output::OutputWriter;
use crate::output_types::WriteOutput;

pub fn execute(args: ExportArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let registry = super::load_registry(config, output)?;
    let collection = to_feature_collection(registry.all());

    let json = serde_json::to_string_pretty(&collection)?;
    fs::write(&args.out, json).with_context(|| format!("Failed to write {}", args.out.display()))?;

    if output.is_json() {
        return output.result(WriteOutput { path: args.out.display().to_string(), zones: registry.len() });
    }
    output.success(format!("Exported {} zone(s) to {}", registry.len(), args.out.display()));
    Ok(())
}
