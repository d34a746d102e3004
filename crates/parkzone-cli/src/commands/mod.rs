//! Command implementations

mod author;
mod config;
mod export;
mod locate;
mod lots;
mod replay;
mod validate;
mod visible;

use anyhow::{Context, Result};
use parkzone_core::config::LayeredConfig;
use parkzone_store::dataset::read_dataset;
use parkzone_store::ZoneRegistry;

use crate::cli::{Cli, Commands};
use crate::config_loader::load_config;
use crate::output::OutputWriter;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Validate(args) => validate::execute(args, &config, &output),
        Commands::Locate(args) => locate::execute(args, &config, &output),
        Commands::Replay(args) => replay::execute(args, &config, &output).await,
        Commands::Visible(args) => visible::execute(args, &config, &output),
        Commands::Lots(args) => lots::execute(args, &output),
        Commands::ExportGeojson(args) => export::execute(args, &config, &output),
        Commands::Author(args) => author::execute(args, &config, &output),
        Commands::Config => config::execute(&config, &output),
    }
}

/// Load the configured dataset, warning about zones that were skipped
fn load_registry(config: &LayeredConfig, output: &OutputWriter) -> Result<ZoneRegistry> {
    let path = config.require_dataset().context("No dataset given; use --dataset or PARKZONE_DATASET")?;
    let (registry, report) = read_dataset(path, config.geometry_validity.value)
        .with_context(|| format!("Failed to load dataset {}", path.display()))?;

    if !report.is_clean() {
        output.warning(format!(
            "{} zone(s) skipped while loading {}; run `parkzone validate` for details",
            report.rejected.len(),
            path.display()
        ));
    }
    Ok(registry)
}
