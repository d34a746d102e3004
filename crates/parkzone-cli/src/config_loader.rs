//! Configuration loading for CLI commands

use anyhow::{Context, Result};
use parkzone_core::config::{parse_validity_mode, CliConfigOverrides, LayeredConfig};
use std::path::{Path, PathBuf};

use crate::cli::Cli;

const DEFAULT_CONFIG_FILE: &str = "parkzone.toml";

/// Build the layered configuration: defaults, file, environment, then flags
pub fn load_config(cli: &Cli) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    if let Some(path) = config_file(cli.config.as_deref()) {
        config = config
            .load_from_file(&path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?;
    }

    let mut config = config.load_from_env();
    config.update_from_cli(overrides(cli)?);
    Ok(config)
}

fn config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.is_file().then_some(default)
        }
    }
}

fn overrides(cli: &Cli) -> Result<CliConfigOverrides> {
    let geometry_validity = cli
        .validity
        .as_deref()
        .map(parse_validity_mode)
        .transpose()
        .context("Invalid --validity")?;

    Ok(CliConfigOverrides {
        dataset: cli.dataset.clone(),
        geometry_validity,
        stability_updates: cli.stability,
    })
}
