//! Validate command implementation

use anyhow::{Context, Result};
use parkzone_core::config::LayeredConfig;
use parkzone_store::dataset::read_dataset;

use crate::cli::ValidateArgs;
use crate::output::OutputWriter;
use crate::output_types::{RejectedRow, ValidateOutput, ZoneRow};

pub fn execute(args: ValidateArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let path = match args.path.as_deref() {
        Some(path) => path,
        None => config.require_dataset()?,
    };
    let mode = config.geometry_validity.value;

    let (registry, report) = read_dataset(path, mode)
        .with_context(|| format!("Failed to read dataset {}", path.display()))?;

    let accepted: Vec<ZoneRow> = registry.all().iter().map(ZoneRow::from).collect();
    let rejected: Vec<RejectedRow> = report.rejected.iter().map(RejectedRow::from).collect();

    if output.is_json() {
        return output.result(ValidateOutput {
            dataset: path.display().to_string(),
            accepted,
            rejected,
        });
    }

    output.section(format!("Accepted zones ({:?} mode)", mode));
    let rejected_count = rejected.len();
    output.table(accepted);

    if rejected_count > 0 {
        output.section("Rejected zones");
        output.table(rejected);
        output.warning(format!("{} zone(s) rejected", rejected_count));
    } else {
        output.success(format!("{} zone(s) valid", report.accepted));
    }
    Ok(())
}
