//! Interactive zone authoring

use anyhow::{bail, Context, Result};
use dialoguer::{Confirm, Input, Select};
use std::path::Path;

use parkzone_core::config::LayeredConfig;
use parkzone_core::models::{Point, ZoneId};
use parkzone_engine::{AuthoringTool, ColorPicker};
use parkzone_store::dataset::write_dataset;
use parkzone_store::{SharedRegistry, ZoneRegistry};

use crate::cli::AuthorArgs;
use crate::output::OutputWriter;
use crate::output_types::ZoneRow;

const ACTIONS: [&str; 7] = [
    "Start a new zone",
    "Add point",
    "Remove point",
    "Finish zone",
    "Delete zone",
    "Save and quit",
    "Quit without saving",
];

pub fn execute(args: AuthorArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    if output.is_json() {
        bail!("The author command is interactive and does not support --json");
    }

    let registry = if args.fresh || config.dataset.value.is_none() {
        ZoneRegistry::new()
    } else {
        super::load_registry(config, output)?
    };
    let registry = SharedRegistry::new(registry);
    let picker = ColorPicker::new(config.color_attempts.value, config.hue_separation.value);
    let mut tool = AuthoringTool::with_picker(registry.clone(), picker);

    output.info(format!("{} existing zone(s) loaded", registry.snapshot().len()));

    loop {
        let choice = Select::new()
            .with_prompt(prompt(&tool))
            .items(&ACTIONS)
            .default(if tool.is_collecting() { 1 } else { 0 })
            .interact()?;

        let outcome: Result<()> = match choice {
            0 => tool.start_collecting(confirm_discard).map_err(Into::into),
            1 => read_point().and_then(|point| {
                let ordinal = tool.add_point(point)?;
                output.info(format!("Point {} at {:.6}, {:.6}", ordinal, point.latitude, point.longitude));
                Ok(())
            }),
            2 => remove_point(&mut tool, output),
            3 => finish_zone(&mut tool, output),
            4 => delete_zone(&mut tool, &registry, output),
            5 => match save_and_quit(&mut tool, &args.out, confirm_discard) {
                Ok(saved) => {
                    output.success(format!("Saved {} zone(s) to {}", saved, args.out.display()));
                    return Ok(());
                }
                Err(e) => Err(e),
            },
            _ => match tool.stop_collecting(confirm_discard) {
                Ok(()) => return Ok(()),
                Err(e) => Err(e.into()),
            },
        };

        if let Err(e) = outcome {
            output.warning(e);
        }
    }
}

/// Write the registry and leave collecting mode.
///
/// Points still being collected go through the same discard confirmation as
/// quitting; declining keeps them and writes nothing.
fn save_and_quit<F: FnOnce(usize) -> bool>(tool: &mut AuthoringTool, out: &Path, confirm: F) -> Result<usize> {
    tool.stop_collecting(confirm)?;
    let dataset = tool.export_registry();
    write_dataset(out, &dataset).with_context(|| format!("Failed to write {}", out.display()))?;
    Ok(dataset.zones.len())
}

fn prompt(tool: &AuthoringTool) -> String {
    if tool.is_collecting() {
        format!("Collecting zone ({} point(s))", tool.points().len())
    } else {
        "Idle".to_string()
    }
}

fn confirm_discard(pending: usize) -> bool {
    Confirm::new()
        .with_prompt(format!("Discard {} collected point(s)?", pending))
        .default(false)
        .interact()
        .unwrap_or(false)
}

fn read_point() -> Result<Point> {
    let raw: String = Input::new().with_prompt("Point as `lat, lng`").interact_text()?;
    parse_point(&raw)
}

fn parse_point(raw: &str) -> Result<Point> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    if parts.len() != 2 {
        bail!("Expected `lat, lng`, got '{}'", raw);
    }
    let lat: f64 = parts[0].parse().with_context(|| format!("Invalid latitude '{}'", parts[0]))?;
    let lng: f64 = parts[1].parse().with_context(|| format!("Invalid longitude '{}'", parts[1]))?;
    Ok(Point::new(lat, lng))
}

fn remove_point(tool: &mut AuthoringTool, output: &OutputWriter) -> Result<()> {
    let labels: Vec<String> = tool
        .labeled_points()
        .iter()
        .map(|p| format!("{}: {:.6}, {:.6}", p.ordinal, p.point.latitude, p.point.longitude))
        .collect();
    if labels.is_empty() {
        output.info("No points collected");
        return Ok(());
    }

    let index = Select::new().with_prompt("Remove which point?").items(&labels).interact()?;
    tool.remove_point(index)?;
    output.info(format!("Removed point {}; remaining points renumbered", index + 1));
    Ok(())
}

fn finish_zone(tool: &mut AuthoringTool, output: &OutputWriter) -> Result<()> {
    let name: String = Input::new()
        .with_prompt("Zone name (empty for default)")
        .allow_empty(true)
        .interact_text()?;
    let zone = tool.finish_zone(Some(&name))?;

    output.success(format!(
        "Created {} with colour {}",
        zone.name,
        zone.color.map(|c| c.to_string()).unwrap_or_default()
    ));
    output.table(vec![ZoneRow::from(&zone)]);
    Ok(())
}

fn delete_zone(tool: &mut AuthoringTool, registry: &SharedRegistry, output: &OutputWriter) -> Result<()> {
    let snapshot = registry.snapshot();
    if snapshot.is_empty() {
        output.info("No zones to delete");
        return Ok(());
    }

    let labels: Vec<String> = snapshot.all().iter().map(|z| format!("{} ({})", z.name, z.id)).collect();
    let index = Select::new().with_prompt("Delete which zone?").items(&labels).interact()?;
    let id: ZoneId = snapshot.all()[index].id.clone();

    if Confirm::new().with_prompt(format!("Delete {}?", labels[index])).default(false).interact()? {
        tool.delete_zone(&id)?;
        output.success(format!("Deleted {}", labels[index]));
    }
    Ok(())
}
