//! Visible command implementation

use anyhow::{bail, Result};
use parkzone_core::config::LayeredConfig;
use parkzone_core::models::Bounds;
use parkzone_engine::{MemorySurface, OverlayController};
use parkzone_store::SharedRegistry;

use crate::cli::VisibleArgs;
use crate::output::OutputWriter;
use crate::output_types::{VisibleOutput, ZoneRow};

pub fn execute(args: VisibleArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    if args.south > args.north || args.west > args.east {
        bail!("Viewport must have south <= north and west <= east");
    }
    let bounds = Bounds::new(args.south, args.west, args.north, args.east);

    let registry = SharedRegistry::new(super::load_registry(config, output)?);
    let mut surface = MemorySurface::new();
    let mut overlay = OverlayController::new(registry.clone());
    overlay.activate(&mut surface, bounds)?;

    let snapshot = registry.snapshot();
    let cutouts: Vec<ZoneRow> = overlay
        .cutout_zone_ids()
        .into_iter()
        .filter_map(|id| snapshot.get(id))
        .map(ZoneRow::from)
        .collect();

    if output.is_json() {
        return output.result(VisibleOutput {
            bounds: [args.south, args.west, args.north, args.east],
            cutouts,
        });
    }

    output.section("Permitted cutouts");
    let count = cutouts.len();
    output.table(cutouts);
    output.info(format!("{} of {} zones visible", count, snapshot.len()));
    Ok(())
}
