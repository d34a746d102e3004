//! Lots command implementation

use anyhow::{Context, Result};
use parkzone_engine::{LotLayer, MemorySurface};
use parkzone_store::lots::read_municipal_lots;

use crate::cli::LotsArgs;
use crate::output::OutputWriter;
use crate::output_types::{LotRow, LotsOutput, SkippedLotRow};

pub fn execute(args: LotsArgs, output: &OutputWriter) -> Result<()> {
    let (lots, report) = read_municipal_lots(&args.feed)
        .with_context(|| format!("Failed to read parking-lot feed {}", args.feed.display()))?;

    let mut surface = MemorySurface::new();
    let mut layer = LotLayer::new();
    let drawn = layer.show(&mut surface, lots);

    let rows: Vec<LotRow> = layer.lots().iter().map(LotRow::from).collect();
    let skipped: Vec<SkippedLotRow> = report.skipped.iter().map(SkippedLotRow::from).collect();
    let failed = report.failed() + drawn.failed;

    if output.is_json() {
        return output.result(LotsOutput {
            feed: args.feed.display().to_string(),
            loaded: drawn.drawn,
            failed,
            markers: layer.marker_count(),
            lots: rows,
            skipped,
        });
    }

    output.section("Municipal parking stands");
    output.table(rows);
    if failed > 0 {
        output.section("Skipped entries");
        output.table(skipped);
        output.warning(format!("{} placed, {} failed", drawn.drawn, failed));
    } else {
        output.success(format!("{} stand(s) placed", drawn.drawn));
    }
    Ok(())
}
