//! Locate command implementation

use anyhow::Result;
use chrono::Utc;
use parkzone_core::config::LayeredConfig;
use parkzone_core::models::{Fix, Point};
use parkzone_engine::MembershipTracker;
use parkzone_geo::spatial::count_containing;
use parkzone_store::SharedRegistry;

use crate::cli::LocateArgs;
use crate::output::OutputWriter;
use crate::output_types::LocateOutput;

pub fn execute(args: LocateArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let registry = SharedRegistry::new(super::load_registry(config, output)?);
    let point = Point::new(args.lat, args.lng);

    let mut tracker = MembershipTracker::new(registry.clone());
    tracker.position_update(Fix::new(point, Utc::now()))?;

    let snapshot = registry.snapshot();
    let membership = tracker.current_state().clone();
    let zone_name = membership.zone_id().and_then(|id| snapshot.get(id)).map(|z| z.name.clone());
    let containing_zones = count_containing(snapshot.all(), point);

    if output.is_json() {
        return output.result(LocateOutput {
            latitude: args.lat,
            longitude: args.lng,
            membership,
            zone_name,
            containing_zones,
        });
    }

    match zone_name {
        Some(name) => output.success(format!("Inside {} ({})", name, membership)),
        None => output.info("Outside all zones"),
    }
    if containing_zones > 1 {
        output.warning(format!(
            "Point lies in {} overlapping zones; the first in dataset order wins",
            containing_zones
        ));
    }
    Ok(())
}
