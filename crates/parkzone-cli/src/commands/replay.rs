//! Replay command implementation

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use parkzone_core::config::LayeredConfig;
use parkzone_engine::{MembershipTracker, ReplayPositionSource, SessionEvent, TrackingSession};
use parkzone_store::SharedRegistry;

use crate::cli::ReplayArgs;
use crate::output::OutputWriter;
use crate::output_types::{ReplayOutput, TransitionRow};

pub async fn execute(args: ReplayArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let registry = SharedRegistry::new(super::load_registry(config, output)?);

    let start = match args.start.as_deref() {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .with_context(|| format!("Invalid --start timestamp '{}'", raw))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };
    let source = ReplayPositionSource::from_path(&args.track, start)
        .with_context(|| format!("Failed to read track {}", args.track.display()))?;
    tracing::info!(fixes = source.len(), "Replaying track");

    let mut tracker =
        MembershipTracker::new(registry).with_stability(config.stability_updates.value);
    let session = TrackingSession::start(Arc::new(source))?;

    let mut transitions = Vec::new();
    let summary = session
        .run(&mut tracker, |event| match event {
            SessionEvent::Transition(t) => transitions.push(TransitionRow {
                at: t.at,
                from: t.from.to_string(),
                to: t.to.to_string(),
                latitude: t.point.latitude,
                longitude: t.point.longitude,
            }),
            SessionEvent::Rejected(e) | SessionEvent::SourceError(e) => {
                output.warning(e);
            }
            SessionEvent::Position(_) => {}
        })
        .await;

    if output.is_json() {
        return output.result(ReplayOutput {
            fixes: summary.fixes,
            rejected: summary.rejected,
            final_state: summary.final_state,
            transitions,
        });
    }

    output.section("Transitions");
    output.table(transitions);
    output.kv("Fixes", summary.fixes);
    output.kv("Final state", &summary.final_state);
    Ok(())
}
