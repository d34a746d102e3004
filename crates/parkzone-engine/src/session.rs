//! Position tracking sessions.
//!
//! A [`TrackingSession`] owns the watch it started through a [`WatchGuard`];
//! dropping the session on any path (finished stream, early return, dropped
//! future) clears the watch on the position source. Membership only lives as
//! long as the session: once [`TrackingSession::run`] returns or its future
//! is dropped, the tracker is reset to `Unlocated`.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use futures::stream::{self, BoxStream, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use parkzone_core::error::{ParkzoneError, Result};
use parkzone_core::models::{Fix, MembershipState, Point, TransitionEvent};
use parkzone_core::ports::{PositionSource, PositionWatch, WatchId};

use crate::tracker::{MembershipTracker, POSITION_UNAVAILABLE};

/// Clears a position watch when dropped
pub struct WatchGuard {
    source: Arc<dyn PositionSource>,
    id: WatchId,
}

impl WatchGuard {
    pub fn id(&self) -> WatchId {
        self.id
    }
}

impl Drop for WatchGuard {
    fn drop(&mut self) {
        self.source.clear_watch(self.id);
        tracing::debug!(watch = self.id.0, "Position watch cleared");
    }
}

/// What happened while a session was running
#[derive(Debug)]
pub enum SessionEvent {
    /// A fix the tracker accepted
    Position(Fix),
    Transition(TransitionEvent),
    /// The fix was rejected by the tracker
    Rejected(ParkzoneError),
    /// The position source reported a failure
    SourceError(ParkzoneError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub fixes: usize,
    pub transitions: usize,
    pub rejected: usize,
    pub source_errors: usize,
    /// Membership when the source ended, before the tracker was reset
    pub final_state: MembershipState,
}

/// Resets the tracker when the session stops, including when the running
/// future is dropped
struct ResetOnExit<'a>(&'a mut MembershipTracker);

impl Drop for ResetOnExit<'_> {
    fn drop(&mut self) {
        self.0.reset();
    }
}

pub struct TrackingSession {
    fixes: BoxStream<'static, Result<Fix>>,
    guard: WatchGuard,
}

impl TrackingSession {
    pub fn start(source: Arc<dyn PositionSource>) -> Result<Self> {
        let PositionWatch { id, fixes } = source.watch()?;
        tracing::debug!(watch = id.0, "Position watch started");
        Ok(Self { fixes, guard: WatchGuard { source, id } })
    }

    pub fn watch_id(&self) -> WatchId {
        self.guard.id()
    }

    pub async fn next_fix(&mut self) -> Option<Result<Fix>> {
        self.fixes.next().await
    }

    /// Feed every fix into the tracker until the source ends.
    ///
    /// Source errors and rejected fixes are reported to `on_event` and the
    /// session keeps going; retrying is up to the source. The tracker is
    /// reset when the session stops.
    pub async fn run<F>(mut self, tracker: &mut MembershipTracker, mut on_event: F) -> SessionSummary
    where
        F: FnMut(SessionEvent),
    {
        let mut guard = ResetOnExit(tracker);
        let tracker = &mut *guard.0;
        let mut summary = SessionSummary::default();

        while let Some(next) = self.next_fix().await {
            match next {
                Ok(fix) => {
                    summary.fixes += 1;
                    match tracker.position_update(fix) {
                        Ok(_) => {
                            on_event(SessionEvent::Position(fix));
                            for event in tracker.drain_events() {
                                summary.transitions += 1;
                                on_event(SessionEvent::Transition(event));
                            }
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "Rejected position fix");
                            summary.rejected += 1;
                            on_event(SessionEvent::Rejected(e));
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Position source error");
                    summary.source_errors += 1;
                    on_event(SessionEvent::SourceError(e));
                }
            }
        }

        summary.final_state = tracker.current_state().clone();
        tracing::info!(
            fixes = summary.fixes,
            transitions = summary.transitions,
            rejected = summary.rejected,
            final_state = %summary.final_state,
            "Tracking session ended"
        );
        summary
    }
}

#[derive(Debug, Default)]
struct WatchBook {
    next_id: AtomicU64,
    cleared: Mutex<Vec<WatchId>>,
}

impl WatchBook {
    fn open(&self) -> WatchId {
        WatchId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    // Poisoning means a clear_watch call panicked; nothing left to protect.
    fn clear(&self, id: WatchId) {
        let mut cleared = self.cleared.lock().unwrap_or_else(|e| e.into_inner());
        if !cleared.contains(&id) {
            cleared.push(id);
        }
    }

    fn cleared(&self) -> Vec<WatchId> {
        self.cleared.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

/// Pushes fixes into a [`ChannelPositionSource`]
#[derive(Debug, Clone)]
pub struct PositionSender {
    tx: mpsc::UnboundedSender<Result<Fix>>,
    latest: Arc<Mutex<Option<Fix>>>,
}

impl PositionSender {
    /// Returns false once the watching side is gone
    pub fn send(&self, fix: Fix) -> bool {
        *self.latest.lock().unwrap_or_else(|e| e.into_inner()) = Some(fix);
        self.tx.send(Ok(fix)).is_ok()
    }

    pub fn send_error(&self, error: ParkzoneError) -> bool {
        self.tx.send(Err(error)).is_ok()
    }
}

/// Position source fed through a channel by the host shell.
///
/// Supports a single watch; the stream ends when every sender is dropped.
#[derive(Debug)]
pub struct ChannelPositionSource {
    rx: Mutex<Option<mpsc::UnboundedReceiver<Result<Fix>>>>,
    latest: Arc<Mutex<Option<Fix>>>,
    watches: WatchBook,
}

impl ChannelPositionSource {
    pub fn channel() -> (Self, PositionSender) {
        let (tx, rx) = mpsc::unbounded_channel();
        let latest = Arc::new(Mutex::new(None));
        let source = Self { rx: Mutex::new(Some(rx)), latest: Arc::clone(&latest), watches: WatchBook::default() };
        (source, PositionSender { tx, latest })
    }

    pub fn cleared_watches(&self) -> Vec<WatchId> {
        self.watches.cleared()
    }
}

#[async_trait]
impl PositionSource for ChannelPositionSource {
    async fn current_position(&self) -> Result<Fix> {
        let latest = *self.latest.lock().unwrap_or_else(|e| e.into_inner());
        latest.ok_or_else(|| ParkzoneError::PositionUnavailable {
            code: POSITION_UNAVAILABLE,
            reason: "no fix has been pushed yet".to_string(),
        })
    }

    fn watch(&self) -> Result<PositionWatch> {
        let rx = self.rx.lock().unwrap_or_else(|e| e.into_inner()).take().ok_or(
            ParkzoneError::InvalidState {
                operation: "watch position",
                state: "the channel is already being watched".to_string(),
            },
        )?;

        let fixes = stream::unfold(rx, |mut rx| async move { rx.recv().await.map(|fix| (fix, rx)) });
        Ok(PositionWatch { id: self.watches.open(), fixes: fixes.boxed() })
    }

    fn clear_watch(&self, id: WatchId) {
        self.watches.clear(id);
    }
}

/// One recorded position in a track file
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackPoint {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    accuracy: Option<f64>,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
}

/// Replays a recorded track; every watch yields the full track
#[derive(Debug)]
pub struct ReplayPositionSource {
    fixes: Vec<Fix>,
    watches: WatchBook,
}

impl ReplayPositionSource {
    pub fn new(fixes: Vec<Fix>) -> Self {
        Self { fixes, watches: WatchBook::default() }
    }

    /// Parse a JSON array of `{latitude, longitude, accuracy?, timestamp?}`.
    ///
    /// Points without a timestamp are spaced one second apart from `start`.
    pub fn from_json(json: &str, start: DateTime<Utc>) -> Result<Self> {
        let points: Vec<TrackPoint> = serde_json::from_str(json)?;
        let fixes = points
            .into_iter()
            .enumerate()
            .map(|(i, p)| {
                let at = p.timestamp.unwrap_or_else(|| start + Duration::seconds(i as i64));
                let fix = Fix::new(Point::new(p.latitude, p.longitude), at);
                match p.accuracy {
                    Some(accuracy) => fix.with_accuracy(accuracy),
                    None => fix,
                }
            })
            .collect();
        Ok(Self::new(fixes))
    }

    pub fn from_path(path: &Path, start: DateTime<Utc>) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?, start)
    }

    pub fn len(&self) -> usize {
        self.fixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixes.is_empty()
    }

    pub fn cleared_watches(&self) -> Vec<WatchId> {
        self.watches.cleared()
    }
}

#[async_trait]
impl PositionSource for ReplayPositionSource {
    async fn current_position(&self) -> Result<Fix> {
        self.fixes.last().copied().ok_or_else(|| ParkzoneError::PositionUnavailable {
            code: POSITION_UNAVAILABLE,
            reason: "recorded track is empty".to_string(),
        })
    }

    fn watch(&self) -> Result<PositionWatch> {
        let fixes: Vec<Result<Fix>> = self.fixes.iter().copied().map(Ok).collect();
        Ok(PositionWatch { id: self.watches.open(), fixes: stream::iter(fixes).boxed() })
    }

    fn clear_watch(&self, id: WatchId) {
        self.watches.clear(id);
    }
}
