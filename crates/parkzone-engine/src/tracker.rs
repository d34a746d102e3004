//! Zone membership state machine.
//!
//! Each accepted fix is resolved against the registry to a candidate state:
//! `Inside(id)` for the first containing zone in registry order, `Outside`
//! otherwise. Overlapping zones therefore always resolve to the zone that was
//! added first; this is a deterministic choice, not a geometric one.
//!
//! With `stability_updates > 1` a change is only committed after the same
//! candidate was seen on that many consecutive fixes. The first fix out of
//! `Unlocated` always commits immediately.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use parkzone_core::error::{ParkzoneError, Result};
use parkzone_core::models::{Fix, MembershipSnapshot, MembershipState, TransitionEvent};
use parkzone_store::SharedRegistry;

/// Geolocation error code for "position unavailable"
pub const POSITION_UNAVAILABLE: u16 = 2;

#[derive(Debug)]
pub struct MembershipTracker {
    registry: SharedRegistry,
    state: MembershipState,
    last_fix: Option<Fix>,
    last_transition_at: Option<DateTime<Utc>>,
    stability_updates: u32,
    pending: Option<(MembershipState, u32)>,
    events: VecDeque<TransitionEvent>,
}

impl MembershipTracker {
    pub fn new(registry: SharedRegistry) -> Self {
        Self {
            registry,
            state: MembershipState::Unlocated,
            last_fix: None,
            last_transition_at: None,
            stability_updates: 1,
            pending: None,
            events: VecDeque::new(),
        }
    }

    /// Require a new state to hold for `updates` consecutive fixes before it is reported
    pub fn with_stability(mut self, updates: u32) -> Self {
        self.stability_updates = updates.max(1);
        self
    }

    pub fn current_state(&self) -> &MembershipState {
        &self.state
    }

    /// Feed a fix.
    ///
    /// Returns the transition it caused, if any; the same event is also
    /// queued for [`drain_events`](Self::drain_events). A non-finite fix is
    /// rejected and leaves the tracker untouched.
    pub fn position_update(&mut self, fix: Fix) -> Result<Option<TransitionEvent>> {
        let point = fix.point.validated()?;

        let candidate = match self.registry.snapshot().first_containing(point) {
            Some(zone) => MembershipState::Inside(zone.id.clone()),
            None => MembershipState::Outside,
        };
        self.last_fix = Some(fix);

        if candidate == self.state {
            self.pending = None;
            return Ok(None);
        }

        if self.state != MembershipState::Unlocated && !self.is_stable(&candidate) {
            tracing::trace!(candidate = %candidate, "Waiting for membership to stabilise");
            return Ok(None);
        }

        Ok(self.commit(candidate, fix))
    }

    fn is_stable(&mut self, candidate: &MembershipState) -> bool {
        if self.stability_updates <= 1 {
            return true;
        }

        let seen = match &self.pending {
            Some((pending, count)) if pending == candidate => count + 1,
            _ => 1,
        };
        self.pending = Some((candidate.clone(), seen));
        seen >= self.stability_updates
    }

    fn commit(&mut self, to: MembershipState, fix: Fix) -> Option<TransitionEvent> {
        let from = std::mem::replace(&mut self.state, to.clone());
        self.pending = None;
        self.last_transition_at = Some(fix.at);

        // Getting a first fix outside every zone is not a membership change
        if from == MembershipState::Unlocated && to == MembershipState::Outside {
            tracing::debug!("First fix is outside all zones");
            return None;
        }

        tracing::info!(from = %from, to = %to, lat = fix.point.latitude, lng = fix.point.longitude, "Zone membership changed");
        let event = TransitionEvent { from, to, point: fix.point, at: fix.at };
        self.events.push_back(event.clone());
        Some(event)
    }

    /// Forget the tracked entity: back to `Unlocated` with no fix, no
    /// pending candidate and no queued events. No transition is reported.
    pub fn reset(&mut self) {
        if self.state != MembershipState::Unlocated || self.last_fix.is_some() {
            tracing::debug!(from = %self.state, "Membership state reset");
        }
        self.state = MembershipState::Unlocated;
        self.last_fix = None;
        self.last_transition_at = None;
        self.pending = None;
        self.events.clear();
    }

    /// Take queued transition events, oldest first
    pub fn drain_events(&mut self) -> impl Iterator<Item = TransitionEvent> + '_ {
        self.events.drain(..)
    }

    /// Last accepted fix, for recentering the map
    pub fn last_fix(&self) -> Result<Fix> {
        self.last_fix.ok_or_else(|| ParkzoneError::PositionUnavailable {
            code: POSITION_UNAVAILABLE,
            reason: "no position fix received yet".to_string(),
        })
    }

    pub fn snapshot(&self) -> MembershipSnapshot {
        MembershipSnapshot {
            state: self.state.clone(),
            last_fix: self.last_fix,
            last_transition_at: self.last_transition_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use parkzone_core::models::{Point, Polygon, Zone, ZoneId};
    use parkzone_store::ZoneRegistry;

    fn square(id: &str, south: f64, west: f64) -> Zone {
        let polygon = Polygon::new(vec![
            Point::new(south, west),
            Point::new(south, west + 1.0),
            Point::new(south + 1.0, west + 1.0),
            Point::new(south + 1.0, west),
        ])
        .unwrap();
        Zone::new(id, id, polygon, Point::new(south + 0.5, west + 0.5))
    }

    fn registry() -> SharedRegistry {
        SharedRegistry::new(
            ZoneRegistry::from_zones(vec![square("a", 0.0, 0.0), square("b", 0.0, 2.0)]).unwrap(),
        )
    }

    fn fix(lat: f64, lng: f64, second: u32) -> Fix {
        Fix::new(Point::new(lat, lng), Utc.with_ymd_and_hms(2025, 6, 14, 9, 0, second).unwrap())
    }

    fn inside(id: &str) -> MembershipState {
        MembershipState::Inside(ZoneId::from(id))
    }

    #[test]
    fn test_enter_move_leave_reports_each_change_once() {
        let mut tracker = MembershipTracker::new(registry());

        let track = [(0.5, 0.5), (0.6, 0.6), (0.5, 2.5), (0.4, 2.4), (0.5, 5.0), (0.6, 5.0)];
        for (i, (lat, lng)) in track.iter().enumerate() {
            tracker.position_update(fix(*lat, *lng, i as u32)).unwrap();
        }

        let states: Vec<MembershipState> = tracker.drain_events().map(|e| e.to).collect();
        assert_eq!(states, vec![inside("a"), inside("b"), MembershipState::Outside]);
        assert_eq!(tracker.drain_events().count(), 0);
    }

    #[test]
    fn test_first_fix_outside_is_not_a_transition() {
        let mut tracker = MembershipTracker::new(registry());
        assert_eq!(tracker.current_state(), &MembershipState::Unlocated);

        assert!(tracker.position_update(fix(10.0, 10.0, 0)).unwrap().is_none());
        assert_eq!(tracker.current_state(), &MembershipState::Outside);

        let event = tracker.position_update(fix(0.5, 0.5, 1)).unwrap().unwrap();
        assert_eq!(event.from, MembershipState::Outside);
        assert_eq!(event.entered(), Some(&ZoneId::from("a")));
    }

    #[test]
    fn test_invalid_position_keeps_state() {
        let mut tracker = MembershipTracker::new(registry());
        tracker.position_update(fix(0.5, 0.5, 0)).unwrap();

        let err = tracker.position_update(fix(f64::NAN, 0.5, 1)).unwrap_err();
        assert!(matches!(err, ParkzoneError::InvalidPosition { .. }));
        assert_eq!(tracker.current_state(), &inside("a"));
        assert_eq!(tracker.last_fix().unwrap().point, Point::new(0.5, 0.5));
    }

    #[test]
    fn test_last_fix_before_any_update() {
        let tracker = MembershipTracker::new(registry());
        assert!(matches!(
            tracker.last_fix(),
            Err(ParkzoneError::PositionUnavailable { code: POSITION_UNAVAILABLE, .. })
        ));
    }

    #[test]
    fn test_stability_debounces_flapping() {
        let mut tracker = MembershipTracker::new(registry()).with_stability(3);

        // first fix commits immediately
        tracker.position_update(fix(0.5, 0.5, 0)).unwrap();
        assert_eq!(tracker.current_state(), &inside("a"));

        // brief excursion is swallowed
        tracker.position_update(fix(0.5, 5.0, 1)).unwrap();
        tracker.position_update(fix(0.5, 5.0, 2)).unwrap();
        tracker.position_update(fix(0.5, 0.5, 3)).unwrap();
        assert_eq!(tracker.current_state(), &inside("a"));

        for second in 4..6 {
            assert!(tracker.position_update(fix(0.5, 5.0, second)).unwrap().is_none());
        }
        let event = tracker.position_update(fix(0.5, 5.0, 6)).unwrap().unwrap();
        assert_eq!(event.to, MembershipState::Outside);
        assert_eq!(event.at, Utc.with_ymd_and_hms(2025, 6, 14, 9, 0, 6).unwrap());

        let events: Vec<_> = tracker.drain_events().collect();
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_snapshot_tracks_latest_fix() {
        let mut tracker = MembershipTracker::new(registry());
        tracker.position_update(fix(0.5, 0.5, 0)).unwrap();
        tracker.position_update(fix(0.7, 0.7, 9)).unwrap();

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.state, inside("a"));
        assert_eq!(snapshot.last_fix.unwrap().point, Point::new(0.7, 0.7));
        assert_eq!(snapshot.last_transition_at, Some(Utc.with_ymd_and_hms(2025, 6, 14, 9, 0, 0).unwrap()));
    }

    #[test]
    fn test_reset_forgets_entity_without_event() {
        let mut tracker = MembershipTracker::new(registry()).with_stability(2);
        tracker.position_update(fix(0.5, 0.5, 0)).unwrap();
        // half-way through a debounce towards Outside
        tracker.position_update(fix(0.5, 5.0, 1)).unwrap();

        tracker.reset();

        assert_eq!(tracker.current_state(), &MembershipState::Unlocated);
        assert!(tracker.last_fix().is_err());
        assert_eq!(tracker.drain_events().count(), 0);
        assert_eq!(tracker.snapshot().last_transition_at, None);

        // the next fix behaves like a first fix again
        let event = tracker.position_update(fix(0.5, 2.5, 2)).unwrap().unwrap();
        assert_eq!(event.from, MembershipState::Unlocated);
        assert_eq!(event.to, inside("b"));
    }
}
