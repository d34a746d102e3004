use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Point, ZoneId};

/// Zone membership of the tracked entity
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "zoneId", rename_all = "snake_case")]
pub enum MembershipState {
    /// No position fix received yet
    #[default]
    Unlocated,
    /// Located, but not inside any zone
    Outside,
    /// Inside the given zone
    Inside(ZoneId),
}

impl MembershipState {
    pub fn zone_id(&self) -> Option<&ZoneId> {
        match self {
            MembershipState::Inside(id) => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for MembershipState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MembershipState::Unlocated => f.write_str("unlocated"),
            MembershipState::Outside => f.write_str("outside"),
            MembershipState::Inside(id) => write!(f, "inside {}", id),
        }
    }
}

/// A position fix from the position source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    pub point: Point,
    /// Horizontal accuracy radius in meters, when reported
    pub accuracy_m: Option<f64>,
    pub at: DateTime<Utc>,
}

impl Fix {
    pub fn new(point: Point, at: DateTime<Utc>) -> Self {
        Self { point, accuracy_m: None, at }
    }

    pub fn with_accuracy(mut self, accuracy_m: f64) -> Self {
        self.accuracy_m = Some(accuracy_m);
        self
    }
}

/// Reported change of membership
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionEvent {
    pub from: MembershipState,
    pub to: MembershipState,
    pub point: Point,
    pub at: DateTime<Utc>,
}

impl TransitionEvent {
    /// Zone that was entered, if any
    pub fn entered(&self) -> Option<&ZoneId> {
        self.to.zone_id()
    }

    /// Zone that was left, if any
    pub fn exited(&self) -> Option<&ZoneId> {
        self.from.zone_id()
    }
}

/// Serializable view of the tracker for host messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipSnapshot {
    pub state: MembershipState,
    pub last_fix: Option<Fix>,
    pub last_transition_at: Option<DateTime<Utc>>,
}
