//! Outage event and state types.

use chrono::{DateTime, Duration, Utc};
use std::fmt;
use thiserror::Error;

/// Wire tag for a published (planned) outage interval.
const WIRE_KIND_PLANNED: &str = "Definite";

/// Wire tag for an emergency outage interval.
const WIRE_KIND_EMERGENCY: &str = "Emergency";

/// Errors that can occur when constructing schedule events.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventError {
    /// Interval end does not lie after its start.
    #[error("Event end {end} is not after start {start}")]
    EmptyInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// Kind tag carried by an outage interval.
///
/// The utility publishes two kinds; unrecognized tags are preserved
/// verbatim so state mapping can report them instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OutageKind {
    /// Scheduled, published outage (wire tag `Definite`).
    Planned,
    /// Unscheduled outage (wire tag `Emergency`).
    Emergency,
    /// Unrecognized wire tag, kept as-is.
    Other(String),
}

impl OutageKind {
    /// Maps a raw wire tag onto a kind.
    pub fn from_wire(tag: &str) -> Self {
        match tag {
            WIRE_KIND_PLANNED => OutageKind::Planned,
            WIRE_KIND_EMERGENCY => OutageKind::Emergency,
            other => OutageKind::Other(other.to_string()),
        }
    }

    /// Returns the wire tag for this kind.
    pub fn as_wire(&self) -> &str {
        match self {
            OutageKind::Planned => WIRE_KIND_PLANNED,
            OutageKind::Emergency => WIRE_KIND_EMERGENCY,
            OutageKind::Other(tag) => tag,
        }
    }
}

impl fmt::Display for OutageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// Connectivity state at an instant.
///
/// Derived per query from the event covering the instant (or its absence),
/// never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityState {
    /// Power is on; no outage covers the instant.
    Normal,
    /// Inside a published planned outage.
    PlannedOutage,
    /// Inside an emergency outage.
    Emergency,
}

impl fmt::Display for ConnectivityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectivityState::Normal => "Normal",
            ConnectivityState::PlannedOutage => "PlannedOutage",
            ConnectivityState::Emergency => "Emergency",
        };
        f.write_str(s)
    }
}

/// Day-level status tag published alongside a day's intervals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayStatus {
    /// The rotation schedule applies for this day.
    ScheduleApplies,
    /// Emergency shutdowns are in effect; the schedule is suspended.
    EmergencyShutdowns,
    /// Unrecognized wire tag, kept as-is.
    Other(String),
}

impl DayStatus {
    /// Maps a raw wire tag onto a status.
    pub fn from_wire(tag: &str) -> Self {
        match tag {
            "ScheduleApplies" => DayStatus::ScheduleApplies,
            "EmergencyShutdowns" => DayStatus::EmergencyShutdowns,
            other => DayStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for DayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayStatus::ScheduleApplies => f.write_str("ScheduleApplies"),
            DayStatus::EmergencyShutdowns => f.write_str("EmergencyShutdowns"),
            DayStatus::Other(tag) => f.write_str(tag),
        }
    }
}

/// An interval on the connectivity timeline.
///
/// The interval is end-exclusive: an instant equal to `end` is already
/// outside the event. `end > start` is enforced at construction; events
/// are value types owned by the snapshot that parsed them and are never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutageEvent {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    kind: OutageKind,
}

impl OutageEvent {
    /// Creates a new event.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::EmptyInterval`] when `end <= start`.
    pub fn new(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        kind: OutageKind,
    ) -> Result<Self, EventError> {
        if end <= start {
            return Err(EventError::EmptyInterval { start, end });
        }
        Ok(Self { start, end, kind })
    }

    /// Interval start (inclusive).
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Interval end (exclusive).
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Kind tag.
    pub fn kind(&self) -> &OutageKind {
        &self.kind
    }

    /// Checks whether `at` falls inside `[start, end)`.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }

    /// Checks whether the event intersects the window `[from, until)`.
    pub fn intersects(&self, from: DateTime<Utc>, until: DateTime<Utc>) -> bool {
        self.start < until && self.end > from
    }

    /// Interval length.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}
