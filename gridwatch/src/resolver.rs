//! Event resolution: classify instants and find upcoming outages.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::warn;

use crate::schedule::{ConnectivityState, OutageEvent, OutageKind, ScheduleStore};

/// Forward window, in hours, within which "next event" search is bounded.
///
/// The utility does not publish schedules further out than this, so a
/// longer search would only ever return nothing.
pub const DEFAULT_HORIZON_HOURS: i64 = 24;

/// Answers point-in-time and "next event" queries over the store.
pub struct EventResolver {
    store: Arc<ScheduleStore>,
}

impl EventResolver {
    /// Creates a resolver over the given store.
    pub fn new(store: Arc<ScheduleStore>) -> Self {
        Self { store }
    }

    /// The default forward search window.
    pub fn default_horizon() -> Duration {
        Duration::hours(DEFAULT_HORIZON_HOURS)
    }

    /// The event whose `[start, end)` contains `at`, if any.
    ///
    /// The source data defines at most one active outage per instant; if a
    /// malformed payload overlaps anyway, the event with the earliest start
    /// wins (first-parsed order breaks exact ties), logged but never an
    /// error.
    pub fn event_at(&self, at: DateTime<Utc>) -> Option<OutageEvent> {
        let candidates = self
            .store
            .events_between(at, at + Duration::nanoseconds(1));

        if candidates.len() > 1 {
            warn!(
                at = %at,
                count = candidates.len(),
                "Overlapping events at instant, picking the earliest-starting one"
            );
        }

        // events_between is ascending and stable, so the front is the
        // earliest-starting (and first-parsed among equals)
        candidates.into_iter().next()
    }

    /// Connectivity state at `at`.
    ///
    /// No covering event means power is on. An unrecognized kind also maps
    /// to [`ConnectivityState::Normal`]: display always needs a state, so
    /// bad upstream data is logged instead of propagated.
    pub fn state_at(&self, at: DateTime<Utc>) -> ConnectivityState {
        match self.event_at(at) {
            None => ConnectivityState::Normal,
            Some(event) => match event.kind() {
                OutageKind::Planned => ConnectivityState::PlannedOutage,
                OutageKind::Emergency => ConnectivityState::Emergency,
                OutageKind::Other(tag) => {
                    warn!(kind = %tag, "Unknown event kind, treating as Normal");
                    ConnectivityState::Normal
                }
            },
        }
    }

    /// The first event of `kind` starting strictly after `after`, within
    /// `horizon`.
    ///
    /// An event already open at `after` (a multi-day span, say) is
    /// "current", never "next": the strict `start > after` bound excludes
    /// it even though the window query surfaces it.
    pub fn next_event_of_kind(
        &self,
        kind: &OutageKind,
        after: DateTime<Utc>,
        horizon: Duration,
    ) -> Option<OutageEvent> {
        let mut events = self.store.events_between(after, after + horizon);
        events.sort_by_key(OutageEvent::start);
        events
            .into_iter()
            .find(|event| event.kind() == kind && event.start() > after)
    }
}
