//! Interval store holding the current group snapshot.

use chrono::{DateTime, NaiveDate, Utc};
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

use super::event::{DayStatus, OutageEvent};
use super::snapshot::GroupSnapshot;

/// Holds the current [`GroupSnapshot`] and answers range and day queries.
///
/// `load` swaps the snapshot wholesale behind a single `Arc`, so readers
/// always observe either the old or the new snapshot, never a mix. The
/// store is the snapshot's sole owner; readers only ever borrow it through
/// the returned `Arc`.
pub struct ScheduleStore {
    snapshot: RwLock<Option<Arc<GroupSnapshot>>>,
}

impl ScheduleStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(None),
        }
    }

    /// Atomically replaces the current snapshot.
    ///
    /// An incoming `updated_on` older than the current one is stale data
    /// from the utility, not an error: it is loaded anyway with a warning,
    /// and the staleness cache window shields facts derived mid-cycle.
    pub fn load(&self, snapshot: GroupSnapshot) {
        let incoming = Arc::new(snapshot);
        let mut guard = self.snapshot.write().unwrap();

        if let Some(current) = guard.as_ref() {
            if incoming.updated_on() < current.updated_on() {
                warn!(
                    current = %current.updated_on(),
                    incoming = %incoming.updated_on(),
                    "Loaded schedule is older than the current one"
                );
            }
        }

        debug!(
            days = incoming.days().len(),
            updated_on = %incoming.updated_on(),
            "Schedule snapshot loaded"
        );
        *guard = Some(incoming);
    }

    /// Current snapshot, if one has been loaded.
    pub fn snapshot(&self) -> Option<Arc<GroupSnapshot>> {
        self.snapshot.read().unwrap().clone()
    }

    /// All events intersecting `[from, until)`, ascending by start.
    ///
    /// Empty when no snapshot is loaded or nothing overlaps.
    pub fn events_between(&self, from: DateTime<Utc>, until: DateTime<Utc>) -> Vec<OutageEvent> {
        match self.snapshot() {
            Some(snapshot) => snapshot.events_between(from, until),
            None => Vec::new(),
        }
    }

    /// Day-level status for a calendar date; `None` means no data.
    pub fn day_status(&self, date: NaiveDate) -> Option<DayStatus> {
        self.snapshot().and_then(|snapshot| snapshot.day_status(date))
    }

    /// `updated_on` stamp of the current snapshot.
    pub fn updated_on(&self) -> Option<DateTime<Utc>> {
        self.snapshot().map(|snapshot| snapshot.updated_on())
    }
}

impl Default for ScheduleStore {
    fn default() -> Self {
        Self::new()
    }
}
