//! Schedule model: outage events, day records, and the interval store.
//!
//! A fetched schedule parses into a [`GroupSnapshot`] (one immutable,
//! wholesale-replaceable copy of the group's outage timeline) held by the
//! [`ScheduleStore`]. Queries never mutate; a refresh swaps the whole
//! snapshot.

mod event;
mod snapshot;
mod store;

pub use event::{ConnectivityState, DayStatus, EventError, OutageEvent, OutageKind};
pub use snapshot::{DaySchedule, GroupSnapshot, ParseError};
pub use store::ScheduleStore;
