//! Derived facts: stateless projections over the resolver and snapshot.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::fmt;
use std::sync::Arc;

use crate::cache::SnapshotCache;
use crate::countdown::format_countdown;
use crate::i18n::{TranslationKey, Translations};
use crate::resolver::EventResolver;
use crate::schedule::{ConnectivityState, DayStatus, GroupSnapshot, OutageEvent, OutageKind, ScheduleStore};

/// Long DSO legal names containing this marker collapse to it for display.
const DTEK_DISPLAY_NAME: &str = "ДТЕК";

/// Classification of the next upcoming outage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextOutageType {
    /// A published planned outage is coming up.
    Planned,
    /// An emergency outage is coming up.
    Emergency,
    /// Data is present and confirms nothing is scheduled.
    NotPlanned,
}

impl fmt::Display for NextOutageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NextOutageType::Planned => "Planned",
            NextOutageType::Emergency => "Emergency",
            NextOutageType::NotPlanned => "NotPlanned",
        };
        f.write_str(s)
    }
}

/// Identifier for one derived fact.
///
/// The static [`OutageFacts::resolve`] mapping replaces a per-fact closure
/// table: every fact is declared once here and dispatched without dynamic
/// lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactId {
    CurrentState,
    CurrentDayStatus,
    NextOutageType,
    ScheduleUpdatedOn,
    NextPlannedOutage,
    NextConnectivity,
    NextPlannedReconnection,
    NextPlannedOutageStartTime,
    NextPlannedOutageEndTime,
    NextPlannedOutageDuration,
    TimeUntilConnectivity,
    TimeUntilOutage,
}

impl FactId {
    /// Every fact, in display order.
    pub const ALL: [FactId; 12] = [
        FactId::CurrentState,
        FactId::CurrentDayStatus,
        FactId::NextOutageType,
        FactId::ScheduleUpdatedOn,
        FactId::NextPlannedOutage,
        FactId::NextConnectivity,
        FactId::NextPlannedReconnection,
        FactId::NextPlannedOutageStartTime,
        FactId::NextPlannedOutageEndTime,
        FactId::NextPlannedOutageDuration,
        FactId::TimeUntilConnectivity,
        FactId::TimeUntilOutage,
    ];

    /// Stable snake_case key for display and logging.
    pub fn key(&self) -> &'static str {
        match self {
            FactId::CurrentState => "current_state",
            FactId::CurrentDayStatus => "current_day_status",
            FactId::NextOutageType => "next_outage_type",
            FactId::ScheduleUpdatedOn => "schedule_updated_on",
            FactId::NextPlannedOutage => "next_planned_outage",
            FactId::NextConnectivity => "next_connectivity",
            FactId::NextPlannedReconnection => "next_planned_reconnection",
            FactId::NextPlannedOutageStartTime => "next_planned_outage_start_time",
            FactId::NextPlannedOutageEndTime => "next_planned_outage_end_time",
            FactId::NextPlannedOutageDuration => "next_planned_outage_duration",
            FactId::TimeUntilConnectivity => "time_until_connectivity",
            FactId::TimeUntilOutage => "time_until_outage",
        }
    }
}

/// A resolved fact value.
///
/// `Unknown` carries the three-valued semantics through to display: it
/// means "no data", which is distinct from a value confirming "nothing
/// scheduled" (`Minutes(0)`, `OutageType(NotPlanned)`).
#[derive(Debug, Clone, PartialEq)]
pub enum FactValue {
    State(ConnectivityState),
    DayStatus(DayStatus),
    OutageType(NextOutageType),
    Timestamp(DateTime<Utc>),
    Minutes(i64),
    Text(String),
    Unknown,
}

impl fmt::Display for FactValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactValue::State(state) => write!(f, "{}", state),
            FactValue::DayStatus(status) => write!(f, "{}", status),
            FactValue::OutageType(kind) => write!(f, "{}", kind),
            FactValue::Timestamp(stamp) => write!(f, "{}", stamp.to_rfc3339()),
            FactValue::Minutes(minutes) => write!(f, "{}", minutes),
            FactValue::Text(text) => f.write_str(text),
            FactValue::Unknown => f.write_str("unknown"),
        }
    }
}

/// Read-only fact provider over the last loaded snapshot.
///
/// Every fact is a pure function of the explicit `now` argument plus the
/// resolver and the cached snapshot; the engine holds no mutable state of
/// its own. Presence checks ("is there data at all?") go through the
/// staleness cache; event queries go to the store directly.
pub struct OutageFacts {
    store: Arc<ScheduleStore>,
    cache: Arc<SnapshotCache>,
    resolver: EventResolver,
    translations: Translations,
    timezone: Tz,
    region_name: String,
    provider_name: String,
}

impl OutageFacts {
    /// Creates a fact provider over the given store and cache.
    pub fn new(
        store: Arc<ScheduleStore>,
        cache: Arc<SnapshotCache>,
        translations: Translations,
        timezone: Tz,
        region_name: String,
        provider_name: String,
    ) -> Self {
        let resolver = EventResolver::new(Arc::clone(&store));
        Self {
            store,
            cache,
            resolver,
            translations,
            timezone,
            region_name,
            provider_name,
        }
    }

    fn snapshot(&self) -> Option<Arc<GroupSnapshot>> {
        self.cache.get()
    }

    fn next_planned_event(&self, now: DateTime<Utc>) -> Option<OutageEvent> {
        self.resolver
            .next_event_of_kind(&OutageKind::Planned, now, EventResolver::default_horizon())
    }

    fn format_wall_clock(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&self.timezone).format("%H:%M").to_string()
    }

    /// Connectivity state at `now`.
    pub fn current_state(&self, now: DateTime<Utc>) -> ConnectivityState {
        self.resolver.state_at(now)
    }

    /// The event covering `now`, if any.
    pub fn current_event(&self, now: DateTime<Utc>) -> Option<OutageEvent> {
        self.resolver.event_at(now)
    }

    /// Start of the next planned outage within the horizon.
    pub fn next_planned_outage(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.next_planned_event(now).map(|event| event.start())
    }

    /// Duration of the next planned outage in whole minutes.
    ///
    /// `None` means no data at all; `0` means data is present but nothing
    /// is scheduled in the horizon. The distinction is load-bearing for
    /// display and must not be collapsed.
    pub fn next_planned_outage_duration(&self, now: DateTime<Utc>) -> Option<i64> {
        self.snapshot()?;
        match self.next_planned_event(now) {
            Some(event) => Some(event.duration().num_minutes()),
            None => Some(0),
        }
    }

    /// Day-level status for the current calendar date.
    ///
    /// When no day record matches but an outage is in progress, the day is
    /// reported as emergency shutdowns: the schedule data has been
    /// superseded by whatever is happening on the ground.
    pub fn current_day_status(&self, now: DateTime<Utc>) -> Option<DayStatus> {
        let snapshot = self.snapshot()?;
        let today = now.with_timezone(&self.timezone).date_naive();

        if let Some(status) = snapshot.day_status(today) {
            return Some(status);
        }

        match self.current_state(now) {
            ConnectivityState::Normal => None,
            _ => Some(DayStatus::EmergencyShutdowns),
        }
    }

    /// Classification of the next outage.
    pub fn next_outage_type(&self, now: DateTime<Utc>) -> Option<NextOutageType> {
        self.snapshot()?;
        match self.next_planned_event(now) {
            Some(event) => match event.kind() {
                OutageKind::Emergency => Some(NextOutageType::Emergency),
                _ => Some(NextOutageType::Planned),
            },
            None => Some(NextOutageType::NotPlanned),
        }
    }

    /// Countdown until power is (back) on.
    ///
    /// Inside a planned outage this counts down to its end; otherwise to
    /// the end of the next planned outage. `None` when nothing is planned
    /// or the moment has already passed.
    pub fn time_until_connectivity(&self, now: DateTime<Utc>) -> Option<String> {
        let target = if self.current_state(now) == ConnectivityState::PlannedOutage {
            self.current_event(now).map(|event| event.end())
        } else {
            self.next_planned_event(now).map(|event| event.end())
        }?;

        let delta = target - now;
        if delta <= chrono::Duration::zero() {
            return None;
        }
        Some(format_countdown(delta, &self.translations))
    }

    /// Countdown until the next planned outage starts.
    ///
    /// `None` while already inside a planned outage, when nothing is
    /// planned, or when the start has already passed.
    pub fn time_until_outage(&self, now: DateTime<Utc>) -> Option<String> {
        if self.current_state(now) == ConnectivityState::PlannedOutage {
            return None;
        }

        let start = self.next_planned_event(now)?.start();
        let delta = start - now;
        if delta <= chrono::Duration::zero() {
            return None;
        }
        Some(format_countdown(delta, &self.translations))
    }

    /// When power is next expected on: end of the current planned outage,
    /// or end of the next one.
    pub fn next_connectivity(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if self.current_state(now) == ConnectivityState::PlannedOutage {
            return self.current_event(now).map(|event| event.end());
        }
        self.next_planned_event(now).map(|event| event.end())
    }

    /// End of the next planned outage, when one is found.
    pub fn next_planned_reconnection(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.next_planned_event(now).map(|event| event.end())
    }

    /// Start of the next planned outage as `HH:MM` wall-clock time.
    pub fn next_planned_outage_start_time(&self, now: DateTime<Utc>) -> Option<String> {
        self.next_planned_event(now)
            .map(|event| self.format_wall_clock(event.start()))
    }

    /// End of the relevant planned outage as `HH:MM` wall-clock time:
    /// the current one while power is off, the next one otherwise.
    pub fn next_planned_outage_end_time(&self, now: DateTime<Utc>) -> Option<String> {
        let event = if self.current_state(now) == ConnectivityState::PlannedOutage {
            self.current_event(now)
        } else {
            self.next_planned_event(now)
        }?;
        Some(self.format_wall_clock(event.end()))
    }

    /// When the utility last revised the schedule.
    pub fn schedule_updated_on(&self) -> Option<DateTime<Utc>> {
        self.store.updated_on()
    }

    /// Configured region name.
    pub fn region_name(&self) -> &str {
        &self.region_name
    }

    /// Resolved provider name, shortened for display.
    pub fn provider_name(&self) -> String {
        if self.provider_name.to_uppercase().contains(DTEK_DISPLAY_NAME) {
            return DTEK_DISPLAY_NAME.to_string();
        }
        self.provider_name.clone()
    }

    /// Localized display name for an event's kind.
    pub fn event_summary(&self, event: &OutageEvent) -> &'static str {
        match event.kind() {
            OutageKind::Emergency => self.translations.get(TranslationKey::EmergencyOutageEvent),
            _ => self.translations.get(TranslationKey::PlannedOutageEvent),
        }
    }

    /// Resolves one fact by identifier.
    pub fn resolve(&self, id: FactId, now: DateTime<Utc>) -> FactValue {
        match id {
            FactId::CurrentState => FactValue::State(self.current_state(now)),
            FactId::CurrentDayStatus => self
                .current_day_status(now)
                .map_or(FactValue::Unknown, FactValue::DayStatus),
            FactId::NextOutageType => self
                .next_outage_type(now)
                .map_or(FactValue::Unknown, FactValue::OutageType),
            FactId::ScheduleUpdatedOn => self
                .schedule_updated_on()
                .map_or(FactValue::Unknown, FactValue::Timestamp),
            FactId::NextPlannedOutage => self
                .next_planned_outage(now)
                .map_or(FactValue::Unknown, FactValue::Timestamp),
            FactId::NextConnectivity => self
                .next_connectivity(now)
                .map_or(FactValue::Unknown, FactValue::Timestamp),
            FactId::NextPlannedReconnection => self
                .next_planned_reconnection(now)
                .map_or(FactValue::Unknown, FactValue::Timestamp),
            FactId::NextPlannedOutageStartTime => self
                .next_planned_outage_start_time(now)
                .map_or(FactValue::Unknown, FactValue::Text),
            FactId::NextPlannedOutageEndTime => self
                .next_planned_outage_end_time(now)
                .map_or(FactValue::Unknown, FactValue::Text),
            FactId::NextPlannedOutageDuration => self
                .next_planned_outage_duration(now)
                .map_or(FactValue::Unknown, FactValue::Minutes),
            FactId::TimeUntilConnectivity => self
                .time_until_connectivity(now)
                .map_or(FactValue::Unknown, FactValue::Text),
            FactId::TimeUntilOutage => self
                .time_until_outage(now)
                .map_or(FactValue::Unknown, FactValue::Text),
        }
    }
}
