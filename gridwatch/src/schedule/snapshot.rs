//! Group snapshot: the parsed form of one fetched schedule.

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use tracing::warn;

use super::event::{DayStatus, OutageEvent, OutageKind};
use crate::api::RawGroupSchedule;

/// Errors that can occur while parsing a raw schedule payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A required timestamp field did not parse as RFC 3339.
    #[error("Invalid {field} timestamp: {value}")]
    InvalidTimestamp { field: &'static str, value: String },
}

/// One day's worth of schedule data.
///
/// A missing day in a snapshot means "no data for that date", which is
/// distinct from a present day with no events ("confirmed no outages").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySchedule {
    date: NaiveDate,
    status: Option<DayStatus>,
    events: Vec<OutageEvent>,
}

impl DaySchedule {
    /// Creates a new day record.
    pub fn new(date: NaiveDate, status: Option<DayStatus>, events: Vec<OutageEvent>) -> Self {
        Self {
            date,
            status,
            events,
        }
    }

    /// Calendar date this record covers (provider-local).
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Day-level status tag, if the utility published one.
    pub fn status(&self) -> Option<&DayStatus> {
        self.status.as_ref()
    }

    /// Outage intervals attached to this day.
    ///
    /// An interval may span past the day's own date; it still lives on the
    /// day record that announced it.
    pub fn events(&self) -> &[OutageEvent] {
        &self.events
    }
}

/// The full fetched schedule for one (region, provider, group) tuple.
///
/// Replaced wholesale on each successful fetch, never partially merged.
/// Owned exclusively by the [`ScheduleStore`](super::store::ScheduleStore);
/// readers hold it through an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSnapshot {
    days: Vec<DaySchedule>,
    updated_on: DateTime<Utc>,
}

impl GroupSnapshot {
    /// Creates a snapshot from already-parsed day records.
    ///
    /// Days are ordered ascending by date. A duplicate calendar date keeps
    /// the first record and drops the rest with a warning.
    pub fn new(mut days: Vec<DaySchedule>, updated_on: DateTime<Utc>) -> Self {
        days.sort_by_key(|day| day.date);
        days.dedup_by(|later, earlier| {
            let duplicate = later.date == earlier.date;
            if duplicate {
                warn!(date = %later.date, "Duplicate day in schedule payload, keeping first");
            }
            duplicate
        });
        Self { days, updated_on }
    }

    /// Parses a raw schedule payload.
    ///
    /// Malformed days and intervals (unparseable date, bad boundary, empty
    /// interval) are skipped with a warning; only a missing or unparseable
    /// `updatedOn` fails the whole payload.
    pub fn from_raw(raw: &RawGroupSchedule) -> Result<Self, ParseError> {
        let updated_on =
            parse_instant(&raw.updated_on).ok_or_else(|| ParseError::InvalidTimestamp {
                field: "updatedOn",
                value: raw.updated_on.clone(),
            })?;

        let mut days = Vec::with_capacity(raw.days.len());
        for raw_day in &raw.days {
            let Ok(date) = NaiveDate::parse_from_str(&raw_day.date, "%Y-%m-%d") else {
                warn!(date = %raw_day.date, "Skipping day with unparseable date");
                continue;
            };

            let status = raw_day.status.as_deref().map(DayStatus::from_wire);

            let mut events = Vec::with_capacity(raw_day.intervals.len());
            for interval in &raw_day.intervals {
                let (Some(start), Some(end)) =
                    (parse_instant(&interval.start), parse_instant(&interval.end))
                else {
                    warn!(
                        date = %date,
                        start = %interval.start,
                        end = %interval.end,
                        "Skipping interval with unparseable boundary"
                    );
                    continue;
                };

                match OutageEvent::new(start, end, OutageKind::from_wire(&interval.kind)) {
                    Ok(event) => events.push(event),
                    Err(error) => {
                        warn!(date = %date, error = %error, "Skipping invalid interval");
                    }
                }
            }

            days.push(DaySchedule::new(date, status, events));
        }

        Ok(Self::new(days, updated_on))
    }

    /// When the utility last revised this schedule.
    pub fn updated_on(&self) -> DateTime<Utc> {
        self.updated_on
    }

    /// Day records, ascending by date.
    pub fn days(&self) -> &[DaySchedule] {
        &self.days
    }

    /// All events whose `[start, end)` intersects `[from, until)`,
    /// ascending by start.
    pub fn events_between(&self, from: DateTime<Utc>, until: DateTime<Utc>) -> Vec<OutageEvent> {
        let mut events: Vec<OutageEvent> = self
            .days
            .iter()
            .flat_map(|day| day.events())
            .filter(|event| event.intersects(from, until))
            .cloned()
            .collect();
        // Day order alone is not enough: a multi-day interval lives on the
        // day that announced it, which can be later than its start.
        events.sort_by_key(OutageEvent::start);
        events
    }

    /// Day-level status for a calendar date.
    ///
    /// `None` covers both "no record for this date" and "record without a
    /// published status".
    pub fn day_status(&self, date: NaiveDate) -> Option<DayStatus> {
        self.days
            .iter()
            .find(|day| day.date == date)
            .and_then(|day| day.status.clone())
    }
}

fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn raw(body: &str) -> RawGroupSchedule {
        serde_json::from_str(body).unwrap()
    }

    fn kyiv(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        // +03:00 summer offset, expressed directly in UTC
        Utc.with_ymd_and_hms(2026, 8, day, hour - 3, minute, 0)
            .unwrap()
    }

    #[test]
    fn from_raw_parses_days_and_intervals() {
        let snapshot = GroupSnapshot::from_raw(&raw(
            r#"{
                "updatedOn": "2026-08-05T12:30:00+03:00",
                "days": [
                    {"date": "2026-08-05", "status": "ScheduleApplies",
                     "intervals": [{"start": "2026-08-05T09:00:00+03:00",
                                    "end": "2026-08-05T12:30:00+03:00",
                                    "type": "Definite"}]},
                    {"date": "2026-08-06", "status": "EmergencyShutdowns", "intervals": []}
                ]
            }"#,
        ))
        .unwrap();

        assert_eq!(snapshot.days().len(), 2);
        let day = &snapshot.days()[0];
        assert_eq!(day.date(), NaiveDate::from_ymd_opt(2026, 8, 5).unwrap());
        assert_eq!(day.status(), Some(&DayStatus::ScheduleApplies));
        assert_eq!(day.events().len(), 1);
        assert_eq!(day.events()[0].start(), kyiv(5, 9, 0));
        assert_eq!(day.events()[0].kind(), &OutageKind::Planned);
    }

    #[test]
    fn from_raw_rejects_bad_updated_on() {
        let result = GroupSnapshot::from_raw(&raw(r#"{"updatedOn": "yesterday", "days": []}"#));
        assert_eq!(
            result,
            Err(ParseError::InvalidTimestamp {
                field: "updatedOn",
                value: "yesterday".to_string(),
            })
        );
    }

    #[test]
    fn from_raw_skips_malformed_entries() {
        let snapshot = GroupSnapshot::from_raw(&raw(
            r#"{
                "updatedOn": "2026-08-05T12:30:00+03:00",
                "days": [
                    {"date": "not-a-date", "intervals": []},
                    {"date": "2026-08-05", "intervals": [
                        {"start": "soon", "end": "2026-08-05T12:00:00+03:00", "type": "Definite"},
                        {"start": "2026-08-05T12:00:00+03:00",
                         "end": "2026-08-05T10:00:00+03:00", "type": "Definite"},
                        {"start": "2026-08-05T14:00:00+03:00",
                         "end": "2026-08-05T16:00:00+03:00", "type": "Definite"}
                    ]}
                ]
            }"#,
        ))
        .unwrap();

        // Bad date dropped, bad intervals dropped, good interval kept
        assert_eq!(snapshot.days().len(), 1);
        assert_eq!(snapshot.days()[0].events().len(), 1);
        assert_eq!(snapshot.days()[0].events()[0].start(), kyiv(5, 14, 0));
    }

    #[test]
    fn duplicate_dates_keep_first_record() {
        let first = DaySchedule::new(
            NaiveDate::from_ymd_opt(2026, 8, 5).unwrap(),
            Some(DayStatus::ScheduleApplies),
            vec![],
        );
        let second = DaySchedule::new(
            NaiveDate::from_ymd_opt(2026, 8, 5).unwrap(),
            Some(DayStatus::EmergencyShutdowns),
            vec![],
        );
        let snapshot = GroupSnapshot::new(vec![first, second], Utc::now());

        assert_eq!(snapshot.days().len(), 1);
        assert_eq!(
            snapshot.day_status(NaiveDate::from_ymd_opt(2026, 8, 5).unwrap()),
            Some(DayStatus::ScheduleApplies)
        );
    }

    #[test]
    fn events_between_orders_multi_day_spans_by_start() {
        // The emergency interval spans two days and is announced on the
        // second day's record, so day order alone would misplace it.
        let snapshot = GroupSnapshot::from_raw(&raw(
            r#"{
                "updatedOn": "2026-08-05T12:30:00+03:00",
                "days": [
                    {"date": "2026-08-05", "intervals": [
                        {"start": "2026-08-05T10:00:00+03:00",
                         "end": "2026-08-05T12:00:00+03:00", "type": "Definite"}
                    ]},
                    {"date": "2026-08-06", "intervals": [
                        {"start": "2026-08-05T23:00:00+03:00",
                         "end": "2026-08-06T02:00:00+03:00", "type": "Emergency"},
                        {"start": "2026-08-06T09:00:00+03:00",
                         "end": "2026-08-06T11:00:00+03:00", "type": "Definite"}
                    ]}
                ]
            }"#,
        ))
        .unwrap();

        let events = snapshot.events_between(kyiv(5, 9, 0), kyiv(6, 12, 0));
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].start(), kyiv(5, 10, 0));
        assert_eq!(events[1].start(), kyiv(5, 23, 0));
        assert_eq!(events[2].start(), kyiv(6, 9, 0));
    }

    #[test]
    fn events_between_excludes_non_intersecting() {
        let snapshot = GroupSnapshot::from_raw(&raw(
            r#"{
                "updatedOn": "2026-08-05T12:30:00+03:00",
                "days": [
                    {"date": "2026-08-05", "intervals": [
                        {"start": "2026-08-05T09:00:00+03:00",
                         "end": "2026-08-05T11:00:00+03:00", "type": "Definite"}
                    ]}
                ]
            }"#,
        ))
        .unwrap();

        assert!(snapshot.events_between(kyiv(5, 11, 0), kyiv(5, 12, 0)).is_empty());
        assert_eq!(snapshot.events_between(kyiv(5, 10, 0), kyiv(5, 12, 0)).len(), 1);
    }

    #[test]
    fn day_status_distinguishes_missing_data() {
        let snapshot = GroupSnapshot::from_raw(&raw(
            r#"{
                "updatedOn": "2026-08-05T12:30:00+03:00",
                "days": [
                    {"date": "2026-08-05", "status": "ScheduleApplies", "intervals": []},
                    {"date": "2026-08-06", "intervals": []}
                ]
            }"#,
        ))
        .unwrap();

        assert_eq!(
            snapshot.day_status(NaiveDate::from_ymd_opt(2026, 8, 5).unwrap()),
            Some(DayStatus::ScheduleApplies)
        );
        // Present day without a published status
        assert_eq!(
            snapshot.day_status(NaiveDate::from_ymd_opt(2026, 8, 6).unwrap()),
            None
        );
        // Absent day
        assert_eq!(
            snapshot.day_status(NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()),
            None
        );
    }
}
