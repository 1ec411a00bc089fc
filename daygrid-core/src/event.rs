//! Calendar event types.
//!
//! The event store hands us flat `EventRecord`s (string timestamps plus an
//! all-day flag). They are validated into `Event`s whose `EventSpan` is either
//! instant-based or date-based, so the rest of the crate never compares a
//! raw instant against a bare date.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::datetime::{end_of_day, parse_timestamp, start_of_day};
use crate::error::CoreResult;

/// An event as persisted by the event store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub id: String,
    pub owner_id: String,
    #[serde(default)]
    pub title: String,
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub all_day: bool,
}

/// When an event happens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventSpan {
    /// Clock-based event between two instants.
    Timed {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    /// Date-based event covering every day from `start` through `end` (inclusive).
    AllDay { start: NaiveDate, end: NaiveDate },
}

impl EventSpan {
    pub fn is_all_day(&self) -> bool {
        matches!(self, EventSpan::AllDay { .. })
    }

    /// A span is well formed when it does not end before it starts.
    /// Zero-length spans are allowed.
    pub fn is_well_formed(&self) -> bool {
        match self {
            EventSpan::Timed { start, end } => start <= end,
            EventSpan::AllDay { start, end } => start <= end,
        }
    }

    /// The instant the span starts. All-day spans start at local midnight.
    pub fn start_instant(&self, tz: Tz) -> Option<DateTime<Utc>> {
        match self {
            EventSpan::Timed { start, .. } => Some(*start),
            EventSpan::AllDay { start, .. } => {
                start_of_day(tz, *start).map(|dt| dt.with_timezone(&Utc))
            }
        }
    }

    /// The instant the span ends. All-day spans end at the last millisecond of their end date.
    pub fn end_instant(&self, tz: Tz) -> Option<DateTime<Utc>> {
        match self {
            EventSpan::Timed { end, .. } => Some(*end),
            EventSpan::AllDay { end, .. } => end_of_day(tz, *end).map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

/// A validated calendar event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub span: EventSpan,
}

impl Event {
    pub fn timed(id: &str, owner_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Event {
            id: id.to_string(),
            owner_id: owner_id.to_string(),
            title: String::new(),
            span: EventSpan::Timed { start, end },
        }
    }

    pub fn all_day(id: &str, owner_id: &str, start: NaiveDate, end: NaiveDate) -> Self {
        Event {
            id: id.to_string(),
            owner_id: owner_id.to_string(),
            title: String::new(),
            span: EventSpan::AllDay { start, end },
        }
    }

    /// Build an event from a persisted record.
    ///
    /// All-day records keep only the local calendar date of each timestamp.
    /// Ordering of start and end is not checked here; see `is_well_formed`.
    pub fn from_record(record: &EventRecord, tz: Tz) -> CoreResult<Self> {
        let start = parse_timestamp(&record.start, tz)?;
        let end = parse_timestamp(&record.end, tz)?;

        let span = if record.all_day {
            EventSpan::AllDay {
                start: start.with_timezone(&tz).date_naive(),
                end: end.with_timezone(&tz).date_naive(),
            }
        } else {
            EventSpan::Timed { start, end }
        };

        Ok(Event {
            id: record.id.clone(),
            owner_id: record.owner_id.clone(),
            title: record.title.clone(),
            span,
        })
    }

    pub fn is_well_formed(&self) -> bool {
        self.span.is_well_formed()
    }

    pub fn is_all_day(&self) -> bool {
        self.span.is_all_day()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.title.is_empty() {
            write!(f, "(No title)")
        } else {
            write!(f, "{}", self.title)
        }
    }
}

/// Convert a batch of records, skipping any that fail to parse.
pub fn parse_records(records: &[EventRecord], tz: Tz) -> Vec<Event> {
    records
        .iter()
        .filter_map(|record| match Event::from_record(record, tz) {
            Ok(event) => Some(event),
            Err(error) => {
                tracing::warn!(id = %record.id, %error, "skipping unparsable event record");
                None
            }
        })
        .collect()
}
