//! Terminal formatting for events and grid positions.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use daygrid_core::{Event, EventSpan, GridPosition};

/// Format a date as a human-readable label (e.g. "Today", "Tomorrow", "Wed Apr 16")
pub fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        _ => date.format("%a %b %-d").to_string(),
    }
}

fn clock(dt: DateTime<Utc>, tz: Tz) -> String {
    dt.with_timezone(&tz).format("%H:%M").to_string()
}

/// Time column for an event listed under `day` (e.g. "  15:00", "all-day", "   ...")
pub fn time_label(event: &Event, day: NaiveDate, tz: Tz) -> String {
    match &event.span {
        EventSpan::AllDay { .. } => "all-day".to_string(),
        EventSpan::Timed { start, .. } => {
            if start.with_timezone(&tz).date_naive() < day {
                format!("{:>7}", "...")
            } else {
                format!("{:>7}", clock(*start, tz))
            }
        }
    }
}

/// Clock range of a timed event (e.g. "09:00-10:30")
pub fn time_range(event: &Event, tz: Tz) -> String {
    match &event.span {
        EventSpan::AllDay { .. } => "all-day".to_string(),
        EventSpan::Timed { start, end } => format!("{}-{}", clock(*start, tz), clock(*end, tz)),
    }
}

/// Pixel geometry column for a placed event
pub fn geometry(position: &GridPosition) -> String {
    format!(
        "top {:>5.0}px  height {:>4.0}px",
        position.top, position.height
    )
}
