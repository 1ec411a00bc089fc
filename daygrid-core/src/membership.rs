//! Which events occur inside a window.
//!
//! An event occurs in a window when it starts inside it, ends inside it, or
//! starts before and ends after it. Bounds are inclusive. Timed events are
//! compared as instants; all-day events are compared as calendar dates.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;

use crate::error::CoreResult;
use crate::event::{Event, EventSpan};
use crate::window::Window;

/// Inclusive three-clause overlap test shared by instants and dates.
fn overlaps<T: PartialOrd>(start: T, end: T, window_start: T, window_end: T) -> bool {
    let starts_inside = start >= window_start && start <= window_end;
    let ends_inside = end >= window_start && end <= window_end;
    let spans_window = start < window_start && end > window_end;
    starts_inside || ends_inside || spans_window
}

/// Whether `event` occurs anywhere inside `window`. Malformed events never do.
pub fn occurs_within(event: &Event, window: &Window) -> bool {
    if !event.is_well_formed() {
        return false;
    }

    match &event.span {
        EventSpan::Timed { start, end } => {
            overlaps(*start, *end, window.start_utc(), window.end_utc())
        }
        EventSpan::AllDay { start, end } => {
            overlaps(*start, *end, window.first_day(), window.last_day())
        }
    }
}

/// Events occurring in `window`, ordered by start time.
///
/// Malformed events (ending before they start) are skipped. Each event id is
/// returned at most once; the first occurrence wins. Ties keep input order.
pub fn events_in_window<'a>(window: &Window, events: &'a [Event]) -> Vec<&'a Event> {
    let tz = window.timezone();
    let mut seen = HashSet::new();

    let mut matching: Vec<&Event> = events
        .iter()
        .filter(|event| {
            if !event.is_well_formed() {
                tracing::debug!(id = %event.id, "skipping event that ends before it starts");
                return false;
            }
            occurs_within(event, window)
        })
        .filter(|&event| seen.insert(event.id.as_str()))
        .collect();

    matching.sort_by_key(|event| event.span.start_instant(tz));

    tracing::debug!(
        kind = %window.kind(),
        anchor = %window.anchor(),
        total = events.len(),
        matched = matching.len(),
        "evaluated window membership"
    );

    matching
}

/// Events occurring on each day of `window`.
///
/// Every day in the window gets an entry, possibly empty. A multi-day event
/// appears under each day it touches.
pub fn bucket_by_day<'a>(
    window: &Window,
    events: &'a [Event],
) -> CoreResult<BTreeMap<NaiveDate, Vec<&'a Event>>> {
    let candidates = events_in_window(window, events);
    let mut buckets = BTreeMap::new();

    for date in window.days() {
        let day = window.day(date)?;
        let on_day: Vec<&Event> = candidates
            .iter()
            .copied()
            .filter(|event| occurs_within(event, &day))
            .collect();
        buckets.insert(date, on_day);
    }

    Ok(buckets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::WindowKind;
    use chrono::{DateTime, TimeZone, Utc};
    use chrono_tz::Tz;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn timed(id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Event {
        Event::timed(id, "alice", start, end)
    }

    fn window(kind: WindowKind, y: i32, m: u32, d: u32) -> Window {
        Window::new(kind, date(y, m, d), Tz::UTC).unwrap()
    }

    fn ids<'a>(events: &[&'a Event]) -> Vec<&'a str> {
        events.iter().map(|&e| e.id.as_str()).collect()
    }

    #[test]
    fn event_ending_inside_day_is_included() {
        let monday = window(WindowKind::Day, 2025, 4, 7);
        let overnight = timed("overnight", at(2025, 4, 6, 20, 0), at(2025, 4, 7, 1, 0));
        assert!(occurs_within(&overnight, &monday));
    }

    #[test]
    fn event_on_next_day_is_excluded() {
        let monday = window(WindowKind::Day, 2025, 4, 7);
        let tuesday = timed("tuesday", at(2025, 4, 8, 0, 30), at(2025, 4, 8, 1, 30));
        assert!(!occurs_within(&tuesday, &monday));
    }

    #[test]
    fn event_spanning_window_is_included_for_every_kind() {
        let april = timed("april", at(2025, 4, 1, 0, 0), at(2025, 4, 30, 0, 0));

        assert!(occurs_within(&april, &window(WindowKind::Week, 2025, 4, 16)));
        assert!(occurs_within(&april, &window(WindowKind::Day, 2025, 4, 16)));
        assert!(occurs_within(&april, &window(WindowKind::Month, 2025, 4, 16)));
    }

    #[test]
    fn boundaries_are_inclusive() {
        let monday = window(WindowKind::Day, 2025, 4, 7);

        let ends_at_midnight = timed("a", at(2025, 4, 6, 23, 0), at(2025, 4, 7, 0, 0));
        assert!(occurs_within(&ends_at_midnight, &monday));

        let starts_at_last_ms = timed(
            "b",
            monday.end_utc(),
            monday.end_utc() + chrono::Duration::hours(1),
        );
        assert!(occurs_within(&starts_at_last_ms, &monday));

        let starts_next_midnight = timed("c", at(2025, 4, 8, 0, 0), at(2025, 4, 8, 1, 0));
        assert!(!occurs_within(&starts_next_midnight, &monday));
    }

    #[test]
    fn all_day_events_compare_dates() {
        let monday = window(WindowKind::Day, 2025, 4, 7);

        let on_monday = Event::all_day("mon", "alice", date(2025, 4, 7), date(2025, 4, 7));
        let on_sunday = Event::all_day("sun", "alice", date(2025, 4, 6), date(2025, 4, 6));
        let weekend_to_wed = Event::all_day("span", "alice", date(2025, 4, 5), date(2025, 4, 9));

        assert!(occurs_within(&on_monday, &monday));
        assert!(!occurs_within(&on_sunday, &monday));
        assert!(occurs_within(&weekend_to_wed, &monday));
    }

    #[test]
    fn all_day_dates_ignore_window_timezone_offset() {
        // Dates are compared directly, so a far-east zone doesn't shift the day.
        let tz: Tz = "Pacific/Kiritimati".parse().unwrap();
        let monday = Window::new(WindowKind::Day, date(2025, 4, 7), tz).unwrap();
        let on_monday = Event::all_day("mon", "alice", date(2025, 4, 7), date(2025, 4, 7));
        assert!(occurs_within(&on_monday, &monday));
    }

    #[test]
    fn results_are_sorted_and_unique() {
        let week = window(WindowKind::Week, 2025, 4, 16);
        let events = vec![
            timed("late", at(2025, 4, 18, 9, 0), at(2025, 4, 18, 10, 0)),
            timed("early", at(2025, 4, 14, 9, 0), at(2025, 4, 14, 10, 0)),
            timed("late", at(2025, 4, 18, 9, 0), at(2025, 4, 18, 10, 0)),
            timed("outside", at(2025, 4, 21, 9, 0), at(2025, 4, 21, 10, 0)),
            Event::all_day("holiday", "alice", date(2025, 4, 14), date(2025, 4, 14)),
        ];

        let result = events_in_window(&week, &events);
        assert_eq!(ids(&result), vec!["holiday", "early", "late"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let day = window(WindowKind::Day, 2025, 4, 7);
        let events = vec![
            timed("second", at(2025, 4, 7, 9, 0), at(2025, 4, 7, 10, 0)),
            timed("first", at(2025, 4, 7, 8, 0), at(2025, 4, 7, 9, 0)),
            timed("third", at(2025, 4, 7, 9, 0), at(2025, 4, 7, 9, 30)),
        ];

        let result = events_in_window(&day, &events);
        assert_eq!(ids(&result), vec!["first", "second", "third"]);
    }

    #[test]
    fn malformed_events_are_skipped() {
        let day = window(WindowKind::Day, 2025, 4, 10);
        let events = vec![
            timed("valid-1", at(2025, 4, 10, 8, 0), at(2025, 4, 10, 9, 0)),
            timed("backwards", at(2025, 4, 10, 10, 0), at(2025, 4, 10, 9, 0)),
            timed("valid-2", at(2025, 4, 10, 11, 0), at(2025, 4, 10, 12, 0)),
        ];

        let result = events_in_window(&day, &events);
        assert_eq!(ids(&result), vec!["valid-1", "valid-2"]);
    }

    #[test]
    fn empty_input_gives_empty_result() {
        let day = window(WindowKind::Day, 2025, 4, 10);
        assert!(events_in_window(&day, &[]).is_empty());
    }

    #[test]
    fn input_is_not_mutated() {
        let day = window(WindowKind::Day, 2025, 4, 10);
        let events = vec![
            timed("b", at(2025, 4, 10, 11, 0), at(2025, 4, 10, 12, 0)),
            timed("a", at(2025, 4, 10, 8, 0), at(2025, 4, 10, 9, 0)),
        ];
        let before = events.clone();

        let _ = events_in_window(&day, &events);
        assert_eq!(events, before);
    }

    #[test]
    fn buckets_cover_every_day() {
        let week = window(WindowKind::Week, 2025, 4, 16);
        let events = vec![
            timed("trip", at(2025, 4, 14, 18, 0), at(2025, 4, 16, 9, 0)),
            Event::all_day("fair", "alice", date(2025, 4, 19), date(2025, 4, 20)),
        ];

        let buckets = bucket_by_day(&week, &events).unwrap();

        assert_eq!(buckets.len(), 7);
        assert!(buckets[&date(2025, 4, 13)].is_empty());
        assert_eq!(ids(&buckets[&date(2025, 4, 14)]), vec!["trip"]);
        assert_eq!(ids(&buckets[&date(2025, 4, 15)]), vec!["trip"]);
        assert_eq!(ids(&buckets[&date(2025, 4, 16)]), vec!["trip"]);
        assert!(buckets[&date(2025, 4, 17)].is_empty());
        assert_eq!(ids(&buckets[&date(2025, 4, 19)]), vec!["fair"]);
    }
}
