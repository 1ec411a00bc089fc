//! Local calendar date helpers and timestamp parsing.
//!
//! Everything here works in a single caller-supplied timezone. Boundaries are
//! computed on naive local datetimes first and only then resolved to instants,
//! so DST transitions are handled in one place.

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Timelike, Utc,
};
use chrono_tz::Tz;

use crate::error::{CoreError, CoreResult};

/// Step used to walk forward out of a DST gap.
const GAP_STEP_MINUTES: i64 = 15;

/// Largest DST gap we walk across before giving up.
const MAX_GAP_STEPS: i64 = 4 * 24;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Resolve a naive local datetime to an instant in `tz`.
///
/// Ambiguous times (DST fall-back) resolve to the earlier instant. Times inside
/// a DST gap resolve to the first valid instant after the gap.
pub fn resolve_local(tz: Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    for step in 0..=MAX_GAP_STEPS {
        let candidate = naive.checked_add_signed(Duration::minutes(step * GAP_STEP_MINUTES))?;
        match tz.from_local_datetime(&candidate) {
            LocalResult::Single(dt) => return Some(dt),
            LocalResult::Ambiguous(earliest, _) => return Some(earliest),
            LocalResult::None => continue,
        }
    }
    None
}

/// Local midnight at the start of `date`.
pub fn start_of_day(tz: Tz, date: NaiveDate) -> Option<DateTime<Tz>> {
    resolve_local(tz, date.and_time(NaiveTime::MIN))
}

/// The last millisecond of `date` in local time (23:59:59.999 on ordinary days).
pub fn end_of_day(tz: Tz, date: NaiveDate) -> Option<DateTime<Tz>> {
    let next = date.succ_opt()?;
    let next_start = start_of_day(tz, next)?;
    Some(next_start - Duration::milliseconds(1))
}

/// The Sunday on or before `date`, or `None` before the earliest representable Sunday.
pub fn start_of_week(date: NaiveDate) -> Option<NaiveDate> {
    let offset = date.weekday().num_days_from_sunday() as i64;
    date.checked_sub_signed(Duration::days(offset))
}

pub fn first_day_of_month(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)
}

pub fn last_day_of_month(date: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if date.month() == 12 {
        (date.year().checked_add(1)?, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)?.pred_opt()
}

/// Shift a date by whole months, clamping the day to the target month's length.
pub fn add_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let total = date.year() as i64 * 12 + date.month0() as i64 + months as i64;
    let year = i32::try_from(total.div_euclid(12)).ok()?;
    let month0 = total.rem_euclid(12) as u32;
    let first = NaiveDate::from_ymd_opt(year, month0 + 1, 1)?;
    let last = last_day_of_month(first)?;
    first.with_day(date.day().min(last.day()))
}

/// Parse a calendar date. Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp,
/// in which case the timestamp's own date component is used.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Parse a timestamp into an absolute instant.
///
/// - RFC 3339 strings carry their own offset.
/// - Naive `YYYY-MM-DDTHH:MM[:SS[.fff]]` strings are local time in `tz`.
/// - A bare `YYYY-MM-DD` is local midnight in `tz`.
pub fn parse_timestamp(s: &str, tz: Tz) -> CoreResult<DateTime<Utc>> {
    let trimmed = s.trim();
    let invalid = || CoreError::InvalidTimestamp(s.to_string());

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
        .ok_or_else(invalid)?;

    resolve_local(tz, naive)
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(invalid)
}

/// Parse an IANA timezone name.
pub fn parse_timezone(name: &str) -> CoreResult<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| CoreError::UnknownTimezone(name.to_string()))
}

/// The host's local timezone, falling back to UTC when it can't be determined.
pub fn host_timezone() -> Tz {
    match iana_time_zone::get_timezone() {
        Ok(name) => parse_timezone(&name).unwrap_or_else(|_| {
            tracing::warn!(timezone = %name, "host timezone not recognised; using UTC");
            Tz::UTC
        }),
        Err(error) => {
            tracing::warn!(%error, "could not determine host timezone; using UTC");
            Tz::UTC
        }
    }
}

/// Hours since local midnight to minute precision (e.g. 10:30 -> 10.5).
pub fn fractional_hour<T: TimeZone>(dt: &DateTime<T>) -> f64 {
    let time = dt.time();
    time.hour() as f64 + time.minute() as f64 / 60.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn start_of_week_is_sunday() {
        let wednesday = date(2025, 4, 16);
        assert_eq!(start_of_week(wednesday), Some(date(2025, 4, 13)));
        assert_eq!(start_of_week(date(2025, 4, 13)), Some(date(2025, 4, 13)));
        assert_eq!(
            start_of_week(date(2025, 4, 19)).map(|d| d.weekday()),
            Some(Weekday::Sun)
        );
    }

    #[test]
    fn start_of_week_before_min_date_is_none() {
        assert_eq!(NaiveDate::MIN.weekday(), Weekday::Thu);
        assert_eq!(start_of_week(NaiveDate::MIN), None);
    }

    #[test]
    fn month_boundaries() {
        assert_eq!(first_day_of_month(date(2025, 4, 16)), Some(date(2025, 4, 1)));
        assert_eq!(last_day_of_month(date(2025, 4, 16)), Some(date(2025, 4, 30)));
        assert_eq!(last_day_of_month(date(2024, 2, 3)), Some(date(2024, 2, 29)));
        assert_eq!(last_day_of_month(date(2025, 12, 31)), Some(date(2025, 12, 31)));
    }

    #[test]
    fn add_months_clamps_day() {
        assert_eq!(add_months(date(2025, 1, 31), 1), Some(date(2025, 2, 28)));
        assert_eq!(add_months(date(2025, 3, 15), -3), Some(date(2024, 12, 15)));
        assert_eq!(add_months(date(2025, 11, 30), 2), Some(date(2026, 1, 30)));
    }

    #[test]
    fn end_of_day_is_last_millisecond() {
        let end = end_of_day(Tz::UTC, date(2025, 4, 7)).unwrap();
        assert_eq!(
            end.naive_local(),
            date(2025, 4, 7).and_hms_milli_opt(23, 59, 59, 999).unwrap()
        );
    }

    #[test]
    fn midnight_in_dst_gap_moves_forward() {
        // Santiago springs forward at local midnight.
        let tz: Tz = "America/Santiago".parse().unwrap();
        let start = start_of_day(tz, date(2024, 9, 8)).unwrap();
        assert_eq!(start.naive_local(), date(2024, 9, 8).and_hms_opt(1, 0, 0).unwrap());
    }

    #[test]
    fn parse_timestamp_accepts_common_shapes() {
        let tz: Tz = "America/New_York".parse().unwrap();

        let rfc = parse_timestamp("2025-04-10T14:00:00.000Z", tz).unwrap();
        assert_eq!(rfc, Utc.with_ymd_and_hms(2025, 4, 10, 14, 0, 0).unwrap());

        let naive = parse_timestamp("2025-04-10T10:00", tz).unwrap();
        assert_eq!(naive, Utc.with_ymd_and_hms(2025, 4, 10, 14, 0, 0).unwrap());

        let spaced = parse_timestamp("2025-04-10 10:00:00", tz).unwrap();
        assert_eq!(spaced, naive);

        let bare = parse_timestamp("2025-04-10", tz).unwrap();
        assert_eq!(bare, Utc.with_ymd_and_hms(2025, 4, 10, 4, 0, 0).unwrap());
    }

    #[test]
    fn parse_timestamp_rejects_garbage() {
        let err = parse_timestamp("next tuesday", Tz::UTC).unwrap_err();
        assert!(matches!(err, CoreError::InvalidTimestamp(s) if s == "next tuesday"));
    }

    #[test]
    fn parse_date_accepts_rfc3339() {
        assert_eq!(parse_date("2025-04-16"), Some(date(2025, 4, 16)));
        assert_eq!(parse_date("2025-04-16T08:00:00+02:00"), Some(date(2025, 4, 16)));
        assert_eq!(parse_date("16/04/2025"), None);
    }

    #[test]
    fn unknown_timezone_is_an_error() {
        assert!(parse_timezone("Europe/Stockholm").is_ok());
        assert!(matches!(
            parse_timezone("Mars/Olympus_Mons"),
            Err(CoreError::UnknownTimezone(_))
        ));
    }

    #[test]
    fn fractional_hour_includes_minutes() {
        let dt = Utc.with_ymd_and_hms(2025, 4, 10, 10, 30, 0).unwrap();
        assert_eq!(fractional_hour(&dt), 10.5);
    }
}
