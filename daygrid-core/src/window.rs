//! Day, week, and month windows.
//!
//! A `Window` is an inclusive `[start, end]` range of instants derived from an
//! anchor date. Weeks run Sunday through Saturday. Months cover the calendar
//! month only; padding out to whole weeks for a month grid is `grid_days`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::datetime::{
    add_months, end_of_day, first_day_of_month, last_day_of_month, parse_date, start_of_day,
    start_of_week,
};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    Day,
    Week,
    Month,
}

impl WindowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WindowKind::Day => "day",
            WindowKind::Week => "week",
            WindowKind::Month => "month",
        }
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WindowKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(WindowKind::Day),
            "week" => Ok(WindowKind::Week),
            "month" => Ok(WindowKind::Month),
            _ => Err(CoreError::UnknownWindowKind(s.to_string())),
        }
    }
}

/// A bounded date range that events are tested against.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    kind: WindowKind,
    anchor: NaiveDate,
    tz: Tz,
    first_day: NaiveDate,
    last_day: NaiveDate,
    start: DateTime<Tz>,
    end: DateTime<Tz>,
}

impl Window {
    /// Build the window of `kind` containing `anchor`.
    pub fn new(kind: WindowKind, anchor: NaiveDate, tz: Tz) -> CoreResult<Self> {
        let out_of_range = || CoreError::InvalidAnchor(anchor.to_string());

        let (first_day, last_day) = match kind {
            WindowKind::Day => (anchor, anchor),
            WindowKind::Week => {
                let first = start_of_week(anchor).ok_or_else(out_of_range)?;
                let last = first
                    .checked_add_signed(Duration::days(6))
                    .ok_or_else(out_of_range)?;
                (first, last)
            }
            WindowKind::Month => (
                first_day_of_month(anchor).ok_or_else(out_of_range)?,
                last_day_of_month(anchor).ok_or_else(out_of_range)?,
            ),
        };

        let start = start_of_day(tz, first_day).ok_or_else(out_of_range)?;
        let end = end_of_day(tz, last_day).ok_or_else(out_of_range)?;

        Ok(Window {
            kind,
            anchor,
            tz,
            first_day,
            last_day,
            start,
            end,
        })
    }

    /// Build a window from an anchor string (`YYYY-MM-DD` or RFC 3339).
    pub fn parse(kind: WindowKind, anchor: &str, tz: Tz) -> CoreResult<Self> {
        let date = parse_date(anchor)
            .ok_or_else(|| CoreError::InvalidAnchor(anchor.to_string()))?;
        Self::new(kind, date, tz)
    }

    /// The window of `kind` containing today in `tz`.
    pub fn containing_today(kind: WindowKind, tz: Tz) -> CoreResult<Self> {
        let today = Utc::now().with_timezone(&tz).date_naive();
        Self::new(kind, today, tz)
    }

    /// A single-day window on `date` in the same timezone.
    pub fn day(&self, date: NaiveDate) -> CoreResult<Self> {
        Self::new(WindowKind::Day, date, self.tz)
    }

    /// Move `step` windows forward (or backward when negative).
    pub fn shift(&self, step: i32) -> CoreResult<Self> {
        let out_of_range = || CoreError::InvalidAnchor(self.anchor.to_string());
        let anchor = match self.kind {
            WindowKind::Day => self
                .anchor
                .checked_add_signed(Duration::days(step as i64))
                .ok_or_else(out_of_range)?,
            WindowKind::Week => self
                .anchor
                .checked_add_signed(Duration::weeks(step as i64))
                .ok_or_else(out_of_range)?,
            WindowKind::Month => add_months(self.anchor, step).ok_or_else(out_of_range)?,
        };
        Self::new(self.kind, anchor, self.tz)
    }

    pub fn kind(&self) -> WindowKind {
        self.kind
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn start(&self) -> DateTime<Tz> {
        self.start
    }

    pub fn end(&self) -> DateTime<Tz> {
        self.end
    }

    pub fn start_utc(&self) -> DateTime<Utc> {
        self.start.with_timezone(&Utc)
    }

    pub fn end_utc(&self) -> DateTime<Utc> {
        self.end.with_timezone(&Utc)
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    pub fn last_day(&self) -> NaiveDate {
        self.last_day
    }

    /// Every calendar date in the window, ascending.
    pub fn days(&self) -> Vec<NaiveDate> {
        self.first_day
            .iter_days()
            .take_while(|d| *d <= self.last_day)
            .collect()
    }

    /// Dates shown in a grid for this window. Months are padded to whole
    /// Sunday-first weeks; days and weeks are unchanged.
    pub fn grid_days(&self) -> Vec<NaiveDate> {
        if self.kind != WindowKind::Month {
            return self.days();
        }

        let grid_start = start_of_week(self.first_day).unwrap_or(self.first_day);
        let grid_end = start_of_week(self.last_day)
            .and_then(|d| d.checked_add_signed(Duration::days(6)))
            .unwrap_or(self.last_day);

        grid_start
            .iter_days()
            .take_while(|d| *d <= grid_end)
            .collect()
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.first_day && date <= self.last_day
    }

    /// Human-readable title, e.g. "Week 2025-04-13 - 2025-04-19".
    pub fn title(&self) -> String {
        match self.kind {
            WindowKind::Day => self.anchor.format("%A, %Y-%m-%d").to_string(),
            WindowKind::Week => format!(
                "Week {} - {}",
                self.first_day.format("%Y-%m-%d"),
                self.last_day.format("%Y-%m-%d")
            ),
            WindowKind::Month => self.anchor.format("%B %Y").to_string(),
        }
    }
}
