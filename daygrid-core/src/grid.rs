//! Vertical placement of timed events in an hourly day grid.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::datetime::fractional_hour;
use crate::error::{CoreError, CoreResult};
use crate::event::{Event, EventSpan};
use crate::membership::events_in_window;
use crate::window::{Window, WindowKind};

/// Visible hour band of a day or week grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridConfig {
    first_hour: u32,
    last_hour: u32,
    pixels_per_hour: f64,
}

impl GridConfig {
    /// 7am to 8pm, one pixel per minute.
    pub const DAY_VIEW: GridConfig = GridConfig {
        first_hour: 7,
        last_hour: 20,
        pixels_per_hour: 60.0,
    };

    /// 8am to 7pm, one pixel per minute.
    pub const WEEK_VIEW: GridConfig = GridConfig {
        first_hour: 8,
        last_hour: 19,
        pixels_per_hour: 60.0,
    };

    pub fn new(first_hour: u32, last_hour: u32, pixels_per_hour: f64) -> CoreResult<Self> {
        if first_hour >= last_hour {
            return Err(CoreError::InvalidGridConfig(format!(
                "first hour {first_hour} must be before last hour {last_hour}"
            )));
        }
        if last_hour > 24 {
            return Err(CoreError::InvalidGridConfig(format!(
                "last hour {last_hour} is past the end of the day"
            )));
        }
        if !pixels_per_hour.is_finite() || pixels_per_hour <= 0.0 {
            return Err(CoreError::InvalidGridConfig(format!(
                "pixels per hour must be positive, got {pixels_per_hour}"
            )));
        }

        Ok(GridConfig {
            first_hour,
            last_hour,
            pixels_per_hour,
        })
    }

    /// Default grid for a view: day and month use the day grid, week the narrower one.
    pub fn for_view(kind: WindowKind) -> Self {
        match kind {
            WindowKind::Week => Self::WEEK_VIEW,
            WindowKind::Day | WindowKind::Month => Self::DAY_VIEW,
        }
    }

    pub fn first_hour(&self) -> u32 {
        self.first_hour
    }

    pub fn last_hour(&self) -> u32 {
        self.last_hour
    }

    pub fn pixels_per_hour(&self) -> f64 {
        self.pixels_per_hour
    }

    /// Height of the whole visible band.
    pub fn total_height(&self) -> f64 {
        (self.last_hour - self.first_hour) as f64 * self.pixels_per_hour
    }

    /// Place a span on the grid.
    ///
    /// Both ends are clamped into the visible band, so `top` lies in
    /// `[0, total_height]` and `top + height` never exceeds `total_height`.
    /// Spans outside the band get `height <= 0`; callers skip those. An end on a
    /// later local date than the start is treated as the bottom of the grid.
    pub fn position(&self, start: DateTime<Utc>, end: DateTime<Utc>, tz: Tz) -> GridPosition {
        let start_local = start.with_timezone(&tz);
        let end_local = end.with_timezone(&tz);

        let first = self.first_hour as f64;
        let last = self.last_hour as f64;
        let total = self.total_height();

        let start_hour = fractional_hour(&start_local);
        let end_hour = if end_local.date_naive() > start_local.date_naive() {
            last
        } else {
            fractional_hour(&end_local)
        };

        let top = ((start_hour - first) * self.pixels_per_hour).clamp(0.0, total);
        let height = ((end_hour.min(last) - start_hour.max(first)) * self.pixels_per_hour)
            .min(total - top);

        GridPosition::new(top, height, self.pixels_per_hour)
    }

    /// Place an event on the grid. All-day events have no grid position.
    pub fn position_event(&self, event: &Event, tz: Tz) -> Option<GridPosition> {
        match &event.span {
            EventSpan::Timed { start, end } => Some(self.position(*start, *end, tz)),
            EventSpan::AllDay { .. } => None,
        }
    }
}

/// Where an event sits in the grid, in pixels from the top of the visible band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridPosition {
    pub top: f64,
    pub height: f64,
    pub top_offset_minutes: f64,
    pub duration_minutes: f64,
}

impl GridPosition {
    fn new(top: f64, height: f64, pixels_per_hour: f64) -> Self {
        let minutes_per_pixel = 60.0 / pixels_per_hour;
        GridPosition {
            top,
            height,
            top_offset_minutes: top * minutes_per_pixel,
            duration_minutes: height * minutes_per_pixel,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.height > 0.0
    }
}

/// An event placed in a single day column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlacedEvent<'a> {
    pub event: &'a Event,
    pub position: GridPosition,
}

/// Lay out the timed events of one day column.
///
/// Events that began on an earlier date start at the top of the column, events
/// that continue past the date run to the bottom. All-day events and anything
/// outside the visible band are left out. Order follows `events_in_window`.
pub fn layout_day<'a>(
    day: NaiveDate,
    events: &'a [Event],
    grid: &GridConfig,
    tz: Tz,
) -> CoreResult<Vec<PlacedEvent<'a>>> {
    let window = Window::new(WindowKind::Day, day, tz)?;
    let day_start = window.start_utc();
    let day_end = window.end_utc();

    let placed = events_in_window(&window, events)
        .into_iter()
        .filter_map(|event| match &event.span {
            EventSpan::Timed { start, end } => {
                let start = (*start).max(day_start);
                let end = (*end).min(day_end);
                let position = grid.position(start, end, tz);
                position.is_visible().then_some(PlacedEvent { event, position })
            }
            EventSpan::AllDay { .. } => None,
        })
        .collect();

    Ok(placed)
}
