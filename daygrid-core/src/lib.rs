//! Core types for daygrid.
//!
//! This crate decides which calendar events occur in a day, week, or month
//! window and where timed events sit in an hourly grid:
//! - `window` builds the inclusive window for an anchor date
//! - `membership` filters and orders events against a window
//! - `grid` turns event times into pixel offsets and heights
//! - `store` is the seam to wherever event records are persisted

pub mod config;
pub mod datetime;
pub mod error;
pub mod event;
pub mod grid;
pub mod membership;
pub mod store;
pub mod window;

pub use error::{CoreError, CoreResult};
pub use event::{Event, EventRecord, EventSpan, parse_records};
pub use grid::{GridConfig, GridPosition, PlacedEvent, layout_day};
pub use membership::{bucket_by_day, events_in_window, occurs_within};
pub use store::{EventStore, JsonEventStore, MemoryEventStore};
pub use window::{Window, WindowKind};
