pub mod events;
pub mod grid;
pub mod window;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono_tz::Tz;
use daygrid_core::config::Settings;
use daygrid_core::datetime::parse_timezone;
use daygrid_core::{Event, EventStore, JsonEventStore, Window, WindowKind, parse_records};

/// What the user asked to see, before settings are applied.
pub struct Query {
    pub view: WindowKind,
    pub date: Option<String>,
    pub owner: Option<String>,
    pub file: Option<PathBuf>,
    pub timezone: Option<String>,
}

/// A query resolved against the settings file.
pub struct Resolved {
    pub settings: Settings,
    pub tz: Tz,
    pub window: Window,
}

impl Query {
    pub fn resolve(&self) -> Result<Resolved> {
        let settings = Settings::load().context("Failed to load settings")?;

        let tz = match &self.timezone {
            Some(name) => parse_timezone(name)?,
            None => settings.timezone()?,
        };

        let window = match &self.date {
            Some(date) => Window::parse(self.view, date, tz)?,
            None => Window::containing_today(self.view, tz)?,
        };

        Ok(Resolved {
            settings,
            tz,
            window,
        })
    }

    /// Read and validate the owner's events. Unparsable records are skipped.
    pub fn load_events(&self, resolved: &Resolved) -> Result<Vec<Event>> {
        let path = match &self.file {
            Some(path) => path.clone(),
            None => resolved.settings.events_path().ok_or_else(|| {
                anyhow::anyhow!(
                    "No events file.\n\n\
                    Pass one with --file, or set it in {}:\n  \
                    events_file = \"~/calendar/events.json\"",
                    Settings::config_path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|_| "the config file".to_string())
                )
            })?,
        };

        let owner = self
            .owner
            .as_deref()
            .or(resolved.settings.owner.as_deref())
            .ok_or_else(|| {
                anyhow::anyhow!("No owner given. Use --owner or set `owner` in the config file")
            })?;

        let store = JsonEventStore::new(&path);
        let records = store
            .events_for_owner(owner)
            .with_context(|| format!("Failed to read events from {}", path.display()))?;

        Ok(parse_records(&records, resolved.tz))
    }
}
