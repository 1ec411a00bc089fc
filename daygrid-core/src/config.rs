//! daygrid configuration.

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::datetime::{host_timezone, parse_timezone};
use crate::error::{CoreError, CoreResult};
use crate::grid::GridConfig;
use crate::window::WindowKind;

static ENV_PREFIX: &str = "DAYGRID";

/// Overrides for one view's hour grid. Unset fields keep the view's defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GridSettings {
    pub first_hour: Option<u32>,
    pub last_hour: Option<u32>,
    pub pixels_per_hour: Option<f64>,
}

impl GridSettings {
    pub fn resolve(&self, defaults: GridConfig) -> CoreResult<GridConfig> {
        GridConfig::new(
            self.first_hour.unwrap_or(defaults.first_hour()),
            self.last_hour.unwrap_or(defaults.last_hour()),
            self.pixels_per_hour.unwrap_or(defaults.pixels_per_hour()),
        )
    }
}

/// Settings at ~/.config/daygrid/config.toml, overridable with `DAYGRID_*`
/// environment variables (`DAYGRID_DAY_VIEW__FIRST_HOUR=6`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// IANA timezone used for local dates. Defaults to the host timezone.
    pub timezone: Option<String>,

    /// JSON file with event records.
    pub events_file: Option<PathBuf>,

    /// Owner whose events are shown when none is given on the command line.
    pub owner: Option<String>,

    #[serde(default)]
    pub day_view: GridSettings,

    #[serde(default)]
    pub week_view: GridSettings,
}

impl Settings {
    pub fn config_path() -> CoreResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CoreError::Config("Could not determine config directory".into()))?
            .join("daygrid");

        Ok(config_dir.join("config.toml"))
    }

    /// Load settings from the default location, writing a commented-out
    /// template there first if nothing exists yet.
    pub fn load() -> CoreResult<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            Self::create_default_config(&path)?;
        }

        Self::load_from(&path)
    }

    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> CoreResult<Self> {
        let settings: Settings = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| CoreError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CoreError::Config(e.to_string()))?;

        tracing::debug!(
            path = %path.display(),
            timezone = ?settings.timezone,
            events_file = ?settings.events_file,
            "loaded settings"
        );

        Ok(settings)
    }

    /// Configured timezone, or the host's when unset.
    pub fn timezone(&self) -> CoreResult<Tz> {
        match &self.timezone {
            Some(name) => parse_timezone(name),
            None => Ok(host_timezone()),
        }
    }

    /// Events file with `~` expanded.
    pub fn events_path(&self) -> Option<PathBuf> {
        self.events_file.as_ref().map(|path| {
            PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
        })
    }

    pub fn day_grid(&self) -> CoreResult<GridConfig> {
        self.grid_for(WindowKind::Day)
    }

    pub fn week_grid(&self) -> CoreResult<GridConfig> {
        self.grid_for(WindowKind::Week)
    }

    /// Grid used for a view: the view's defaults with the matching overrides applied.
    pub fn grid_for(&self, kind: WindowKind) -> CoreResult<GridConfig> {
        let overrides = match kind {
            WindowKind::Week => &self.week_view,
            WindowKind::Day | WindowKind::Month => &self.day_view,
        };
        overrides.resolve(GridConfig::for_view(kind))
    }

    /// Create a config file with every option commented out.
    pub fn create_default_config(path: &Path) -> CoreResult<()> {
        let day = GridConfig::DAY_VIEW;
        let week = GridConfig::WEEK_VIEW;
        let contents = format!(
            "\
# daygrid configuration

# Timezone for local dates (defaults to the system timezone):
# timezone = \"Europe/Stockholm\"

# Where event records are stored:
# events_file = \"~/calendar/events.json\"

# Whose events to show by default:
# owner = \"me\"

# [day_view]
# first_hour = {}
# last_hour = {}
# pixels_per_hour = {}

# [week_view]
# first_hour = {}
# last_hour = {}
# pixels_per_hour = {}
",
            day.first_hour(),
            day.last_hour(),
            day.pixels_per_hour(),
            week.first_hour(),
            week.last_hour(),
            week.pixels_per_hour(),
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CoreError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CoreError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
