//! Global weekcal configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{WeekcalError, WeekcalResult};
use crate::exdate::ExdateMatching;
use crate::expand::ExpandOptions;
use crate::occurrence::Color;

static DEFAULT_OUTPUT_PATH: &str = "~/Downloads/calendar.ics";

fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PATH)
}

fn default_exclude_all_day() -> bool {
    true
}

/// Configuration at ~/.config/weekcal/config.toml
///
/// Every key can be overridden with a `WEEKCAL_`-prefixed environment
/// variable, e.g. `WEEKCAL_EXCLUDE_ALL_DAY=false`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeekcalConfig {
    /// Where `export` writes the generated .ics file
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    #[serde(default = "default_exclude_all_day")]
    pub exclude_all_day: bool,

    #[serde(default)]
    pub default_color: Color,

    #[serde(default)]
    pub exdate_matching: ExdateMatching,
}

impl Default for WeekcalConfig {
    fn default() -> Self {
        WeekcalConfig {
            output_path: default_output_path(),
            exclude_all_day: default_exclude_all_day(),
            default_color: Color::default(),
            exdate_matching: ExdateMatching::default(),
        }
    }
}

impl WeekcalConfig {
    pub fn config_path() -> WeekcalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| WeekcalError::Config("Could not determine config directory".into()))?
            .join("weekcal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config file, creating a commented default on first run.
    pub fn load() -> WeekcalResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from an explicit file, still applying `WEEKCAL_*` overrides.
    pub fn load_from(path: &Path) -> WeekcalResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("WEEKCAL").try_parsing(true))
            .build()
            .map_err(|e| WeekcalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| WeekcalError::Config(e.to_string()))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> WeekcalResult<()> {
        let contents = format!(
            "\
# weekcal configuration

# Where exported calendars are written:
# output_path = \"{}\"

# Leave out events that span whole days:
# exclude_all_day = true

# Color given to imported events:
# default_color = \"blue\"

# How EXDATE values are compared with occurrences
# (\"calendar-fields\" or \"instant\"):
# exdate_matching = \"calendar-fields\"
",
            DEFAULT_OUTPUT_PATH
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                WeekcalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| WeekcalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// The output path with a leading `~` expanded to the home directory.
    pub fn output_path(&self) -> WeekcalResult<PathBuf> {
        let raw = self.output_path.to_string_lossy();
        if !raw.starts_with('~') {
            return Ok(self.output_path.clone());
        }

        let home = dirs::home_dir().ok_or(WeekcalError::HomeDirectory)?;
        let expanded =
            shellexpand::tilde_with_context(&raw, || Some(home.to_string_lossy().into_owned()));

        Ok(PathBuf::from(expanded.into_owned()))
    }

    /// The output path in display-friendly form, keeping `~`.
    pub fn display_output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn expand_options(&self) -> ExpandOptions {
        ExpandOptions {
            exclude_all_day: self.exclude_all_day,
            default_color: self.default_color,
            exdate_matching: self.exdate_matching,
        }
    }
}
