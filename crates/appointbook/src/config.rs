//! Configuration management for appointbook.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::format::{Item, StrftimeItems};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::directory::{default_doctors, Doctor, DoctorDirectory};
use crate::error::{Error, Result};
use crate::rules::{RuleSet, DEFAULT_WINDOW_HOURS};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "appointbook";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "APPOINTBOOK_";

/// Upper bound for the rule windows, in hours (one year).
pub const MAX_WINDOW_HOURS: u32 = 24 * 365;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `APPOINTBOOK_`, nested keys
///    separated by `__`)
/// 2. TOML config file at `~/.config/appointbook/config.toml`
/// 3. Default values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Booking rule configuration.
    pub rules: RulesConfig,
    /// Display configuration.
    pub display: DisplayConfig,
    /// The doctor directory.
    pub doctors: Vec<Doctor>,
}

/// Booking rule configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Minimum notice for a booking, in hours. A booking must start strictly
    /// later than this.
    pub advance_notice_hours: u32,
    /// Minimum time left before an appointment for it to be canceled, in
    /// hours.
    pub cancellation_window_hours: u32,
}

/// Display configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// strftime format for dates in the list view.
    pub date_format: String,
    /// Whether `list` includes canceled appointments by default.
    pub show_canceled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules: RulesConfig::default(),
            display: DisplayConfig::default(),
            doctors: default_doctors(),
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            advance_notice_hours: DEFAULT_WINDOW_HOURS,
            cancellation_window_hours: DEFAULT_WINDOW_HOURS,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            date_format: "%d/%m/%Y".to_string(),
            show_canceled: false,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// A missing file is not an error; defaults apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.doctors.is_empty() {
            return Err(invalid("at least one doctor must be configured"));
        }

        let mut ids = HashSet::new();
        for doctor in &self.doctors {
            if doctor.id.trim().is_empty() {
                return Err(invalid("doctor id cannot be blank"));
            }
            if !ids.insert(doctor.id.as_str()) {
                return Err(invalid(format!("duplicate doctor id '{}'", doctor.id)));
            }
            if doctor.name.trim().is_empty() || doctor.specialty.trim().is_empty() {
                return Err(invalid(format!(
                    "doctor '{}' needs a name and a specialty",
                    doctor.id
                )));
            }
            if doctor.hours.start > doctor.hours.end {
                return Err(invalid(format!(
                    "doctor '{}' has business hours ending before they start ({})",
                    doctor.id, doctor.hours
                )));
            }
        }

        for (name, hours) in [
            ("advance_notice_hours", self.rules.advance_notice_hours),
            ("cancellation_window_hours", self.rules.cancellation_window_hours),
        ] {
            if hours > MAX_WINDOW_HOURS {
                return Err(invalid(format!(
                    "rules.{name} must be at most {MAX_WINDOW_HOURS}, got {hours}"
                )));
            }
        }

        if StrftimeItems::new(&self.display.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(invalid(format!(
                "invalid date_format: {}",
                self.display.date_format
            )));
        }

        Ok(())
    }

    /// The rule-set these settings describe.
    #[must_use]
    pub fn rule_set(&self) -> RuleSet {
        RuleSet {
            advance_notice_hours: self.rules.advance_notice_hours,
            cancellation_window_hours: self.rules.cancellation_window_hours,
        }
    }

    /// Build the doctor directory.
    #[must_use]
    pub fn directory(&self) -> DoctorDirectory {
        DoctorDirectory::new(self.doctors.clone())
    }
}

fn invalid(message: impl Into<String>) -> Error {
    Error::ConfigValidation {
        message: message.into(),
    }
}
