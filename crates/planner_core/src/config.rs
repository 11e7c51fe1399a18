//! Planner configuration.
//!
//! # Responsibility
//! - Define the injectable knobs the iterations diverged on: firing-band
//!   policy, scan cadence and persistence backend.
//! - Load and validate a TOML config file.
//!
//! # Invariants
//! - A narrow band is only accepted when the scan interval is short enough
//!   to guarantee at-least-once detection.

use crate::reminder::band::ReminderBand;
use chrono::Duration as ChronoDuration;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub reminder: ReminderSettings,
    pub storage: StorageSettings,
}

impl PlannerConfig {
    /// Parses and validates TOML content.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|err| ConfigError::Io(err.to_string()))?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.reminder.validate()?;
        self.storage.validate()
    }
}

/// Reminder engine knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderSettings {
    /// Fire when at most this many minutes remain before the event.
    pub lead_minutes: u32,
    /// When set, narrows the band to `lead_minutes ± tolerance_minutes`
    /// (the earlier iterations' policy) instead of the open-ended default.
    pub tolerance_minutes: Option<u32>,
    /// Scan cadence in seconds.
    pub scan_interval_secs: u32,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            lead_minutes: 120,
            tolerance_minutes: None,
            scan_interval_secs: 15,
        }
    }
}

impl ReminderSettings {
    pub fn band(&self) -> ReminderBand {
        match self.tolerance_minutes {
            None => ReminderBand::LeadTime {
                threshold: ChronoDuration::minutes(i64::from(self.lead_minutes)),
            },
            Some(tolerance) => ReminderBand::Window {
                center: ChronoDuration::minutes(i64::from(self.lead_minutes)),
                tolerance: ChronoDuration::minutes(i64::from(tolerance)),
            },
        }
    }

    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.scan_interval_secs))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lead_minutes == 0 {
            return Err(ConfigError::Invalid(
                "reminder.lead_minutes must be at least 1".to_string(),
            ));
        }
        if self.scan_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "reminder.scan_interval_secs must be at least 1".to_string(),
            ));
        }
        if let Some(tolerance) = self.tolerance_minutes {
            if tolerance == 0 {
                return Err(ConfigError::Invalid(
                    "reminder.tolerance_minutes must be at least 1 when set".to_string(),
                ));
            }
            // A narrow band must be scanned at least once per tolerance, or
            // an event can cross the whole band between two ticks.
            let max_interval_secs = u64::from(tolerance) * 60;
            if u64::from(self.scan_interval_secs) > max_interval_secs {
                return Err(ConfigError::Invalid(format!(
                    "reminder.scan_interval_secs ({}) exceeds the {}s bound for a ±{}min band",
                    self.scan_interval_secs, max_interval_secs, tolerance
                )));
            }
        }
        Ok(())
    }
}

/// Which persistence backend a session runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackendKind {
    /// Local SQLite file.
    Local,
    /// Hosted document collection scoped to the signed-in principal.
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackendKind,
    /// Database file for the local backend; `None` means in-memory.
    pub db_path: Option<PathBuf>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackendKind::Local,
            db_path: None,
        }
    }
}

impl StorageSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend == StorageBackendKind::Remote && self.db_path.is_some() {
            return Err(ConfigError::Invalid(
                "storage.db_path is only meaningful for the local backend".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(message) => write!(f, "cannot read config: {message}"),
            Self::Parse(message) => write!(f, "cannot parse config: {message}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {}
