//! Configuration for the capture pipeline.
//!
//! Two layers: `Settings` is the persisted user-editable surface (one value,
//! the endpoint base URL, stored in a TOML file under the user config
//! directory and written back on every edit), and `RunConfig` is the
//! in-memory tuning a run is built with.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::transport::DEFAULT_ENDPOINT;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Persisted settings. Unknown or missing keys fall back to defaults, so an
/// empty or absent file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Endpoint base URL the captured record is delivered to.
    pub endpoint: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl Settings {
    /// Default location of the settings file.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("jobsnap").join("config.toml"))
    }

    /// Load settings from `path`; a missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Write settings back to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        debug!(path = %path.display(), "settings saved");
        Ok(())
    }
}

/// Tuning for a single pipeline run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Endpoint base URL.
    pub endpoint: String,
    /// Bound on each suspending stage (document fetch, record delivery).
    pub request_timeout: Duration,
    /// How long Success stays visible before reverting to Idle.
    pub success_display: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout: crate::fetch::DEFAULT_FETCH_TIMEOUT,
            success_display: crate::controller::DEFAULT_SUCCESS_DISPLAY,
        }
    }
}

impl RunConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            endpoint: settings.endpoint.clone(),
            ..Self::default()
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_success_display(mut self, interval: Duration) -> Self {
        self.success_display = interval;
        self
    }
}
