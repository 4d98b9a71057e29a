// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::selector::{DEFAULT_DISPLAY_COUNT, DisplayCount, PagingPolicy};

/// Catalogue endpoint used when nothing else is configured
pub const DEFAULT_API_URL: &str = "https://podcast-api.netlify.app";

const CONFIG_FILENAME: &str = "config.toml";

/// User configuration, read from `config.toml` in the platform config dir
///
/// Every key is optional; the accessors supply the defaults.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub api_url: Option<String>,
    pub page_size: Option<usize>,
    pub load_more_step: Option<usize>,
    pub paging: Option<PagingPolicy>,
    pub request_timeout_secs: Option<u64>,
    pub log_level: Option<String>,
}

impl Config {
    /// Location of the default config file, if the platform has one
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "podgrid")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
    }

    /// Load the default config file; a missing file yields the defaults
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load an explicitly named config file; the file must exist
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate()?;

        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == Some(0) {
            return Err(ConfigError::InvalidValue {
                key: "page_size",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                key: "request_timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        if let Some(url) = &self.api_url {
            url::Url::parse(url).map_err(|e| ConfigError::InvalidValue {
                key: "api_url",
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }

    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    pub fn page_size(&self) -> DisplayCount {
        self.page_size
            .and_then(DisplayCount::new)
            .unwrap_or_default()
    }

    pub fn load_more_step(&self) -> usize {
        self.load_more_step.unwrap_or(DEFAULT_DISPLAY_COUNT)
    }

    pub fn paging(&self) -> PagingPolicy {
        self.paging.unwrap_or_default()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(30))
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("warn")
    }
}
