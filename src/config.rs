//! TOML configuration
//!
//! Read from `$CONFIG_DIR/wordle_race/config.toml` unless a path is given.
//! Command-line flags are applied on top by the binary.

use crate::core::Mode;
use crate::race::{DEFAULT_SAMPLE_BUDGET, RaceSettings};
use serde::Deserialize;
use std::fs;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5001";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Where collaborators live
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// In-process word lists, scorer and solver
    #[default]
    Local,
    /// Remote solver service
    Http,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackendConfig {
    pub kind: BackendKind,
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::Local,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RaceConfig {
    pub mode: Mode,
    pub sample_budget: u32,
    /// Milliseconds; 0 disables timeouts
    pub call_timeout_ms: u64,
    pub backend: BackendConfig,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            sample_budget: DEFAULT_SAMPLE_BUDGET.get(),
            call_timeout_ms: 10_000,
            backend: BackendConfig::default(),
        }
    }
}

impl RaceConfig {
    /// Load from `path`, or from the default location when `None`
    ///
    /// A missing file at the default location yields the defaults; a missing
    /// explicit path is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match default_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        let content = fs::read_to_string(&path).map_err(|source| {
            tracing::warn!("Failed to read config at {:?}: {}", path, source);
            ConfigError::Read {
                path: path.clone(),
                source,
            }
        })?;
        Self::parse(&content, &path)
    }

    /// Parse TOML text; `path` is only used for error context
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Race settings after validation
    pub fn settings(&self) -> Result<RaceSettings, ConfigError> {
        let sample_budget = NonZeroU32::new(self.sample_budget)
            .ok_or_else(|| ConfigError::Invalid("sample_budget must be positive".to_string()))?;
        let call_timeout =
            (self.call_timeout_ms > 0).then(|| Duration::from_millis(self.call_timeout_ms));

        Ok(RaceSettings {
            mode: self.mode,
            sample_budget,
            call_timeout,
        })
    }

    /// Remote service URL; only meaningful for the http backend
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.backend.base_url).map_err(|e| {
            ConfigError::Invalid(format!("base_url {:?}: {e}", self.backend.base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "base_url {:?} must use http or https",
                self.backend.base_url
            )));
        }
        Ok(url)
    }

    /// Check every field the selected backend depends on
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.settings()?;
        if self.backend.kind == BackendKind::Http {
            self.base_url()?;
        }
        Ok(())
    }
}

#[must_use]
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("wordle_race").join("config.toml"))
}
