//! Configuration management for LMDB
//!
//! Handles config file loading/saving and resolves the TMDB connection settings.
//! Config is stored at ~/.config/lmdb/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::images::DEFAULT_IMAGE_BASE_URL;
use crate::models::TimeWindow;

/// Default TMDB v3 API root
pub const DEFAULT_API_BASE_URL: &str = "https://api.themoviedb.org/3";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No TMDB API key configured (set TMDB_API_KEY or tmdb_api_key in {0})")]
    MissingApiKey(String),

    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// TMDB v3 API key
    pub tmdb_api_key: Option<String>,
    /// Override for the API root (useful against a local mock)
    pub api_base_url: Option<String>,
    /// Override for the image CDN root
    pub image_base_url: Option<String>,
    /// Trending window used on the home screen
    pub default_window: Option<TimeWindow>,
}

/// Everything the TMDB client needs, resolved once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TmdbConfig {
    pub api_key: String,
    pub base_url: String,
    pub image_base_url: String,
}

impl TmdbConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_API_BASE_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Config {
    /// Get config file path (~/.config/lmdb/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("lmdb").join("config.toml"))
    }

    /// Load config from the default location, or return default if not found
    pub fn load() -> Self {
        Self::path()
            .and_then(|p| Self::load_from(&p).ok())
            .unwrap_or_default()
    }

    /// Load config from an explicit path; unlike [`Config::load`] a missing
    /// or malformed file is an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&raw)?)
    }

    /// `--config <path>` if given, else the default location
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from(path),
            None => Ok(Self::load()),
        }
    }

    /// Resolve TMDB settings, letting the process environment override the file:
    /// 1. TMDB_API_KEY / TMDB_BASE_URL environment variables
    /// 2. Values from the config file
    /// 3. Built-in defaults (except for the key, which is required)
    pub fn tmdb(&self) -> Result<TmdbConfig, ConfigError> {
        self.tmdb_with_env(|name| std::env::var(name).ok())
    }

    /// Same as [`Config::tmdb`] with an injectable environment lookup
    pub fn tmdb_with_env(
        &self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<TmdbConfig, ConfigError> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        let api_key = non_empty(env("TMDB_API_KEY"))
            .or_else(|| non_empty(self.tmdb_api_key.clone()))
            .ok_or_else(|| {
                let location = Self::path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "config.toml".to_string());
                ConfigError::MissingApiKey(location)
            })?;

        let base_url = non_empty(env("TMDB_BASE_URL"))
            .or_else(|| non_empty(self.api_base_url.clone()))
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let image_base_url = non_empty(self.image_base_url.clone())
            .unwrap_or_else(|| DEFAULT_IMAGE_BASE_URL.to_string());

        Ok(TmdbConfig {
            api_key,
            base_url,
            image_base_url,
        })
    }

    pub fn trending_window(&self) -> TimeWindow {
        self.default_window.unwrap_or_default()
    }
}
