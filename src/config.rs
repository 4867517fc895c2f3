// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Client configuration.
//!
//! Values come from `config.toml` in the platform config dir, then the
//! `MINIFIN_*` environment variables, then command-line flags.

use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub(crate) static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Minifin", "minifin"));

pub const ENV_BACKEND_URL: &str = "MINIFIN_BACKEND_URL";
pub const ENV_USER_ID: &str = "MINIFIN_USER_ID";

/// Which family of record endpoints the backend exposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteStyle {
    /// `GET /api/records`, `PUT /api/update/{id}`
    #[default]
    Records,
    /// `GET /api/operations`, `PUT /api/operations/{id}`
    Operations,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    #[serde(default)]
    pub user_id: Option<String>,

    #[serde(default = "default_currency")]
    pub default_currency: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub routes: RouteStyle,
}

fn default_backend_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_currency() -> String {
    "₽".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            user_id: None,
            default_currency: default_currency(),
            timeout_secs: default_timeout_secs(),
            routes: RouteStyle::default(),
        }
    }
}

impl Config {
    /// Reads `path`, or the default config file. A missing file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        log::info!("loading config from {}", path.display());
        let contents = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn apply_env(&mut self) {
        self.apply_env_with(|k| std::env::var(k).ok());
    }

    pub fn apply_env_with<F>(&mut self, get: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = get(ENV_BACKEND_URL).filter(|v| !v.trim().is_empty()) {
            self.backend_url = url;
        }
        if let Some(uid) = get(ENV_USER_ID).filter(|v| !v.trim().is_empty()) {
            self.user_id = Some(uid);
        }
    }

    pub fn apply_overrides(&mut self, backend_url: Option<&str>, user_id: Option<&str>) {
        if let Some(url) = backend_url {
            self.backend_url = url.to_string();
        }
        if let Some(uid) = user_id {
            self.user_id = Some(uid.to_string());
        }
    }

    /// Checks the endpoint and normalizes it (no trailing slash, trimmed user id).
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        let url = self.backend_url.trim().trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::InvalidBackendUrl(self.backend_url));
        }
        self.backend_url = url;
        self.user_id = self
            .user_id
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        if self.timeout_secs == 0 {
            self.timeout_secs = default_timeout_secs();
        }
        Ok(self)
    }

    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let proj = ProjectDirs::from(APP.0, APP.1, APP.2).ok_or(ConfigError::NoConfigDir)?;
        Ok(proj.config_dir().join("config.toml"))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Could not determine platform-specific config dir")]
    NoConfigDir,

    #[error("Invalid backend url '{0}', expected http:// or https://")]
    InvalidBackendUrl(String),
}
