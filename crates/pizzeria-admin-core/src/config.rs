//! Application configuration management.
//!
//! This module handles loading and saving the client configuration: the
//! backend URL, the last email used to sign in, request timeout and an
//! optional log directory.
//!
//! Configuration is stored at `~/.config/pizzeria-admin/config.json`. The
//! `PIZZERIA_BACKEND_URL` environment variable overrides the stored URL.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::client::DEFAULT_REQUEST_TIMEOUT_SECS;

/// Application name used for config directory paths
const APP_NAME: &str = "pizzeria-admin";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable carrying the deployment's backend URL
pub const BACKEND_URL_ENV: &str = "PIZZERIA_BACKEND_URL";

const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub backend_url: Option<String>,
    pub last_email: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Backend URL: environment, then config file, then the local default
    pub fn base_url(&self) -> String {
        Self::resolve_base_url(std::env::var(BACKEND_URL_ENV).ok(), self.backend_url.as_deref())
    }

    fn resolve_base_url(env: Option<String>, stored: Option<&str>) -> String {
        env.filter(|url| !url.trim().is_empty())
            .or_else(|| stored.map(str::to_string))
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }
}
