use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::provider::openweather::Endpoints;

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// # base_url = "https://api.openweathermap.org/data/2.5"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// OpenWeatherMap API key. Stored in plain text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Override for the data API, e.g. a local mock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Override for the geocoding API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_url: Option<String>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Store a new API key, trimming surrounding whitespace.
    pub fn set_api_key(&mut self, api_key: &str) -> Result<()> {
        let trimmed = api_key.trim();
        if trimmed.is_empty() {
            bail!("API key must not be empty");
        }
        self.api_key = Some(trimmed.to_string());
        Ok(())
    }

    /// Returns the API key, treating a blank entry as unset.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    pub fn endpoints(&self) -> Endpoints {
        let defaults = Endpoints::default();
        Endpoints {
            base_url: self.base_url.clone().unwrap_or(defaults.base_url),
            geo_url: self.geo_url.clone().unwrap_or(defaults.geo_url),
        }
    }
}

pub(crate) fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "weather-dashboard", "weather-dashboard")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::openweather::{DEFAULT_BASE_URL, DEFAULT_GEO_URL};

    #[test]
    fn default_config_has_no_key() {
        let cfg = Config::default();
        assert!(!cfg.is_configured());
        assert_eq!(cfg.api_key(), None);
    }

    #[test]
    fn set_api_key_trims_input() {
        let mut cfg = Config::default();
        cfg.set_api_key("  OPEN_KEY \n").unwrap();

        assert_eq!(cfg.api_key(), Some("OPEN_KEY"));
        assert!(cfg.is_configured());
    }

    #[test]
    fn blank_api_key_is_rejected() {
        let mut cfg = Config::default();
        let err = cfg.set_api_key("   ").unwrap_err();
        assert!(err.to_string().contains("must not be empty"));

        cfg.api_key = Some(" ".into());
        assert!(!cfg.is_configured());
    }

    #[test]
    fn endpoints_fall_back_to_defaults() {
        let mut cfg = Config::default();
        assert_eq!(cfg.endpoints().base_url, DEFAULT_BASE_URL);

        cfg.geo_url = Some("http://localhost/geo/1.0".into());
        let endpoints = cfg.endpoints();
        assert_eq!(endpoints.base_url, DEFAULT_BASE_URL);
        assert_ne!(endpoints.geo_url, DEFAULT_GEO_URL);
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("KEY").unwrap();
        cfg.save_to(&path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("api_key = \"KEY\""));
        assert!(!written.contains("base_url"));

        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
