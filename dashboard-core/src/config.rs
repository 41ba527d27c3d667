use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "WEATHER_DASH_API_KEY";

/// Endpoint roots for every upstream the dashboard talks to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,
    #[serde(default = "default_air_quality_url")]
    pub air_quality_url: String,
    /// Keyless daily-forecast endpoint.
    #[serde(default = "default_seven_day_url")]
    pub seven_day_url: String,
}

fn default_base_url() -> String {
    "https://api.openweathermap.org/data/2.5/weather".to_string()
}

fn default_forecast_url() -> String {
    "https://api.openweathermap.org/data/2.5/forecast".to_string()
}

fn default_air_quality_url() -> String {
    "https://api.openweathermap.org/data/2.5/air_pollution".to_string()
}

fn default_seven_day_url() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

/// Shortest per-call timeout the dashboard will use.
pub const MIN_TIMEOUT_SECS: u64 = 1;

const fn default_timeout_secs() -> u64 {
    10
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            forecast_url: default_forecast_url(),
            air_quality_url: default_air_quality_url(),
            seven_day_url: default_seven_day_url(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// timeout_secs = 10
///
/// [endpoints]
/// base_url = "https://api.openweathermap.org/data/2.5/weather"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Credential shared by the OpenWeather-style endpoints.
    pub api_key: Option<String>,

    #[serde(default)]
    pub endpoints: Endpoints,

    /// Per-call timeout; each upstream call gets exactly one attempt.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self { api_key: None, endpoints: Endpoints::default(), timeout_secs: default_timeout_secs() }
    }
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = Self::load_from(&path)?;

        if let Some(key) = std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty()) {
            cfg.set_api_key(key);
        }

        Ok(cfg)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
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
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
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
        let dirs = ProjectDirs::from("dev", "weather-dash", "weather-dash")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Replace the stored API key; blank input clears it.
    pub fn set_api_key(&mut self, api_key: String) {
        let trimmed = api_key.trim();
        self.api_key = if trimmed.is_empty() { None } else { Some(trimmed.to_string()) };
    }

    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            anyhow!(
                "No API key configured.\n\
                 Hint: run `weather-dash configure` or set {API_KEY_ENV}."
            )
        })
    }

    /// A stored zero is raised to [`MIN_TIMEOUT_SECS`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(MIN_TIMEOUT_SECS))
    }
}
