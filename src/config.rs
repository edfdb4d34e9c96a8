/// Runtime configuration for the crisis map.
///
/// Loaded from a TOML file (default `crisis_map.toml`), then overridden from
/// the environment. A `.env` file next to the binary is honoured via dotenv.
/// Every field has a default, so a missing file is not an error.

use serde::Deserialize;
use std::env;
use std::error::Error;
use std::fs;
use std::path::Path;

use crate::logging::LogLevel;
use crate::model::Coordinates;

pub const DEFAULT_CONFIG_PATH: &str = "./crisis_map.toml";

pub const ENV_BACKEND_URL: &str = "CRISIS_MAP_BACKEND_URL";
pub const ENV_GEOCODER_URL: &str = "CRISIS_MAP_GEOCODER_URL";
pub const ENV_LOG_FILE: &str = "CRISIS_MAP_LOG_FILE";

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub geocoder: GeocoderConfig,
    pub map: MapConfig,
    pub reports: ReportConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the reporting API, without the `/api` suffix.
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub base_url: String,
    /// Nominatim's usage policy requires an identifying user agent.
    pub user_agent: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub initial_latitude: f64,
    pub initial_longitude: f64,
    pub initial_zoom: u8,
    /// Zoom used when focusing a single volunteer.
    pub focus_zoom: u8,
    /// Padding in pixels applied on both axes when fitting all markers.
    pub fit_padding_px: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Queue a report for later instead of dropping it when its location
    /// cannot be geocoded during a normal submission.
    pub queue_on_geocode_failure: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    pub console_timestamps: bool,
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: concat!("crisis_map/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            initial_latitude: 20.5937,
            initial_longitude: 78.9629,
            initial_zoom: 5,
            focus_zoom: 12,
            fit_padding_px: 50,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            console_timestamps: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Config {
    /// Parses configuration from TOML text. Absent keys keep their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, Box<dyn Error>> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if it exists (defaults otherwise), then applies `.env`
    /// and environment overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        dotenv::dotenv().ok();

        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents = fs::read_to_string(path)
                .map_err(|e| format!("reading config {}: {}", path.display(), e))?;
            Self::from_toml_str(&contents)
                .map_err(|e| format!("parsing config {}: {}", path.display(), e))?
        } else {
            Config::default()
        };

        config.apply_overrides(|key| env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides from a key lookup (the process environment in
    /// production, a map in tests).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BACKEND_URL).filter(|v| !v.trim().is_empty()) {
            self.backend.base_url = url;
        }
        if let Some(url) = lookup(ENV_GEOCODER_URL).filter(|v| !v.trim().is_empty()) {
            self.geocoder.base_url = url;
        }
        if let Some(file) = lookup(ENV_LOG_FILE).filter(|v| !v.trim().is_empty()) {
            self.logging.file = Some(file);
        }
    }

    fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.backend.base_url.trim().is_empty() {
            return Err("backend.base_url must not be empty".into());
        }
        if self.geocoder.base_url.trim().is_empty() {
            return Err("geocoder.base_url must not be empty".into());
        }
        if LogLevel::from_name(&self.logging.level).is_none() {
            return Err(format!("unknown logging.level '{}'", self.logging.level).into());
        }
        Ok(())
    }

    pub fn log_level(&self) -> LogLevel {
        LogLevel::from_name(&self.logging.level).unwrap_or(LogLevel::Info)
    }
}

impl MapConfig {
    pub fn initial_center(&self) -> Coordinates {
        Coordinates::new(self.initial_latitude, self.initial_longitude)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
