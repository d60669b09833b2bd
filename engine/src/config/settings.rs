// Engine settings, loaded from an optional JSON file with defaults for every field.
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{EngineError, Result};

/// The upstream rate limit does not tolerate pages closer than this.
pub const MIN_PAGE_DELAY_MS: u64 = 1800;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EngineSettings {
    pub api: ApiSettings,
    pub fetch: FetchSettings,
    pub indicators: IndicatorSettings,
    pub time_anchor: TimeAnchor,
    pub asset_names_path: PathBuf,
    /// Base asset codes offered for selection.
    pub assets: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FetchSettings {
    pub page_delay_ms: u64,
    pub max_pages: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct IndicatorSettings {
    pub sma_windows: Vec<usize>,
    pub rsi_period: usize,
    pub rsi_smoothing: RsiSmoothing,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RsiSmoothing {
    Exponential,
    Simple,
}

/// Which clock a time frame is measured back from.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimeAnchor {
    Local,
    Server,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            api: ApiSettings::default(),
            fetch: FetchSettings::default(),
            indicators: IndicatorSettings::default(),
            time_anchor: TimeAnchor::Local,
            asset_names_path: PathBuf::from("asset_names.csv"),
            assets: vec!["XBT".to_string(), "ETH".to_string()],
        }
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: "https://api.kraken.com/0/public".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for FetchSettings {
    fn default() -> Self {
        FetchSettings {
            page_delay_ms: MIN_PAGE_DELAY_MS,
            max_pages: 500,
        }
    }
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        IndicatorSettings {
            sma_windows: vec![75],
            rsi_period: 14,
            rsi_smoothing: RsiSmoothing::Exponential,
        }
    }
}

impl FetchSettings {
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}

impl EngineSettings {
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            EngineError::ConfigError(format!("Failed to read settings file '{}': {}", path.display(), e))
        })?;
        let settings: EngineSettings = serde_json::from_str(&raw).map_err(|e| {
            EngineError::ConfigError(format!("Failed to parse settings file '{}': {}", path.display(), e))
        })?;
        settings.validate()?;
        tracing::info!(path = %path.display(), "Loaded engine settings");
        Ok(settings)
    }

    /// Loads `path` when given, otherwise falls back to the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from_path(p),
            None => {
                let settings = Self::default();
                settings.validate()?;
                Ok(settings)
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let api = &self.api.base_url;
        if !api.starts_with("http://") && !api.starts_with("https://") {
            return Err(EngineError::ConfigError(format!(
                "api.base_url must start with http:// or https://, got '{}'",
                api
            )));
        }
        if self.fetch.page_delay_ms < MIN_PAGE_DELAY_MS {
            return Err(EngineError::ConfigError(format!(
                "fetch.page_delay_ms must be at least {} (got {})",
                MIN_PAGE_DELAY_MS, self.fetch.page_delay_ms
            )));
        }
        if self.fetch.max_pages == 0 {
            return Err(EngineError::ConfigError("fetch.max_pages must be greater than 0".to_string()));
        }
        if self.indicators.sma_windows.iter().any(|w| *w == 0) {
            return Err(EngineError::ConfigError("indicators.sma_windows cannot contain 0".to_string()));
        }
        if self.indicators.rsi_period == 0 {
            return Err(EngineError::ConfigError("indicators.rsi_period must be greater than 0".to_string()));
        }
        if self.assets.is_empty() {
            return Err(EngineError::ConfigError("assets cannot be empty".to_string()));
        }
        Ok(())
    }
}
