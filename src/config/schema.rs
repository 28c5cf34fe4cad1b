use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::dashboard::{default_alerts, default_zones, Alert, Hotspots, RiskTrend, RiskZone};
use crate::predictor::DEFAULT_PREDICTOR_URL;
use crate::scoring::EnvironmentalReading;

fn default_auto_refresh_interval() -> u64 {
    300
}

/// Top-level configuration.
///
/// Every section is optional; missing sections fall back to the built-in
/// Napa Valley demo data so the dashboard always has something to show.
///
/// Example YAML:
/// ```yaml
/// predictor:
///   url: "http://localhost:8000/predict"
///   timeout: "10s"
/// conditions: { temp: 35, humidity: 15, wind: 25, veg_moisture: 0.2 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub predictor: PredictorConfig,

    /// Seconds between automatic dashboard refreshes
    #[serde(default = "default_auto_refresh_interval")]
    pub auto_refresh_interval: u64,

    /// Current weather conditions to assess
    #[serde(default)]
    pub conditions: EnvironmentalReading,

    #[serde(default)]
    pub hotspots: Hotspots,

    #[serde(default = "default_alerts")]
    pub alerts: Vec<Alert>,

    #[serde(default)]
    pub trend: RiskTrend,

    #[serde(default = "default_zones")]
    pub zones: Vec<RiskZone>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            predictor: PredictorConfig::default(),
            auto_refresh_interval: default_auto_refresh_interval(),
            conditions: EnvironmentalReading::default(),
            hotspots: Hotspots::default(),
            alerts: default_alerts(),
            trend: RiskTrend::default(),
            zones: default_zones(),
        }
    }
}

/// Remote prediction service settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PredictorConfig {
    #[serde(default = "default_predictor_url")]
    pub url: String,

    /// When false, every assessment uses the local formula
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Request timeout as a duration string ("10s", "1m"). No timeout if unset.
    #[serde(default)]
    pub timeout: Option<String>,
}

fn default_predictor_url() -> String {
    DEFAULT_PREDICTOR_URL.to_string()
}

fn default_enabled() -> bool {
    true
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            url: default_predictor_url(),
            enabled: default_enabled(),
            timeout: None,
        }
    }
}

impl PredictorConfig {
    pub fn timeout_duration(&self) -> Result<Option<Duration>> {
        self.timeout
            .as_deref()
            .map(|t| {
                humantime::parse_duration(t.trim())
                    .with_context(|| format!("Invalid predictor timeout '{}'", t))
            })
            .transpose()
    }
}
