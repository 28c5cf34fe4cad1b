use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::scoring::RiskTier;

/// Direction arrow shown on a metric card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

/// One headline card on the overview
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskMetric {
    pub title: String,
    pub value: String,
    pub change: Option<String>,
    pub trend: Trend,
    pub status: RiskTier,
}

/// Active hotspot counter shown on the overview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Hotspots {
    pub count: u32,
    #[serde(default)]
    pub change: Option<String>,
}

impl Default for Hotspots {
    fn default() -> Self {
        Self {
            count: 14,
            change: Some("+2".to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Moderate,
    High,
    Extreme,
}

impl AlertSeverity {
    pub fn tier(&self) -> RiskTier {
        match self {
            AlertSeverity::Moderate => RiskTier::Moderate,
            AlertSeverity::High => RiskTier::High,
            AlertSeverity::Extreme => RiskTier::Extreme,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Alert {
    pub id: String,
    pub title: String,
    pub description: String,
    /// How long ago the alert was issued, as a duration ("2h", "45m")
    pub age: String,
    pub severity: AlertSeverity,
}

impl Alert {
    pub fn age_duration(&self) -> Result<Duration> {
        humantime::parse_duration(self.age.trim())
            .with_context(|| format!("Invalid alert age '{}'", self.age))
    }
}

pub fn default_alerts() -> Vec<Alert> {
    vec![
        Alert {
            id: "1".to_string(),
            title: "High Wind Warning".to_string(),
            description: "Gusts up to 45mph in Northern Sector.".to_string(),
            age: "2h".to_string(),
            severity: AlertSeverity::High,
        },
        Alert {
            id: "2".to_string(),
            title: "Dry Lightning Potential".to_string(),
            description: "Forecasted for late afternoon.".to_string(),
            age: "4h".to_string(),
            severity: AlertSeverity::Moderate,
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrendSeries {
    pub label: String,
    pub data: Vec<f64>,
    /// Drawn as a reference line rather than the primary series
    #[serde(default)]
    pub dashed: bool,
}

/// Seven-day risk forecast next to the historical average
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RiskTrend {
    pub labels: Vec<String>,
    pub series: Vec<TrendSeries>,
}

impl Default for RiskTrend {
    fn default() -> Self {
        let labels = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
        Self {
            labels: labels.iter().map(|l| l.to_string()).collect(),
            series: vec![
                TrendSeries {
                    label: "Fire Risk Index".to_string(),
                    data: vec![35.0, 42.0, 38.0, 55.0, 68.0, 72.0, 65.0],
                    dashed: false,
                },
                TrendSeries {
                    label: "Historical Avg".to_string(),
                    data: vec![30.0, 32.0, 35.0, 38.0, 40.0, 42.0, 41.0],
                    dashed: true,
                },
            ],
        }
    }
}

impl RiskTrend {
    /// Largest value across all series, 0 when empty
    pub fn max_value(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.data.iter().copied())
            .fold(0.0_f64, f64::max)
    }
}

/// A mapped risk area: a static polygon with its conditions and tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RiskZone {
    pub id: String,
    pub name: String,
    pub risk_level: RiskTier,
    pub temperature: f64,
    pub humidity: f64,
    /// Closed ring of [longitude, latitude] points
    pub polygon: Vec<[f64; 2]>,
}

impl RiskZone {
    /// (min_lon, min_lat, max_lon, max_lat)
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let first = self.polygon.first()?;
        let init = (first[0], first[1], first[0], first[1]);
        Some(self.polygon.iter().fold(init, |(x0, y0, x1, y1), p| {
            (x0.min(p[0]), y0.min(p[1]), x1.max(p[0]), y1.max(p[1]))
        }))
    }
}

fn rectangle(west: f64, north: f64, east: f64, south: f64) -> Vec<[f64; 2]> {
    vec![
        [west, north],
        [east, north],
        [east, south],
        [west, south],
        [west, north],
    ]
}

pub fn default_zones() -> Vec<RiskZone> {
    vec![
        RiskZone {
            id: "z1".to_string(),
            name: "Napa Valley North".to_string(),
            risk_level: RiskTier::High,
            temperature: 32.0,
            humidity: 15.0,
            polygon: rectangle(-122.5, 38.5, -122.3, 38.3),
        },
        RiskZone {
            id: "z2".to_string(),
            name: "Sonoma Coast".to_string(),
            risk_level: RiskTier::Moderate,
            temperature: 24.0,
            humidity: 45.0,
            polygon: rectangle(-123.0, 38.4, -122.8, 38.2),
        },
        RiskZone {
            id: "z3".to_string(),
            name: "Sierra Foothills".to_string(),
            risk_level: RiskTier::Extreme,
            temperature: 35.0,
            humidity: 10.0,
            polygon: rectangle(-121.0, 39.0, -120.5, 38.5),
        },
    ]
}

/// Bounding box over every zone, padded so outlines don't touch the edge
pub fn zones_extent(zones: &[RiskZone]) -> Option<(f64, f64, f64, f64)> {
    let (x0, y0, x1, y1) = zones
        .iter()
        .filter_map(RiskZone::bounds)
        .reduce(|a, b| (a.0.min(b.0), a.1.min(b.1), a.2.max(b.2), a.3.max(b.3)))?;
    let pad_x = ((x1 - x0) * 0.1).max(0.05);
    let pad_y = ((y1 - y0) * 0.1).max(0.05);
    Some((x0 - pad_x, y0 - pad_y, x1 + pad_x, y1 + pad_y))
}
