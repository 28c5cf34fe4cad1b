pub mod geojson;
pub mod types;

pub use geojson::zones_to_geojson;
pub use types::{
    default_alerts, default_zones, zones_extent, Alert, AlertSeverity, Hotspots, RiskMetric,
    RiskTrend, RiskZone, Trend, TrendSeries,
};

use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::info;

use crate::config::Config;
use crate::predictor::RemotePredictor;
use crate::scoring::{assess, assess_until, EnvironmentalReading, RiskAssessment, RiskTier};

/// Everything one dashboard render needs.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub reading: EnvironmentalReading,
    pub assessment: RiskAssessment,
    pub metrics: Vec<RiskMetric>,
    pub alerts: Vec<Alert>,
    pub trend: RiskTrend,
    pub zones: Vec<RiskZone>,
    pub loaded_at: DateTime<Utc>,
}

/// Assess the current reading and package it with the configured alerts,
/// trend and zones.
///
/// With a `deadline`, a remote call still pending when it elapses is
/// abandoned in favour of the fallback formula. The snapshot is always
/// produced.
pub async fn load_snapshot(
    config: &Config,
    reading: EnvironmentalReading,
    predictor: Option<&dyn RemotePredictor>,
    deadline: Option<Duration>,
) -> DashboardSnapshot {
    let assessment = match deadline {
        Some(limit) => assess_until(&reading, predictor, tokio::time::sleep(limit)).await,
        None => assess(&reading, predictor).await,
    };

    info!(
        score = assessment.score,
        tier = assessment.tier.as_str(),
        source = ?assessment.source,
        "dashboard snapshot loaded"
    );

    DashboardSnapshot {
        reading,
        metrics: build_metrics(&assessment, &config.hotspots),
        assessment,
        alerts: config.alerts.clone(),
        trend: config.trend.clone(),
        zones: config.zones.clone(),
        loaded_at: Utc::now(),
    }
}

/// The four overview cards: model score, heuristic baseline, hotspots and
/// model confidence.
pub fn build_metrics(assessment: &RiskAssessment, hotspots: &Hotspots) -> Vec<RiskMetric> {
    // Surface the top driver on the score card so it is visible at a glance
    let score_change = match assessment.top_driver() {
        Some(driver) => format!("Drivers: {}", driver),
        None => "Stable".to_string(),
    };

    let confidence = if assessment.is_fallback() {
        "Unavailable"
    } else {
        "High"
    };

    vec![
        RiskMetric {
            title: "Avg. Risk Score (ML)".to_string(),
            value: format_out_of_100(assessment.score),
            change: Some(score_change),
            trend: Trend::Up,
            status: assessment.tier,
        },
        RiskMetric {
            title: "Heuristic Baseline".to_string(),
            value: format_out_of_100(assessment.baseline.score),
            change: Some("0%".to_string()),
            trend: Trend::Neutral,
            status: assessment.baseline.tier,
        },
        RiskMetric {
            title: "Active Hotspots".to_string(),
            value: hotspots.count.to_string(),
            change: hotspots.change.clone(),
            trend: Trend::Up,
            status: RiskTier::Moderate,
        },
        RiskMetric {
            title: "Model Confidence".to_string(),
            value: confidence.to_string(),
            change: None,
            trend: Trend::Neutral,
            status: RiskTier::Low,
        },
    ]
}

fn format_out_of_100(score: f64) -> String {
    format!("{}/100", score.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{assess_offline, AssessmentSource, Baseline};

    fn model_assessment() -> RiskAssessment {
        RiskAssessment {
            score: 91.0,
            tier: RiskTier::Extreme,
            source: AssessmentSource::Model,
            top_drivers: vec!["wind".to_string()],
            baseline: Baseline {
                score: 40.0,
                tier: RiskTier::Moderate,
            },
        }
    }

    #[test]
    fn test_metrics_from_model() {
        let metrics = build_metrics(&model_assessment(), &Hotspots::default());
        assert_eq!(metrics.len(), 4);

        assert_eq!(metrics[0].value, "91/100");
        assert_eq!(metrics[0].change.as_deref(), Some("Drivers: wind"));
        assert_eq!(metrics[0].status, RiskTier::Extreme);

        assert_eq!(metrics[1].value, "40/100");
        assert_eq!(metrics[1].status, RiskTier::Moderate);
        assert_eq!(metrics[1].trend, Trend::Neutral);

        assert_eq!(metrics[2].value, "14");
        assert_eq!(metrics[2].change.as_deref(), Some("+2"));

        assert_eq!(metrics[3].value, "High");
    }

    #[test]
    fn test_metrics_from_fallback() {
        let assessment = assess_offline(&EnvironmentalReading::default());
        let metrics = build_metrics(&assessment, &Hotspots::default());

        // 62.5 rounds half away from zero
        assert_eq!(metrics[0].value, "63/100");
        assert_eq!(metrics[0].change.as_deref(), Some("Drivers: Data Unavailable"));
        assert_eq!(metrics[0].status, RiskTier::High);
        assert_eq!(metrics[1].value, "63/100");
        assert_eq!(metrics[3].value, "Unavailable");
    }

    #[test]
    fn test_metrics_without_drivers_are_stable() {
        let mut assessment = model_assessment();
        assessment.top_drivers.clear();
        let metrics = build_metrics(&assessment, &Hotspots::default());
        assert_eq!(metrics[0].change.as_deref(), Some("Stable"));
    }

    #[tokio::test]
    async fn test_load_snapshot_offline() {
        let config = Config::default();
        let snapshot = load_snapshot(&config, config.conditions, None, None).await;
        assert_eq!(snapshot.assessment.source, AssessmentSource::Fallback);
        assert_eq!(snapshot.metrics.len(), 4);
        assert_eq!(snapshot.alerts.len(), 2);
        assert_eq!(snapshot.zones.len(), 3);
        assert_eq!(snapshot.trend.labels.len(), 7);
    }
}
