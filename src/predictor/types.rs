use serde::{Deserialize, Serialize};

use super::RemoteUnavailable;
use crate::scoring::{Baseline, RiskTier};

/// Body returned by the prediction service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictResponse {
    pub risk_score: f64,
    pub risk_level: String,
    pub baseline_score: f64,
    pub baseline_level: String,
    /// Absent or null means no drivers
    #[serde(default)]
    pub primary_drivers: Option<Vec<String>>,
}

/// A validated remote prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub score: f64,
    pub tier: RiskTier,
    /// Heuristic baseline as computed by the service
    pub baseline: Baseline,
    /// Contributing factors in the order the service listed them
    pub drivers: Vec<String>,
}

impl TryFrom<PredictResponse> for Prediction {
    type Error = RemoteUnavailable;

    fn try_from(response: PredictResponse) -> Result<Self, Self::Error> {
        if !response.risk_score.is_finite() {
            return Err(RemoteUnavailable::new(format!(
                "risk_score is not finite: {}",
                response.risk_score
            )));
        }

        let tier: RiskTier = response
            .risk_level
            .parse()
            .map_err(|e| RemoteUnavailable::new(format!("risk_level: {}", e)))?;

        if !response.baseline_score.is_finite() {
            return Err(RemoteUnavailable::new(format!(
                "baseline_score is not finite: {}",
                response.baseline_score
            )));
        }

        let baseline_tier: RiskTier = response
            .baseline_level
            .parse()
            .map_err(|e| RemoteUnavailable::new(format!("baseline_level: {}", e)))?;

        Ok(Prediction {
            score: response.risk_score,
            tier,
            baseline: Baseline {
                score: response.baseline_score,
                tier: baseline_tier,
            },
            drivers: response.primary_drivers.unwrap_or_default(),
        })
    }
}
