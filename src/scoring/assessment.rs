use serde::{Deserialize, Serialize};

use super::tier::RiskTier;

/// Which computation path produced a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssessmentSource {
    /// The remote model answered
    Model,
    /// The local heuristic formula was used
    Fallback,
}

/// Heuristic baseline shown next to the model score for comparison
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub score: f64,
    pub tier: RiskTier,
}

/// Outcome of one assessment request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Always within [0, 100]
    pub score: f64,
    pub tier: RiskTier,
    pub source: AssessmentSource,
    /// Human-readable contributing factors, most significant first when the
    /// source orders them
    pub top_drivers: Vec<String>,
    pub baseline: Baseline,
}

impl RiskAssessment {
    pub fn is_fallback(&self) -> bool {
        self.source == AssessmentSource::Fallback
    }

    pub fn top_driver(&self) -> Option<&str> {
        self.top_drivers.first().map(String::as_str)
    }
}
