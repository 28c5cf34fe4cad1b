use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Lower bound (inclusive) of the moderate tier
pub const MODERATE_THRESHOLD: f64 = 30.0;
/// Lower bound (inclusive) of the high tier
pub const HIGH_THRESHOLD: f64 = 50.0;
/// Lower bound (inclusive) of the extreme tier
pub const EXTREME_THRESHOLD: f64 = 80.0;

/// Discrete severity bucket derived from a 0-100 risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Moderate,
    High,
    Extreme,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown risk level '{0}' (expected low, moderate, high or extreme)")]
pub struct ParseTierError(pub String);

impl RiskTier {
    pub const ALL: [RiskTier; 4] = [
        RiskTier::Low,
        RiskTier::Moderate,
        RiskTier::High,
        RiskTier::Extreme,
    ];

    /// Classify a score. Buckets are half-open: 30, 50 and 80 belong to the
    /// higher tier.
    pub fn from_score(score: f64) -> Self {
        if score < MODERATE_THRESHOLD {
            RiskTier::Low
        } else if score < HIGH_THRESHOLD {
            RiskTier::Moderate
        } else if score < EXTREME_THRESHOLD {
            RiskTier::High
        } else {
            RiskTier::Extreme
        }
    }

    /// Lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Moderate => "moderate",
            RiskTier::High => "high",
            RiskTier::Extreme => "extreme",
        }
    }

    /// Capitalized display label
    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low",
            RiskTier::Moderate => "Moderate",
            RiskTier::High => "High",
            RiskTier::Extreme => "Extreme",
        }
    }

    /// Map fill colour used in GeoJSON output
    pub fn color_hex(&self) -> &'static str {
        match self {
            RiskTier::Low => "#22c55e",
            RiskTier::Moderate => "#eab308",
            RiskTier::High => "#f97316",
            RiskTier::Extreme => "#ef4444",
        }
    }

    /// Recommended field action for this tier
    pub fn action(&self) -> &'static str {
        match self {
            RiskTier::Low => "Normal",
            RiskTier::Moderate => "Caution",
            RiskTier::High => "Warning",
            RiskTier::Extreme => "Evacuate",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RiskTier {
    type Err = ParseTierError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        RiskTier::ALL
            .into_iter()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseTierError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_belong_to_higher_tier() {
        assert_eq!(RiskTier::from_score(30.0), RiskTier::Moderate);
        assert_eq!(RiskTier::from_score(50.0), RiskTier::High);
        assert_eq!(RiskTier::from_score(80.0), RiskTier::Extreme);
        assert_eq!(RiskTier::from_score(29.999), RiskTier::Low);
        assert_eq!(RiskTier::from_score(49.999), RiskTier::Moderate);
        assert_eq!(RiskTier::from_score(79.999), RiskTier::High);
    }

    #[test]
    fn test_classification_is_total_and_monotonic() {
        // Walk the whole scale in 0.01 steps; every score maps to exactly one
        // tier and tiers never step backwards
        let mut previous = RiskTier::Low;
        for step in 0..=10_000 {
            let score = step as f64 / 100.0;
            let tier = RiskTier::from_score(score);
            assert!(tier >= previous, "tier went backwards at {}", score);

            let expected = if score < 30.0 {
                RiskTier::Low
            } else if score < 50.0 {
                RiskTier::Moderate
            } else if score < 80.0 {
                RiskTier::High
            } else {
                RiskTier::Extreme
            };
            assert_eq!(tier, expected, "score {}", score);
            previous = tier;
        }
    }

    #[test]
    fn test_extremes_of_scale() {
        assert_eq!(RiskTier::from_score(0.0), RiskTier::Low);
        assert_eq!(RiskTier::from_score(100.0), RiskTier::Extreme);
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("EXTREME".parse::<RiskTier>(), Ok(RiskTier::Extreme));
        assert_eq!("Moderate".parse::<RiskTier>(), Ok(RiskTier::Moderate));
        assert_eq!(" high ".parse::<RiskTier>(), Ok(RiskTier::High));
        assert_eq!("low".parse::<RiskTier>(), Ok(RiskTier::Low));
    }

    #[test]
    fn test_parse_unknown() {
        let err = "severe".parse::<RiskTier>().unwrap_err();
        assert_eq!(err, ParseTierError("severe".to_string()));
        assert!("".parse::<RiskTier>().is_err());
    }

    #[test]
    fn test_presentation() {
        assert_eq!(RiskTier::High.label(), "High");
        assert_eq!(RiskTier::High.color_hex(), "#f97316");
        assert_eq!(RiskTier::Extreme.action(), "Evacuate");
        assert_eq!(RiskTier::Low.to_string(), "Low");
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&RiskTier::Moderate).unwrap();
        assert_eq!(json, "\"moderate\"");
        let parsed: RiskTier = serde_json::from_str("\"extreme\"").unwrap();
        assert_eq!(parsed, RiskTier::Extreme);
    }
}
