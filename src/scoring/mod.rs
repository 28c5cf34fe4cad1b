pub mod assessment;
pub mod engine;
pub mod reading;
pub mod scorer;
pub mod season;
pub mod tier;

pub use assessment::{AssessmentSource, Baseline, RiskAssessment};
pub use engine::{breakdown, explain_drivers, heuristic_score, FactorContribution, ScoreBreakdown};
pub use reading::{EnvironmentalReading, NormalizedReading};
pub use scorer::{assess, assess_offline, assess_until, DATA_UNAVAILABLE};
pub use season::{apply_seasonality, apply_seasonality_on, is_fire_season};
pub use tier::{ParseTierError, RiskTier};
