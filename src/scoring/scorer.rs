use std::future::Future;
use tracing::{debug, warn};

use super::assessment::{AssessmentSource, Baseline, RiskAssessment};
use super::engine::{clamp_score, heuristic_score};
use super::reading::EnvironmentalReading;
use super::tier::RiskTier;
use crate::predictor::{Prediction, RemotePredictor, RemoteUnavailable};

/// Sole driver reported when the remote model could not be used
pub const DATA_UNAVAILABLE: &str = "Data Unavailable";

/// Assess a reading, preferring the remote model when one is supplied.
///
/// Makes at most one remote attempt. Any remote failure is absorbed and the
/// local formula is used instead, so this always returns an assessment.
pub async fn assess(
    reading: &EnvironmentalReading,
    remote: Option<&dyn RemotePredictor>,
) -> RiskAssessment {
    let Some(predictor) = remote else {
        return assess_offline(reading);
    };

    let outcome = predictor.predict(reading).await;
    resolve(reading, Some(outcome))
}

/// Like [`assess`], but gives up on the remote call once `cancel` resolves.
///
/// The pending remote future is dropped before the fallback is computed, so
/// nothing is left running in the background.
pub async fn assess_until<C>(
    reading: &EnvironmentalReading,
    remote: Option<&dyn RemotePredictor>,
    cancel: C,
) -> RiskAssessment
where
    C: Future<Output = ()>,
{
    let Some(predictor) = remote else {
        return assess_offline(reading);
    };

    let outcome = tokio::select! {
        result = predictor.predict(reading) => Some(result),
        () = cancel => None,
    };

    resolve(reading, outcome)
}

/// Fallback path only: local formula plus the data-unavailable sentinel.
pub fn assess_offline(reading: &EnvironmentalReading) -> RiskAssessment {
    if reading.is_out_of_domain() {
        debug!(?reading, "reading outside nominal domain, clamping");
    }

    let score = heuristic_score(reading);
    let tier = RiskTier::from_score(score);

    RiskAssessment {
        score,
        tier,
        source: AssessmentSource::Fallback,
        top_drivers: vec![DATA_UNAVAILABLE.to_string()],
        baseline: Baseline { score, tier },
    }
}

fn resolve(
    reading: &EnvironmentalReading,
    outcome: Option<Result<Prediction, RemoteUnavailable>>,
) -> RiskAssessment {
    match outcome {
        Some(Ok(prediction)) => from_prediction(prediction),
        Some(Err(e)) => {
            warn!(reason = e.reason(), "prediction service unavailable, using fallback formula");
            assess_offline(reading)
        }
        None => {
            warn!("remote prediction cancelled, using fallback formula");
            assess_offline(reading)
        }
    }
}

fn from_prediction(prediction: Prediction) -> RiskAssessment {
    RiskAssessment {
        score: clamp_score(prediction.score),
        tier: prediction.tier,
        source: AssessmentSource::Model,
        top_drivers: prediction.drivers,
        baseline: Baseline {
            score: clamp_score(prediction.baseline.score),
            tier: prediction.baseline.tier,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn napa() -> EnvironmentalReading {
        EnvironmentalReading::new(35.0, 15.0, 25.0, 0.2)
    }

    /// Predictor returning a canned result and counting calls
    struct StubPredictor {
        result: Result<Prediction, String>,
        calls: AtomicUsize,
    }

    impl StubPredictor {
        fn answering(prediction: Prediction) -> Self {
            Self {
                result: Ok(prediction),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(reason: &str) -> Self {
            Self {
                result: Err(reason.to_string()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl RemotePredictor for StubPredictor {
        async fn predict(
            &self,
            _reading: &EnvironmentalReading,
        ) -> Result<Prediction, RemoteUnavailable> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone().map_err(RemoteUnavailable::new)
        }
    }

    /// Predictor that never answers
    struct HangingPredictor;

    #[async_trait]
    impl RemotePredictor for HangingPredictor {
        async fn predict(
            &self,
            _reading: &EnvironmentalReading,
        ) -> Result<Prediction, RemoteUnavailable> {
            std::future::pending().await
        }
    }

    fn extreme_prediction() -> Prediction {
        Prediction {
            score: 91.0,
            tier: RiskTier::Extreme,
            baseline: Baseline {
                score: 40.0,
                tier: RiskTier::Moderate,
            },
            drivers: vec!["wind".to_string()],
        }
    }

    #[tokio::test]
    async fn test_fallback_without_predictor() {
        let result = assess(&napa(), None).await;
        assert!((result.score - 62.5).abs() < 1e-9);
        assert_eq!(result.tier, RiskTier::High);
        assert_eq!(result.source, AssessmentSource::Fallback);
        assert_eq!(result.top_drivers, vec![DATA_UNAVAILABLE]);
        assert_eq!(result.baseline.score, result.score);
    }

    #[tokio::test]
    async fn test_model_result_used() {
        let stub = StubPredictor::answering(extreme_prediction());
        let result = assess(&napa(), Some(&stub)).await;
        assert_eq!(result.score, 91.0);
        assert_eq!(result.tier, RiskTier::Extreme);
        assert_eq!(result.source, AssessmentSource::Model);
        assert_eq!(result.top_drivers, vec!["wind"]);
        assert_eq!(result.baseline.score, 40.0);
        assert_eq!(result.baseline.tier, RiskTier::Moderate);
    }

    #[tokio::test]
    async fn test_single_attempt_on_failure() {
        let stub = StubPredictor::failing("HTTP 500");
        let result = assess(&napa(), Some(&stub)).await;
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.source, AssessmentSource::Fallback);
        assert_eq!(result.top_drivers.len(), 1);
        assert_eq!(result.top_drivers[0], DATA_UNAVAILABLE);
        assert_eq!(result.tier, RiskTier::High);
    }

    #[tokio::test]
    async fn test_remote_score_clamped() {
        let stub = StubPredictor::answering(Prediction {
            score: 140.0,
            tier: RiskTier::Extreme,
            baseline: Baseline {
                score: -5.0,
                tier: RiskTier::Low,
            },
            drivers: vec![],
        });
        let result = assess(&napa(), Some(&stub)).await;
        assert_eq!(result.score, 100.0);
        assert_eq!(result.baseline.score, 0.0);
        assert!(result.top_drivers.is_empty());
    }

    #[tokio::test]
    async fn test_service_baseline_and_driver_order_kept() {
        let stub = StubPredictor::answering(Prediction {
            score: 70.0,
            tier: RiskTier::High,
            baseline: Baseline {
                score: 58.0,
                tier: RiskTier::High,
            },
            drivers: vec!["Strong Winds".to_string(), "Low Humidity".to_string()],
        });
        let result = assess(&napa(), Some(&stub)).await;
        // Reported baseline is used as-is, not recomputed locally
        assert_eq!(result.baseline.score, 58.0);
        assert_eq!(result.baseline.tier, RiskTier::High);
        assert_eq!(result.top_drivers, vec!["Strong Winds", "Low Humidity"]);
    }

    #[tokio::test]
    async fn test_idempotent_offline() {
        let a = assess(&napa(), None).await;
        let b = assess(&napa(), None).await;
        assert_eq!(a.score.to_bits(), b.score.to_bits());
        assert_eq!(a.tier, b.tier);
    }

    #[tokio::test]
    async fn test_cancelled_call_falls_back() {
        let result = assess_until(&napa(), Some(&HangingPredictor), async {}).await;
        assert_eq!(result.source, AssessmentSource::Fallback);
        assert_eq!(result.top_drivers, vec![DATA_UNAVAILABLE]);
    }

    #[tokio::test]
    async fn test_timeout_as_cancel_signal() {
        let result = assess_until(
            &napa(),
            Some(&HangingPredictor),
            tokio::time::sleep(Duration::from_millis(20)),
        )
        .await;
        assert!(result.is_fallback());
    }

    #[tokio::test]
    async fn test_uncancelled_call_completes() {
        let stub = StubPredictor::answering(extreme_prediction());
        let result = assess_until(&napa(), Some(&stub), std::future::pending()).await;
        assert_eq!(result.source, AssessmentSource::Model);
        assert_eq!(result.top_driver(), Some("wind"));
    }

    #[test]
    fn test_offline_out_of_range_inputs() {
        let result = assess_offline(&EnvironmentalReading::new(100.0, -50.0, 200.0, -1.0));
        assert_eq!(result.score, 100.0);
        assert_eq!(result.tier, RiskTier::Extreme);
    }
}
