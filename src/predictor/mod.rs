pub mod http;
pub mod types;

pub use http::{install_crypto_provider, HttpPredictor, DEFAULT_PREDICTOR_URL};
pub use types::{Prediction, PredictResponse};

use async_trait::async_trait;
use thiserror::Error;

use crate::scoring::EnvironmentalReading;

/// The remote model could not produce a usable prediction.
///
/// Transport failures, non-success statuses and malformed payloads all map
/// to this one error; the reason exists for logging only.
#[derive(Debug, Error)]
#[error("remote predictor unavailable: {reason}")]
pub struct RemoteUnavailable {
    reason: String,
}

impl RemoteUnavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// A remote risk model.
///
/// Implementations make exactly one attempt per call and never retry.
#[async_trait]
pub trait RemotePredictor: Send + Sync {
    async fn predict(&self, reading: &EnvironmentalReading) -> Result<Prediction, RemoteUnavailable>;
}
