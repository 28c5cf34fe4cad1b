use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use super::types::{PredictResponse, Prediction};
use super::{RemotePredictor, RemoteUnavailable};
use crate::config::PredictorConfig;
use crate::scoring::EnvironmentalReading;

pub const DEFAULT_PREDICTOR_URL: &str = "http://localhost:8000/predict";

/// Install the ring crypto provider for rustls (required for rustls 0.23+).
/// Safe to call more than once.
pub fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// Prediction service reached over HTTP: one JSON POST per reading.
#[derive(Debug, Clone)]
pub struct HttpPredictor {
    client: reqwest::Client,
    url: String,
    timeout: Option<Duration>,
}

impl HttpPredictor {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("geofire/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            url: url.into(),
            timeout: None,
        })
    }

    /// Per-request timeout. Without one the call runs to completion or
    /// failure.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build from config. Returns `None` when the predictor is disabled.
    pub fn from_config(config: &PredictorConfig) -> Result<Option<Self>> {
        if !config.enabled {
            return Ok(None);
        }
        let timeout = config.timeout_duration()?;
        Ok(Some(Self::new(config.url.clone())?.with_timeout(timeout)))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RemotePredictor for HttpPredictor {
    async fn predict(&self, reading: &EnvironmentalReading) -> Result<Prediction, RemoteUnavailable> {
        debug!(url = %self.url, ?reading, "requesting remote prediction");

        let mut request = self.client.post(&self.url).json(reading);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RemoteUnavailable::new(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteUnavailable::new(format!(
                "predictor returned HTTP {}",
                status
            )));
        }

        let body: PredictResponse = response
            .json()
            .await
            .map_err(|e| RemoteUnavailable::new(format!("malformed response: {}", e)))?;

        debug!(score = body.risk_score, level = %body.risk_level, "remote prediction received");

        Prediction::try_from(body)
    }
}
