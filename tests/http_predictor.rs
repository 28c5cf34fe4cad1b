use std::time::Duration;

use geofire::predictor::{install_crypto_provider, HttpPredictor, RemotePredictor};
use geofire::scoring::{
    assess, assess_until, AssessmentSource, EnvironmentalReading, RiskTier, DATA_UNAVAILABLE,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn napa_afternoon() -> EnvironmentalReading {
    EnvironmentalReading::new(35.0, 15.0, 25.0, 0.2)
}

fn predictor_for(server: &MockServer) -> HttpPredictor {
    install_crypto_provider();
    HttpPredictor::new(format!("{}/predict", server.uri())).unwrap()
}

fn assert_fallback(result: &geofire::scoring::RiskAssessment) {
    assert_eq!(result.source, AssessmentSource::Fallback);
    assert!((result.score - 62.5).abs() < 1e-9);
    assert_eq!(result.tier, RiskTier::High);
    assert_eq!(result.top_drivers, vec![DATA_UNAVAILABLE.to_string()]);
    assert_eq!(result.baseline.score, result.score);
    assert_eq!(result.baseline.tier, result.tier);
}

#[tokio::test]
async fn test_model_response_is_used() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "temp": 35.0,
            "humidity": 15.0,
            "wind": 25.0,
            "veg_moisture": 0.2
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "risk_score": 91,
            "risk_level": "EXTREME",
            "baseline_score": 62.5,
            "baseline_level": "HIGH",
            "primary_drivers": ["wind"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let predictor = predictor_for(&server);
    let result = assess(&napa_afternoon(), Some(&predictor)).await;

    assert_eq!(result.source, AssessmentSource::Model);
    assert_eq!(result.score, 91.0);
    assert_eq!(result.tier, RiskTier::Extreme);
    assert_eq!(result.top_drivers, vec!["wind".to_string()]);
    assert_eq!(result.baseline.score, 62.5);
    assert_eq!(result.baseline.tier, RiskTier::High);
}

#[tokio::test]
async fn test_driver_order_preserved() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "risk_score": 55.0,
            "risk_level": "high",
            "baseline_score": 62.5,
            "baseline_level": "high",
            "primary_drivers": ["Strong Winds", "High Temperature", "Dry Vegetation"]
        })))
        .mount(&server)
        .await;

    let predictor = predictor_for(&server);
    let prediction = predictor.predict(&napa_afternoon()).await.unwrap();

    assert_eq!(
        prediction.drivers,
        vec!["Strong Winds", "High Temperature", "Dry Vegetation"]
    );
    assert_eq!(prediction.baseline.score, 62.5);
}

#[tokio::test]
async fn test_server_error_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1) // no retry
        .mount(&server)
        .await;

    let predictor = predictor_for(&server);
    let result = assess(&napa_afternoon(), Some(&predictor)).await;

    assert_fallback(&result);
}

#[tokio::test]
async fn test_malformed_body_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let predictor = predictor_for(&server);
    let result = assess(&napa_afternoon(), Some(&predictor)).await;

    assert_fallback(&result);
}

#[tokio::test]
async fn test_unknown_level_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "risk_score": 40.0,
            "risk_level": "catastrophic",
            "baseline_score": 62.5,
            "baseline_level": "high"
        })))
        .mount(&server)
        .await;

    let predictor = predictor_for(&server);
    let err = predictor.predict(&napa_afternoon()).await.unwrap_err();
    assert!(err.reason().contains("risk_level"));

    let result = assess(&napa_afternoon(), Some(&predictor)).await;
    assert_fallback(&result);
}

#[tokio::test]
async fn test_response_without_baseline_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "risk_score": 0.42,
            "risk_level": "Moderate"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let predictor = predictor_for(&server);
    let err = predictor.predict(&napa_afternoon()).await.unwrap_err();
    assert!(err.reason().contains("malformed response"));

    let result = assess(&napa_afternoon(), Some(&predictor)).await;
    assert_fallback(&result);
}

#[tokio::test]
async fn test_missing_score_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "risk_level": "low"
        })))
        .mount(&server)
        .await;

    let predictor = predictor_for(&server);
    let result = assess(&napa_afternoon(), Some(&predictor)).await;

    assert_fallback(&result);
}

#[tokio::test]
async fn test_unreachable_service_falls_back() {
    install_crypto_provider();
    // Port 1 is reserved and nothing listens there
    let predictor = HttpPredictor::new("http://127.0.0.1:1/predict").unwrap();
    let result = assess(&napa_afternoon(), Some(&predictor)).await;

    assert_fallback(&result);
}

#[tokio::test]
async fn test_request_timeout_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "risk_score": 91,
                    "risk_level": "extreme",
                    "baseline_score": 62.5,
                    "baseline_level": "high"
                }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let predictor = predictor_for(&server).with_timeout(Some(Duration::from_millis(200)));
    let result = assess(&napa_afternoon(), Some(&predictor)).await;

    assert_fallback(&result);
}

#[tokio::test]
async fn test_deadline_abandons_slow_service() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "risk_score": 91,
                    "risk_level": "extreme",
                    "baseline_score": 62.5,
                    "baseline_level": "high"
                }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let predictor = predictor_for(&server);
    let result = assess_until(
        &napa_afternoon(),
        Some(&predictor),
        tokio::time::sleep(Duration::from_millis(200)),
    )
    .await;

    assert_fallback(&result);
}
