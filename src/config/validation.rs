use super::schema::Config;

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    // Predictor endpoint
    match reqwest::Url::parse(&config.predictor.url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(format!(
            "predictor.url: unsupported scheme '{}' (expected http or https)",
            url.scheme()
        )),
        Err(e) => errors.push(format!(
            "predictor.url: invalid '{}' - {}",
            config.predictor.url, e
        )),
    }

    if let Err(e) = config.predictor.timeout_duration() {
        errors.push(format!("predictor.timeout: {:#}", e));
    }

    if config.auto_refresh_interval == 0 {
        errors.push("auto_refresh_interval: must be greater than zero".to_string());
    }

    // Conditions are clamped at scoring time, but they must at least be numbers
    let c = &config.conditions;
    for (name, value) in [
        ("temp", c.temperature_celsius),
        ("humidity", c.relative_humidity_percent),
        ("wind", c.wind_speed_kmh),
        ("veg_moisture", c.vegetation_moisture_fraction),
    ] {
        if !value.is_finite() {
            errors.push(format!("conditions.{}: must be a finite number", name));
        }
    }

    for (i, alert) in config.alerts.iter().enumerate() {
        if let Err(e) = alert.age_duration() {
            errors.push(format!("alerts[{}].age: {:#}", i, e));
        }
    }

    let label_count = config.trend.labels.len();
    for (i, series) in config.trend.series.iter().enumerate() {
        if series.data.len() != label_count {
            errors.push(format!(
                "trend.series[{}]: '{}' has {} points but there are {} labels",
                i,
                series.label,
                series.data.len(),
                label_count
            ));
        }
    }

    for (i, zone) in config.zones.iter().enumerate() {
        if zone.polygon.len() < 4 {
            errors.push(format!(
                "zones[{}].polygon: '{}' needs at least 4 points, got {}",
                i,
                zone.name,
                zone.polygon.len()
            ));
        } else if zone.polygon.first() != zone.polygon.last() {
            errors.push(format!(
                "zones[{}].polygon: '{}' is not a closed ring (first point must equal last)",
                i, zone.name
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_invalid_url() {
        let mut config = Config::default();
        config.predictor.url = "not a url".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("predictor.url"));
    }

    #[test]
    fn test_unsupported_scheme() {
        let mut config = Config::default();
        config.predictor.url = "ftp://example.com/predict".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("unsupported scheme 'ftp'"));
    }

    #[test]
    fn test_invalid_timeout() {
        let mut config = Config::default();
        config.predictor.timeout = Some("eventually".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("predictor.timeout"));
    }

    #[test]
    fn test_zero_refresh_interval() {
        let mut config = Config::default();
        config.auto_refresh_interval = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("auto_refresh_interval"));
    }

    #[test]
    fn test_non_finite_condition() {
        let mut config = Config::default();
        config.conditions.wind_speed_kmh = f64::NAN;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec!["conditions.wind: must be a finite number".to_string()]);
    }

    #[test]
    fn test_trend_length_mismatch() {
        let mut config = Config::default();
        config.trend.series[1].data.pop();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("trend.series[1]"));
        assert!(errors[0].contains("6 points"));
    }

    #[test]
    fn test_open_polygon() {
        let mut config = Config::default();
        config.zones[0].polygon.pop();
        config.zones[0].polygon.push([0.0, 0.0]);
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("not a closed ring"));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = Config::default();
        config.predictor.url = "nope".to_string();
        config.auto_refresh_interval = 0;
        config.alerts[0].age = "whenever".to_string();
        config.zones[2].polygon.truncate(2);
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }
}
