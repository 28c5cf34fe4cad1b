use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{get_config_path, save_config, Config, PredictorConfig};
use crate::scoring::EnvironmentalReading;

/// Print `message` and read one trimmed line from stdin.
fn ask(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout().flush().context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Empty answer means "take the default"
fn or_default(input: String, default: &str) -> String {
    if input.is_empty() {
        default.to_string()
    } else {
        input
    }
}

fn parse_yes_no(input: &str, default_yes: bool) -> bool {
    match input.to_lowercase().as_str() {
        "" => default_yes,
        "y" | "yes" => true,
        _ => false,
    }
}

fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    Ok(or_default(ask(&format!("{} [{}]: ", message, default))?, default))
}

fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    Ok(parse_yes_no(&ask(&format!("{} [{}]: ", message, hint))?, default_yes))
}

/// Prompt until the user enters a number accepted by `check`.
fn prompt_number(message: &str, default: f64, check: impl Fn(f64) -> Result<(), String>) -> Result<f64> {
    loop {
        let input = prompt_with_default(message, &default.to_string())?;
        match input.parse::<f64>() {
            Ok(v) if !v.is_finite() => println!("  Invalid: must be a finite number. Try again."),
            Ok(v) => match check(v) {
                Ok(()) => return Ok(v),
                Err(e) => println!("  Invalid: {}. Try again.", e),
            },
            Err(_) => println!("  Invalid: not a number. Try again."),
        }
    }
}

fn within(min: f64, max: f64) -> impl Fn(f64) -> Result<(), String> {
    move |v| {
        if (min..=max).contains(&v) {
            Ok(())
        } else {
            Err(format!("must be between {} and {}", min, max))
        }
    }
}

/// Explanatory line, indented under the prompts
fn note(text: &str) {
    println!("  {}", text);
}

/// Check that a predictor URL is an absolute http(s) URL.
fn validate_url(s: &str) -> Result<(), String> {
    let url = reqwest::Url::parse(s).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("unsupported scheme '{}'", other)),
    }
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("GeoFire Configuration Wizard");
    println!("============================");
    println!();

    // 1. Prediction service
    note("GeoFire asks a prediction service for the risk score and falls back to a local formula when it can't be reached.");
    let enabled = prompt_yes_no("Use a prediction service?", true)?;

    let predictor = if enabled {
        let url = loop {
            let input = prompt_with_default("Prediction endpoint", crate::predictor::DEFAULT_PREDICTOR_URL)?;
            match validate_url(&input) {
                Ok(()) => break input,
                Err(e) => println!("  Invalid: {}. Try again.", e),
            }
        };

        note("A timeout stops a slow service from holding up the dashboard (e.g. '10s'). Leave empty to wait indefinitely.");
        let timeout = loop {
            let input = ask("Request timeout (empty = none): ")?;
            if input.is_empty() {
                break None;
            }
            match humantime::parse_duration(&input) {
                Ok(_) => break Some(input),
                Err(e) => println!("  Invalid: {}. Try again.", e),
            }
        };

        PredictorConfig {
            url,
            enabled: true,
            timeout,
        }
    } else {
        PredictorConfig {
            enabled: false,
            ..PredictorConfig::default()
        }
    };

    // 2. Current conditions
    println!();
    let defaults = EnvironmentalReading::default();
    let configure_conditions =
        prompt_yes_no("Enter current weather conditions? (n keeps the Napa Valley sample)", false)?;

    let conditions = if configure_conditions {
        note("Values outside these ranges are clamped when scoring.");
        EnvironmentalReading {
            temperature_celsius: prompt_number(
                "Temperature (C, 0-50)",
                defaults.temperature_celsius,
                within(-60.0, 60.0),
            )?,
            relative_humidity_percent: prompt_number(
                "Relative humidity (%, 0-100)",
                defaults.relative_humidity_percent,
                within(0.0, 100.0),
            )?,
            wind_speed_kmh: prompt_number(
                "Wind speed (km/h, 0-100)",
                defaults.wind_speed_kmh,
                within(0.0, 400.0),
            )?,
            vegetation_moisture_fraction: prompt_number(
                "Vegetation moisture (0 = bone dry, 1 = saturated)",
                defaults.vegetation_moisture_fraction,
                within(0.0, 1.0),
            )?,
        }
    } else {
        defaults
    };

    // 3. Refresh interval
    println!();
    let auto_refresh_interval = loop {
        let input = prompt_with_default("Dashboard auto-refresh interval in seconds", "300")?;
        match input.parse::<u64>() {
            Ok(v) if v > 0 => break v,
            _ => println!("  Invalid: must be a positive whole number. Try again."),
        }
    };

    // 4. Config path
    let default_config_path = default_path.unwrap_or_else(get_config_path);
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    // Check if file already exists
    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 5. Write config (alerts, trend and zones keep the sample data)
    let config = Config {
        predictor,
        auto_refresh_interval,
        conditions,
        ..Config::default()
    };

    save_config(&config_path, &config)?;

    println!();
    println!("Config written to {}", config_path.display());
    note("Alerts, the trend chart and map zones use sample data; edit the file to replace them.");
    println!("Run `geofire` to get started.");

    Ok(())
}
