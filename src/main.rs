use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use geofire::config::Config;
use geofire::predictor::{HttpPredictor, RemotePredictor};
use geofire::scoring::{EnvironmentalReading, RiskAssessment};

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_CONFIG: i32 = 4;

/// Deadline for the one-shot plain dashboard, matching the TUI's
const PLAIN_DASHBOARD_DEADLINE: Duration = Duration::from_secs(20);

#[derive(Args, Debug, Default)]
struct AssessArgs {
    /// Air temperature in °C (overrides config)
    #[arg(long)]
    temp: Option<f64>,

    /// Relative humidity in % (overrides config)
    #[arg(long)]
    humidity: Option<f64>,

    /// Wind speed in km/h (overrides config)
    #[arg(long)]
    wind: Option<f64>,

    /// Vegetation moisture, 0-1 (overrides config)
    #[arg(long)]
    veg: Option<f64>,

    /// Adjust conditions for the season of this date (YYYY-MM-DD)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Skip the prediction service and use the local formula
    #[arg(long)]
    offline: bool,

    /// Print the assessment as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ThemeArg {
    Auto,
    Dark,
    Light,
}

impl From<ThemeArg> for geofire::tui::Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Auto => geofire::tui::Theme::Auto,
            ThemeArg::Dark => geofire::tui::Theme::Dark,
            ThemeArg::Light => geofire::tui::Theme::Light,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score the current conditions (default if no subcommand)
    Assess(AssessArgs),
    /// Launch the terminal dashboard
    Dashboard {
        /// Skip the prediction service and use the local formula
        #[arg(long)]
        offline: bool,

        /// Print the dashboard once as plain text instead of the TUI
        #[arg(long)]
        plain: bool,

        /// Color theme
        #[arg(long, value_enum, default_value_t = ThemeArg::Auto)]
        theme: ThemeArg,
    },
    /// List the mapped risk zones
    Zones {
        /// Print a GeoJSON FeatureCollection instead of a table
        #[arg(long)]
        geojson: bool,
    },
    /// Create a config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "geofire")]
#[command(about = "Wildfire risk scoring with a terminal dashboard", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/geofire/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Build the prediction client unless the run is offline or the service is
/// disabled in config.
fn build_predictor(config: &Config, offline: bool) -> anyhow::Result<Option<Arc<dyn RemotePredictor>>> {
    if offline {
        debug!("offline run, prediction service skipped");
        return Ok(None);
    }
    let predictor = HttpPredictor::from_config(&config.predictor)?;
    if let Some(p) = &predictor {
        debug!(url = p.url(), "using prediction service");
    }
    Ok(predictor.map(|p| Arc::new(p) as Arc<dyn RemotePredictor>))
}

fn predictor_or_exit(config: &Config, offline: bool) -> Option<Arc<dyn RemotePredictor>> {
    match build_predictor(config, offline) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Failed to create prediction client: {:#}", e);
            std::process::exit(EXIT_NETWORK);
        }
    }
}

fn apply_overrides(mut reading: EnvironmentalReading, args: &AssessArgs) -> EnvironmentalReading {
    if let Some(temp) = args.temp {
        reading.temperature_celsius = temp;
    }
    if let Some(humidity) = args.humidity {
        reading.relative_humidity_percent = humidity;
    }
    if let Some(wind) = args.wind {
        reading.wind_speed_kmh = wind;
    }
    if let Some(veg) = args.veg {
        reading.vegetation_moisture_fraction = veg;
    }
    if let Some(date) = args.date {
        reading = geofire::scoring::apply_seasonality_on(&reading, date);
    }
    reading
}

fn print_assessment(assessment: &RiskAssessment, reading: &EnvironmentalReading, json: bool, verbose: bool) {
    if json {
        match serde_json::to_string_pretty(assessment) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Failed to serialize assessment: {}", e);
                std::process::exit(EXIT_FAILURE);
            }
        }
        return;
    }

    let use_colors = geofire::output::should_use_colors();
    println!("{}", geofire::output::format_assessment(assessment, use_colors));

    if verbose {
        println!();
        let terms = geofire::scoring::breakdown(reading);
        println!("{}", geofire::output::format_breakdown(&terms));
        println!(
            "Local drivers: {}",
            geofire::scoring::explain_drivers(reading).join(", ")
        );
    }
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+)
    geofire::predictor::install_crypto_provider();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Assess(AssessArgs::default()));
    let start_time = Instant::now();

    if let Err(e) = geofire::logging::init_logging(cli.verbose) {
        eprintln!("{}", e);
    }

    let config_path = cli.config.map(PathBuf::from);

    // The wizard runs before loading so it works without an existing file
    if let Commands::Init = command {
        if let Err(e) = geofire::config::init::run_init_wizard(config_path) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    let config = match geofire::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = geofire::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    match command {
        Commands::Assess(args) => {
            let reading = apply_overrides(config.conditions, &args);
            if reading.is_out_of_domain() {
                warn!(?reading, "reading outside the expected physical range, inputs will be clamped");
            }

            let predictor = predictor_or_exit(&config, args.offline);
            let assessment = geofire::scoring::assess(&reading, predictor.as_deref()).await;
            print_assessment(&assessment, &reading, args.json, cli.verbose);
        }
        Commands::Dashboard {
            offline,
            plain,
            theme,
        } => {
            let predictor = predictor_or_exit(&config, offline);
            let reading = config.conditions;

            // Non-terminal stdout can't host the TUI
            if plain || !geofire::output::should_use_colors() {
                let snapshot = geofire::dashboard::load_snapshot(
                    &config,
                    reading,
                    predictor.as_deref(),
                    Some(PLAIN_DASHBOARD_DEADLINE),
                )
                .await;
                let use_colors = geofire::output::should_use_colors();
                println!("{}", geofire::output::format_metrics(&snapshot.metrics, use_colors));
                println!();
                println!("{}", geofire::output::format_trend(&snapshot.trend));
                println!();
                println!("{}", geofire::output::format_alerts(&snapshot.alerts, use_colors));
            } else {
                let colors = geofire::tui::resolve_theme(theme.into());
                let app = geofire::tui::App::new_loading(config.clone(), reading, colors);
                if let Err(e) = geofire::tui::run_tui(app, predictor).await {
                    eprintln!("Dashboard error: {:#}", e);
                    std::process::exit(EXIT_FAILURE);
                }
            }
        }
        Commands::Zones { geojson } => {
            if geojson {
                let collection = geofire::dashboard::zones_to_geojson(&config.zones);
                match serde_json::to_string_pretty(&collection) {
                    Ok(s) => println!("{}", s),
                    Err(e) => {
                        eprintln!("Failed to serialize zones: {}", e);
                        std::process::exit(EXIT_FAILURE);
                    }
                }
            } else {
                let use_colors = geofire::output::should_use_colors();
                println!("{}", geofire::output::format_zones_table(&config.zones, use_colors));
            }
        }
        // Handled before config load
        Commands::Init => {}
    }

    debug!(elapsed = ?start_time.elapsed(), "done");
    std::process::exit(EXIT_SUCCESS);
}
