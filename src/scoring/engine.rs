use super::reading::EnvironmentalReading;

// Formula weights. These are a fixed policy: changing any of them breaks
// numeric compatibility with scores produced by earlier releases and by the
// prediction service's own baseline.
pub const TEMP_WEIGHT: f64 = 40.0;
pub const WIND_WEIGHT: f64 = 20.0;
pub const HUMIDITY_WEIGHT: f64 = -30.0;
pub const VEG_WEIGHT: f64 = -30.0;
pub const INTERCEPT: f64 = 40.0;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// Driver label returned when no factor stands out
pub const NORMAL_CONDITIONS: &str = "Normal Conditions";

const DRIVER_THRESHOLD: f64 = 0.6;
const MAX_DRIVERS: usize = 3;

#[derive(Debug, Clone)]
pub struct FactorContribution {
    pub label: String,  // e.g. "Temperature", "Humidity"
    pub input: f64,     // Normalized input, 0-1
    pub weight: f64,    // Formula weight applied to the input
    pub contribution: f64,
}

#[derive(Debug, Clone)]
pub struct ScoreBreakdown {
    pub intercept: f64,
    pub factors: Vec<FactorContribution>,
    pub raw: f64,   // Before clamping
    pub score: f64, // Clamped into [0, 100]
}

/// Local heuristic risk score on the 0-100 scale.
pub fn heuristic_score(reading: &EnvironmentalReading) -> f64 {
    let n = reading.normalized();
    let raw = TEMP_WEIGHT * n.temp + WIND_WEIGHT * n.wind + HUMIDITY_WEIGHT * n.humidity
        + VEG_WEIGHT * n.veg
        + INTERCEPT;
    clamp_score(raw)
}

/// Clamp any score into [0, 100]. NaN collapses to 0.
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        MIN_SCORE
    } else {
        score.clamp(MIN_SCORE, MAX_SCORE)
    }
}

/// Per-term view of the heuristic formula, in formula order.
pub fn breakdown(reading: &EnvironmentalReading) -> ScoreBreakdown {
    let n = reading.normalized();
    let terms = [
        ("Temperature", n.temp, TEMP_WEIGHT),
        ("Wind", n.wind, WIND_WEIGHT),
        ("Humidity", n.humidity, HUMIDITY_WEIGHT),
        ("Vegetation Moisture", n.veg, VEG_WEIGHT),
    ];

    let factors: Vec<FactorContribution> = terms
        .iter()
        .map(|(label, input, weight)| FactorContribution {
            label: label.to_string(),
            input: *input,
            weight: *weight,
            contribution: weight * input,
        })
        .collect();

    let raw = factors.iter().map(|f| f.contribution).sum::<f64>() + INTERCEPT;

    ScoreBreakdown {
        intercept: INTERCEPT,
        factors,
        raw,
        score: heuristic_score(reading),
    }
}

/// Name the factors pushing risk up, strongest first, at most three.
///
/// Returns `["Normal Conditions"]` when nothing crosses its threshold.
pub fn explain_drivers(reading: &EnvironmentalReading) -> Vec<String> {
    let n = reading.normalized();
    let mut contributions: Vec<(&str, f64)> = Vec::new();

    if n.temp > DRIVER_THRESHOLD {
        contributions.push(("High Temperature", TEMP_WEIGHT * n.temp));
    }

    if n.wind > DRIVER_THRESHOLD {
        contributions.push(("Strong Winds", WIND_WEIGHT * n.wind));
    }

    let dryness = 1.0 - n.humidity;
    if dryness > DRIVER_THRESHOLD {
        contributions.push(("Low Humidity", HUMIDITY_WEIGHT.abs() * dryness));
    }

    let fuel_dryness = 1.0 - n.veg;
    if fuel_dryness > DRIVER_THRESHOLD {
        contributions.push(("Dry Vegetation", VEG_WEIGHT.abs() * fuel_dryness));
    }

    // Hot and windy together spread fire faster than either alone
    if n.temp > 0.8 && n.wind > 0.7 {
        contributions.push(("Heat+Wind Interaction", 20.0));
    }

    if contributions.is_empty() {
        return vec![NORMAL_CONDITIONS.to_string()];
    }

    // Stable sort keeps listing order for equal contributions
    contributions.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    contributions
        .into_iter()
        .take(MAX_DRIVERS)
        .map(|(label, _)| label.to_string())
        .collect()
}
