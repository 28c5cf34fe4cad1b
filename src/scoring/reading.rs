use serde::{Deserialize, Serialize};

/// Raw weather readings fed into the scorer.
///
/// Serialized with the predictor's wire keys (`temp`, `humidity`, `wind`,
/// `veg_moisture`), which are also the keys used under `conditions:` in the
/// config file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentalReading {
    /// Air temperature in degrees Celsius
    #[serde(rename = "temp")]
    pub temperature_celsius: f64,

    /// Relative humidity, 0-100
    #[serde(rename = "humidity")]
    pub relative_humidity_percent: f64,

    /// Wind speed in km/h
    #[serde(rename = "wind")]
    pub wind_speed_kmh: f64,

    /// Vegetation moisture, 0-1 (lower = drier)
    #[serde(rename = "veg_moisture")]
    pub vegetation_moisture_fraction: f64,
}

impl Default for EnvironmentalReading {
    /// Napa Valley summer afternoon
    fn default() -> Self {
        Self {
            temperature_celsius: 35.0,
            relative_humidity_percent: 15.0,
            wind_speed_kmh: 25.0,
            vegetation_moisture_fraction: 0.2,
        }
    }
}

/// Reading with every field mapped onto [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedReading {
    pub temp: f64,
    pub humidity: f64,
    pub wind: f64,
    pub veg: f64,
}

impl EnvironmentalReading {
    pub fn new(
        temperature_celsius: f64,
        relative_humidity_percent: f64,
        wind_speed_kmh: f64,
        vegetation_moisture_fraction: f64,
    ) -> Self {
        Self {
            temperature_celsius,
            relative_humidity_percent,
            wind_speed_kmh,
            vegetation_moisture_fraction,
        }
    }

    /// Scale each field by its full-range constant and clamp into [0, 1].
    /// Out-of-domain values are pulled back into range, never rejected.
    pub fn normalized(&self) -> NormalizedReading {
        NormalizedReading {
            temp: unit(self.temperature_celsius / 50.0),
            humidity: unit(self.relative_humidity_percent / 100.0),
            wind: unit(self.wind_speed_kmh / 100.0),
            veg: unit(self.vegetation_moisture_fraction),
        }
    }

    /// True when any field lies outside its stated domain
    pub fn is_out_of_domain(&self) -> bool {
        !(0.0..=50.0).contains(&self.temperature_celsius)
            || !(0.0..=100.0).contains(&self.relative_humidity_percent)
            || !(0.0..=100.0).contains(&self.wind_speed_kmh)
            || !(0.0..=1.0).contains(&self.vegetation_moisture_fraction)
    }
}

fn unit(value: f64) -> f64 {
    // NaN has no meaningful position on the scale; treat it as the floor
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
