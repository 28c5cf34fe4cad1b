use chrono::{Datelike, NaiveDate};

use super::reading::EnvironmentalReading;

/// Whether a month (1-12) falls in the June-October fire season
pub fn is_fire_season(month: u32) -> bool {
    (6..=10).contains(&month)
}

/// Shift a reading by the seasonal offsets for `month`.
///
/// Fire season runs hotter (+5 C) and drier (-10 humidity points); the rest
/// of the year runs cooler (-2 C) and wetter (+10 points). Humidity never
/// drops below zero. Wind and vegetation moisture are unchanged.
pub fn apply_seasonality(reading: &EnvironmentalReading, month: u32) -> EnvironmentalReading {
    let (temp_offset, humidity_offset) = if is_fire_season(month) {
        (5.0, -10.0)
    } else {
        (-2.0, 10.0)
    };

    EnvironmentalReading {
        temperature_celsius: reading.temperature_celsius + temp_offset,
        relative_humidity_percent: (reading.relative_humidity_percent + humidity_offset).max(0.0),
        ..*reading
    }
}

/// Seasonality for a calendar date
pub fn apply_seasonality_on(reading: &EnvironmentalReading, date: NaiveDate) -> EnvironmentalReading {
    apply_seasonality(reading, date.month())
}
