//! Unit conversion and the response body

use serde::{Deserialize, Serialize};

use super::WeatherReading;

/// Offset between Celsius and Kelvin. The service reports `c + 273`.
const KELVIN_OFFSET: f64 = 273.0;

/// Format a Celsius reading with one decimal digit
#[must_use]
pub fn format_celsius(celsius: f64) -> String {
    format!("{celsius:.1}")
}

/// Convert Celsius to Fahrenheit, formatted with one decimal digit
#[must_use]
pub fn celsius_to_fahrenheit(celsius: f64) -> String {
    let fahrenheit = celsius * 1.8 + 32.0;
    format!("{fahrenheit:.1}")
}

/// Convert Celsius to Kelvin, formatted with one decimal digit
#[must_use]
pub fn celsius_to_kelvin(celsius: f64) -> String {
    let kelvin = celsius + KELVIN_OFFSET;
    format!("{kelvin:.1}")
}

/// Temperature in three scales, as sent to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemperatureResult {
    #[serde(rename = "temp_C")]
    pub celsius: String,
    #[serde(rename = "temp_F")]
    pub fahrenheit: String,
    #[serde(rename = "temp_K")]
    pub kelvin: String,
}

impl From<&WeatherReading> for TemperatureResult {
    /// All three scales derive from the Celsius value; the upstream
    /// Fahrenheit reading is not used.
    fn from(reading: &WeatherReading) -> Self {
        Self {
            celsius: format_celsius(reading.temp_c),
            fahrenheit: celsius_to_fahrenheit(reading.temp_c),
            kelvin: celsius_to_kelvin(reading.temp_c),
        }
    }
}
