//! Current weather reading

use serde::{Deserialize, Serialize};

/// Current temperature as reported by the weather service. Values are passed
/// through unchecked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    /// Temperature in Celsius
    pub temp_c: f64,
    /// Temperature in Fahrenheit
    pub temp_f: f64,
}
