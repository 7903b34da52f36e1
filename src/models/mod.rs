//! Data models for the tempsystem service
//!
//! Every value here lives for a single request:
//! - PostCode: the validated lookup key
//! - Location: the locality the directory service resolved
//! - Weather: the reading returned by the weather service
//! - Temperature: the converted, formatted response body

pub mod location;
pub mod postcode;
pub mod temperature;
pub mod weather;

// Re-export all public types for convenient access
pub use location::Location;
pub use postcode::{PostCode, is_valid_post_code};
pub use temperature::{TemperatureResult, celsius_to_fahrenheit, celsius_to_kelvin, format_celsius};
pub use weather::WeatherReading;
