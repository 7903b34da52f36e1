//! `tempsystem` - current temperature by postcode
//!
//! Resolves a postcode to a locality through a postcode directory service,
//! looks up the current weather for that locality and reports the
//! temperature in Celsius, Fahrenheit and Kelvin over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod location_resolver;
pub mod models;
pub mod pipeline;
pub mod telemetry;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use crate::config::TempSystemConfig;
pub use error::{ResolutionError, Stage, TempSystemError};
pub use location_resolver::{DirectoryClient, LocationResolver};
pub use models::{Location, PostCode, TemperatureResult, WeatherReading};
pub use pipeline::{PipelineState, RequestPipeline};
pub use weather::{WeatherApiClient, WeatherResolver};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TempSystemError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
