//! Configuration management for the `tempsystem` service
//!
//! Handles loading configuration from a TOML file and environment variables,
//! and validates every setting before the server starts.

use crate::TempSystemError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TempSystemConfig {
    /// Listener settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Postcode directory service
    #[serde(default)]
    pub directory: DirectoryConfig,
    /// Weather service
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Per-request limits
    #[serde(default)]
    pub request: RequestConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_server_host")]
    pub host: String,
    /// Port to bind
    #[serde(default = "default_server_port")]
    pub port: u16,
}

/// Postcode directory service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Base URL; the postcode and `/json/` are appended to it
    #[serde(default = "default_directory_base_url")]
    pub base_url: String,
}

/// Weather service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Weather API key, sent as the `key` query parameter
    pub api_key: Option<String>,
    /// Current-conditions endpoint
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
}

/// Per-request limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestConfig {
    /// Deadline shared by both upstream calls of a request, in seconds
    #[serde(default = "default_deadline_seconds")]
    pub deadline_seconds: u64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
    /// OTLP/HTTP collector endpoint; spans are exported only when set
    pub otlp_endpoint: Option<String>,
    /// Service name reported to the collector
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

// Default value functions
fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_directory_base_url() -> String {
    "https://viacep.com.br/ws".to_string()
}

fn default_weather_base_url() -> String {
    "https://api.weatherapi.com/v1/current.json".to_string()
}

fn default_deadline_seconds() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_service_name() -> String {
    "tempsystem".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: default_directory_base_url(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
        }
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            deadline_seconds: default_deadline_seconds(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            otlp_endpoint: None,
            service_name: default_service_name(),
        }
    }
}

impl TempSystemConfig {
    /// Load configuration from `config_path` (default `config.toml`) and
    /// environment variables
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| PathBuf::from("config.toml"));

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. TEMPSYSTEM_WEATHER__API_KEY
        builder = builder.add_source(
            Environment::with_prefix("TEMPSYSTEM")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| format!("Failed to build configuration from {}", config_file.display()))?;

        let mut config: TempSystemConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Deadline applied to each inbound request
    #[must_use]
    pub fn request_deadline(&self) -> Duration {
        Duration::from_secs(self.request.deadline_seconds)
    }

    /// Address the server binds to
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_server_host();
        }
        if self.directory.base_url.is_empty() {
            self.directory.base_url = default_directory_base_url();
        }
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.request.deadline_seconds == 0 {
            self.request.deadline_seconds = default_deadline_seconds();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.logging.service_name.is_empty() {
            self.logging.service_name = default_service_name();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate the weather service credential
    pub fn validate_api_keys(&self) -> Result<()> {
        let Some(api_key) = &self.weather.api_key else {
            return Err(TempSystemError::config(
                "Weather API key is required. Set weather.api_key or TEMPSYSTEM_WEATHER__API_KEY.",
            )
            .into());
        };

        if api_key.is_empty() {
            return Err(TempSystemError::config("Weather API key cannot be empty.").into());
        }

        if api_key.len() < 8 {
            return Err(TempSystemError::config(
                "Weather API key appears to be invalid (too short). Please check your API key.",
            )
            .into());
        }

        if api_key.len() > 100 {
            return Err(TempSystemError::config(
                "Weather API key appears to be invalid (too long). Please check your API key.",
            )
            .into());
        }

        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.request.deadline_seconds > 300 {
            return Err(
                TempSystemError::config("Request deadline cannot exceed 300 seconds").into(),
            );
        }

        if self.server.port == 0 {
            return Err(TempSystemError::config("Server port cannot be 0").into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TempSystemError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TempSystemError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Directory", &self.directory.base_url),
            ("Weather", &self.weather.base_url),
        ] {
            if !is_http_url(url) {
                return Err(TempSystemError::config(format!(
                    "{name} service base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        if let Some(endpoint) = &self.logging.otlp_endpoint {
            if !is_http_url(endpoint) {
                return Err(TempSystemError::config(
                    "OTLP endpoint must be a valid HTTP or HTTPS URL",
                )
                .into());
            }
        }

        Ok(())
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
