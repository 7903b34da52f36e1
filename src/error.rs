//! Error types and handling for the `tempsystem` service

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Pipeline stage an error was raised in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validation,
    Location,
    Weather,
    Encoding,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Validation => "validation",
            Stage::Location => "location",
            Stage::Weather => "weather",
            Stage::Encoding => "encoding",
        };
        f.write_str(name)
    }
}

/// Failure of a single call to an upstream service
#[derive(Error, Debug)]
pub enum ResolutionError {
    /// The request could not be sent, the body could not be read, or the
    /// request deadline elapsed
    #[error("transport error: {message}")]
    Transport { message: String },

    /// The body was not the JSON we expected
    #[error("decode error: {message}")]
    Decode { message: String },

    /// The upstream answered, but has nothing for the key
    #[error("not found: {message}")]
    NotFound { message: String },
}

impl ResolutionError {
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn decode<S: Into<String>>(message: S) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub(crate) fn deadline_exceeded() -> Self {
        Self::transport("request deadline exceeded")
    }
}

impl From<reqwest::Error> for ResolutionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::decode(err.to_string())
        } else {
            Self::transport(err.to_string())
        }
    }
}

/// Main error type for the `tempsystem` service
#[derive(Error, Debug)]
pub enum TempSystemError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The postcode is not 8 ASCII digits
    #[error("Invalid postcode: {postcode:?}")]
    Validation { postcode: String },

    /// The directory service could not resolve the postcode. Transport and
    /// decode failures of the directory call end up here as well.
    #[error("Postcode {postcode} not found: {source}")]
    NotFound {
        postcode: String,
        #[source]
        source: ResolutionError,
    },

    /// The weather service call failed
    #[error("Weather lookup for {locality:?} failed: {source}")]
    Upstream {
        locality: String,
        #[source]
        source: ResolutionError,
    },

    /// The success body could not be serialized
    #[error("Response encoding failed: {source}")]
    Encoding {
        #[from]
        source: serde_json::Error,
    },
}

impl TempSystemError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(postcode: S) -> Self {
        Self::Validation {
            postcode: postcode.into(),
        }
    }

    /// Pipeline stage this error terminates, if it is a request error
    #[must_use]
    pub fn stage(&self) -> Option<Stage> {
        match self {
            TempSystemError::Validation { .. } => Some(Stage::Validation),
            TempSystemError::NotFound { .. } => Some(Stage::Location),
            TempSystemError::Upstream { .. } => Some(Stage::Weather),
            TempSystemError::Encoding { .. } => Some(Stage::Encoding),
            TempSystemError::Config { .. } => None,
        }
    }

    /// HTTP status the error surfaces as
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            TempSystemError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            TempSystemError::NotFound { .. } => StatusCode::NOT_FOUND,
            TempSystemError::Upstream { .. }
            | TempSystemError::Encoding { .. }
            | TempSystemError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short plain-text message sent to the client
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            TempSystemError::Validation { .. } => "invalid zipcode",
            TempSystemError::NotFound { .. } => "cannot find zipcode",
            TempSystemError::Upstream { .. } => "could not get weather",
            TempSystemError::Encoding { .. } => "could not encode response",
            TempSystemError::Config { .. } => "internal server error",
        }
    }
}

impl IntoResponse for TempSystemError {
    fn into_response(self) -> Response {
        (self.status_code(), self.user_message()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = TempSystemError::config("missing API key");
        assert!(matches!(config_err, TempSystemError::Config { .. }));

        let validation_err = TempSystemError::validation("1234abcd");
        assert!(matches!(validation_err, TempSystemError::Validation { .. }));
        assert!(validation_err.to_string().contains("1234abcd"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            TempSystemError::validation("x").status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );

        let not_found = TempSystemError::NotFound {
            postcode: "99999999".to_string(),
            source: ResolutionError::transport("connection refused"),
        };
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.stage(), Some(Stage::Location));

        let upstream = TempSystemError::Upstream {
            locality: "City Example".to_string(),
            source: ResolutionError::decode("expected value"),
        };
        assert_eq!(upstream.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(upstream.stage(), Some(Stage::Weather));
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(TempSystemError::validation("x").user_message(), "invalid zipcode");
        assert_eq!(
            TempSystemError::config("bad").user_message(),
            "internal server error"
        );
    }

    #[test]
    fn test_config_error_has_no_stage() {
        let err = TempSystemError::config("missing API key");
        assert_eq!(err.stage(), None);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_encoding_error_conversion() {
        let json_err = serde_json::from_str::<u8>("not json").unwrap_err();
        let err: TempSystemError = json_err.into();
        assert_eq!(err.stage(), Some(Stage::Encoding));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Validation.to_string(), "validation");
        assert_eq!(Stage::Weather.to_string(), "weather");
    }
}
