//! Weather service client
//!
//! Fetches current conditions for a locality:
//! `GET {base}?key={api_key}&q={locality}&aqi=no`.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, instrument, warn};

use crate::error::{ResolutionError, TempSystemError};
use crate::models::{Location, WeatherReading};
use crate::Result;

/// Looks up the current temperature for a location
#[async_trait]
pub trait WeatherResolver: Send + Sync {
    async fn resolve(
        &self,
        location: &Location,
        deadline: Instant,
    ) -> std::result::Result<WeatherReading, ResolutionError>;
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    current: CurrentData,
}

#[derive(Debug, Deserialize)]
struct CurrentData {
    temp_c: f64,
    temp_f: f64,
}

impl From<CurrentData> for WeatherReading {
    fn from(current: CurrentData) -> Self {
        Self {
            temp_c: current.temp_c,
            temp_f: current.temp_f,
        }
    }
}

/// Weather API client
pub struct WeatherApiClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl WeatherApiClient {
    /// Create a client for the current-conditions endpoint at `base_url`
    pub fn new(client: Client, base_url: &str, api_key: String) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            TempSystemError::config(format!("Invalid weather service base URL '{base_url}': {e}"))
        })?;
        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    fn current_url(&self, locality: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("key", &self.api_key)
            .append_pair("q", locality)
            .append_pair("aqi", "no");
        url
    }
}

#[async_trait]
impl WeatherResolver for WeatherApiClient {
    #[instrument(name = "resolve_weather", skip_all, fields(locality = %location.locality))]
    async fn resolve(
        &self,
        location: &Location,
        deadline: Instant,
    ) -> std::result::Result<WeatherReading, ResolutionError> {
        let url = self.current_url(&location.locality);
        debug!("Calling the weather service");

        let body: CurrentResponse = timeout_at(deadline, async {
            let response = self.client.get(url).send().await?;
            debug!(status = %response.status(), "Weather service answered");
            response.json::<CurrentResponse>().await
        })
        .await
        .map_err(|_| ResolutionError::deadline_exceeded())?
        .map_err(|e| {
            // without_url keeps the API key out of the log
            let e = e.without_url();
            warn!("Weather service call failed: {e}");
            ResolutionError::from(e)
        })?;

        Ok(body.current.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PostCode;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const API_KEY: &str = "test_api_key_123";

    fn location() -> Location {
        Location::new(
            PostCode::parse("12345678").unwrap(),
            "City Example".to_string(),
        )
        .unwrap()
    }

    fn deadline() -> Instant {
        Instant::now() + Duration::from_secs(5)
    }

    fn client_for(server: &MockServer) -> WeatherApiClient {
        WeatherApiClient::new(
            Client::new(),
            &format!("{}/v1/current.json", server.uri()),
            API_KEY.to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(WeatherApiClient::new(Client::new(), "not a url", API_KEY.to_string()).is_err());
    }

    #[test]
    fn test_current_url_encodes_locality() {
        let client = WeatherApiClient::new(
            Client::new(),
            "http://api.weatherapi.com/v1/current.json",
            API_KEY.to_string(),
        )
        .unwrap();
        let url = client.current_url("São Paulo");
        assert_eq!(
            url.as_str(),
            "http://api.weatherapi.com/v1/current.json?key=test_api_key_123&q=S%C3%A3o+Paulo&aqi=no"
        );
    }

    #[tokio::test]
    async fn test_resolve_weather() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/current.json"))
            .and(query_param("key", API_KEY))
            .and(query_param("q", "City Example"))
            .and(query_param("aqi", "no"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "location": { "name": "City Example" },
                "current": { "temp_c": 25.0, "temp_f": 77.0, "humidity": 40 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reading = client_for(&server)
            .resolve(&location(), deadline())
            .await
            .unwrap();
        assert_eq!(
            reading,
            WeatherReading {
                temp_c: 25.0,
                temp_f: 77.0
            }
        );
    }

    #[tokio::test]
    async fn test_implausible_values_pass_through() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "current": { "temp_c": -500.0, "temp_f": 9999.0 }
            })))
            .mount(&server)
            .await;

        let reading = client_for(&server)
            .resolve(&location(), deadline())
            .await
            .unwrap();
        assert_eq!(reading.temp_c, -500.0);
        assert_eq!(reading.temp_f, 9999.0);
    }

    #[tokio::test]
    async fn test_error_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": { "code": 2006, "message": "API key is invalid." }
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .resolve(&location(), deadline())
            .await
            .unwrap_err();
        assert!(matches!(err, ResolutionError::Decode { .. }));
        assert!(!err.to_string().contains(API_KEY));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        let client = WeatherApiClient::new(
            Client::new(),
            "http://127.0.0.1:1/v1/current.json",
            API_KEY.to_string(),
        )
        .unwrap();
        let err = client.resolve(&location(), deadline()).await.unwrap_err();
        assert!(matches!(err, ResolutionError::Transport { .. }));
        assert!(!err.to_string().contains(API_KEY));
    }
}
