//! Location Resolution Module
//!
//! Maps a postcode to a locality name through the postcode directory service
//! (`GET {base}/{postcode}/json/`).

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, instrument, warn};

use crate::error::ResolutionError;
use crate::models::{Location, PostCode};

/// Resolves a postcode to the locality it belongs to
#[async_trait]
pub trait LocationResolver: Send + Sync {
    async fn resolve(&self, code: &PostCode, deadline: Instant)
    -> Result<Location, ResolutionError>;
}

/// Directory service answer. Unknown postcodes come back as `{"erro": true}`
/// with no locality at all.
#[derive(Debug, Deserialize)]
struct DirectoryResponse {
    #[serde(default)]
    localidade: String,
}

/// Client for the postcode directory service
pub struct DirectoryClient {
    client: Client,
    base_url: String,
}

impl DirectoryClient {
    /// Create a client for the directory service rooted at `base_url`
    #[must_use]
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn lookup_url(&self, code: &PostCode) -> String {
        format!("{}/{}/json/", self.base_url, code)
    }
}

#[async_trait]
impl LocationResolver for DirectoryClient {
    #[instrument(name = "resolve_location", skip_all, fields(postcode = %code))]
    async fn resolve(
        &self,
        code: &PostCode,
        deadline: Instant,
    ) -> Result<Location, ResolutionError> {
        let url = self.lookup_url(code);
        debug!("Calling the directory service");

        let body: DirectoryResponse = timeout_at(deadline, async {
            let response = self.client.get(&url).send().await?;
            debug!(status = %response.status(), "Directory service answered");
            response.json::<DirectoryResponse>().await
        })
        .await
        .map_err(|_| ResolutionError::deadline_exceeded())?
        .map_err(|e| {
            warn!("Directory service call failed: {e}");
            ResolutionError::from(e)
        })?;

        // An empty locality is how the directory says "no such postcode",
        // whatever HTTP status came with it.
        Location::new(code.clone(), body.localidade).ok_or_else(|| {
            warn!("Location is empty");
            ResolutionError::not_found(format!("no locality for postcode {code}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn deadline() -> Instant {
        Instant::now() + Duration::from_secs(5)
    }

    fn code() -> PostCode {
        PostCode::parse("12345678").unwrap()
    }

    #[test]
    fn test_lookup_url_trims_trailing_slash() {
        let client = DirectoryClient::new(Client::new(), "http://viacep.com.br/ws/");
        assert_eq!(
            client.lookup_url(&code()),
            "http://viacep.com.br/ws/12345678/json/"
        );
    }

    #[tokio::test]
    async fn test_resolve_location() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/12345678/json/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "localidade": "City Example" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = DirectoryClient::new(Client::new(), &server.uri());
        let location = client.resolve(&code(), deadline()).await.unwrap();
        assert_eq!(location.locality, "City Example");
        assert_eq!(location.postcode, code());
    }

    #[tokio::test]
    async fn test_empty_locality_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "localidade": "" })))
            .mount(&server)
            .await;

        let client = DirectoryClient::new(Client::new(), &server.uri());
        let err = client.resolve(&code(), deadline()).await.unwrap_err();
        assert!(matches!(err, ResolutionError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_erro_flag_is_not_found_regardless_of_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "erro": true })))
            .mount(&server)
            .await;

        let client = DirectoryClient::new(Client::new(), &server.uri());
        let err = client.resolve(&code(), deadline()).await.unwrap_err();
        assert!(matches!(err, ResolutionError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = DirectoryClient::new(Client::new(), &server.uri());
        let err = client.resolve(&code(), deadline()).await.unwrap_err();
        assert!(matches!(err, ResolutionError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        let client = DirectoryClient::new(Client::new(), "http://127.0.0.1:1");
        let err = client.resolve(&code(), deadline()).await.unwrap_err();
        assert!(matches!(err, ResolutionError::Transport { .. }));
    }

    #[tokio::test]
    async fn test_deadline_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "localidade": "City Example" }))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = DirectoryClient::new(Client::new(), &server.uri());
        let short = Instant::now() + Duration::from_millis(100);
        let err = client.resolve(&code(), short).await.unwrap_err();
        assert!(matches!(err, ResolutionError::Transport { .. }));
        assert!(err.to_string().contains("deadline"));
    }
}
