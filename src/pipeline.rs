//! Request pipeline
//!
//! Takes the raw postcode from the request path through validation, location
//! lookup, weather lookup and unit conversion. Every stage short-circuits the
//! request with exactly one [`TempSystemError`]; each upstream is called at
//! most once.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use crate::Result;
use crate::error::TempSystemError;
use crate::location_resolver::LocationResolver;
use crate::models::{PostCode, TemperatureResult};
use crate::weather::WeatherResolver;

/// Progress of a single request through the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Received,
    Validated,
    LocationResolved,
    WeatherResolved,
    Converted,
    Responded,
}

/// Orchestrates the lookups for `GET /temperature/{postcode}`
pub struct RequestPipeline {
    locations: Arc<dyn LocationResolver>,
    weather: Arc<dyn WeatherResolver>,
    deadline: Duration,
}

impl RequestPipeline {
    pub fn new(
        locations: Arc<dyn LocationResolver>,
        weather: Arc<dyn WeatherResolver>,
        deadline: Duration,
    ) -> Self {
        Self {
            locations,
            weather,
            deadline,
        }
    }

    /// Resolve the temperature for a raw postcode
    #[instrument(name = "temperature_pipeline", skip(self))]
    pub async fn resolve(&self, raw_postcode: &str) -> Result<TemperatureResult> {
        transition(PipelineState::Received);
        // One deadline for the whole request, shared by both upstream calls
        let deadline = Instant::now() + self.deadline;

        let code = PostCode::parse(raw_postcode).ok_or_else(|| {
            warn!(stage = "validation", "Rejected malformed postcode");
            TempSystemError::validation(raw_postcode)
        })?;
        transition(PipelineState::Validated);

        let location = self
            .locations
            .resolve(&code, deadline)
            .await
            .map_err(|source| {
                warn!(stage = "location", error = %source, "Location lookup failed");
                TempSystemError::NotFound {
                    postcode: code.to_string(),
                    source,
                }
            })?;
        transition(PipelineState::LocationResolved);

        let reading = self
            .weather
            .resolve(&location, deadline)
            .await
            .map_err(|source| {
                error!(stage = "weather", error = %source, "Weather lookup failed");
                TempSystemError::Upstream {
                    locality: location.locality.clone(),
                    source,
                }
            })?;
        transition(PipelineState::WeatherResolved);

        let result = TemperatureResult::from(&reading);
        transition(PipelineState::Converted);

        info!(
            locality = %location.locality,
            temp_c = %result.celsius,
            "Resolved temperature"
        );
        Ok(result)
    }

    /// Run the whole pipeline and encode the JSON response body
    pub async fn run(&self, raw_postcode: &str) -> Result<Vec<u8>> {
        let result = self.resolve(raw_postcode).await?;
        let body = encode(&result).inspect_err(|e| {
            error!(stage = "encoding", error = %e, "Response encoding failed");
        })?;
        transition(PipelineState::Responded);
        Ok(body)
    }
}

/// Serialize the success body
pub fn encode(result: &TemperatureResult) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(result)?)
}

fn transition(state: PipelineState) {
    debug!(?state, "Pipeline state");
}
