use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State, rejection::PathRejection},
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::warn;

use crate::error::TempSystemError;
use crate::pipeline::RequestPipeline;

pub fn router(pipeline: Arc<RequestPipeline>) -> Router {
    Router::new()
        .route("/temperature/{postcode}", get(get_temperature))
        .with_state(pipeline)
}

async fn get_temperature(
    State(pipeline): State<Arc<RequestPipeline>>,
    uri: Uri,
    postcode: Result<Path<String>, PathRejection>,
) -> Response {
    // A segment that does not percent-decode to UTF-8 is a malformed postcode
    let Path(postcode) = match postcode {
        Ok(postcode) => postcode,
        Err(rejection) => {
            let raw = uri.path().rsplit('/').next().unwrap_or_default();
            warn!(
                stage = "validation",
                postcode = %raw,
                "Rejected undecodable postcode: {rejection}"
            );
            return TempSystemError::validation(raw).into_response();
        }
    };

    match pipeline.run(&postcode).await {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}
