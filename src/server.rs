//! Inbound HTTP surface: a single JSON extraction endpoint.

use crate::extractor::{ExtractError, ExtractionService};
use crate::models::ScrapeOutcome;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

#[derive(Debug, Deserialize)]
struct ExtractRequest {
    url: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Maps pipeline errors to HTTP responses: bad input is the caller's
/// fault, everything upstream is a gateway problem.
struct ApiError(ExtractError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ExtractError::InvalidUrl => StatusCode::BAD_REQUEST,
            ExtractError::Fetch { .. }
            | ExtractError::FetchStatus { .. }
            | ExtractError::ModelRequest(_)
            | ExtractError::ModelTransport { .. } => StatusCode::BAD_GATEWAY,
            ExtractError::ClientBuild(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        error!("Extraction request failed: {}", self.0);

        let body = ErrorResponse {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(service: Arc<ExtractionService>) -> Router {
    Router::new()
        .route("/api/extract", post(extract_handler))
        .with_state(service)
}

async fn extract_handler(
    State(service): State<Arc<ExtractionService>>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<ScrapeOutcome>, ApiError> {
    let properties = service.extract(&request.url).await.map_err(ApiError)?;
    Ok(Json(ScrapeOutcome::ok(properties)))
}

pub async fn serve(listener: TcpListener, service: Arc<ExtractionService>) -> anyhow::Result<()> {
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, router(service)).await?;
    Ok(())
}
