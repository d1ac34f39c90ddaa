//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{body::Bytes, extract::State, http::Uri, Json};

use super::dto::{HealthResponse, PredictionResponse, WelcomeResponse, WELCOME_MESSAGE};
use super::error::AppError;
use super::state::AppState;
use crate::services::parse_patient_body;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// GET /
pub async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: WELCOME_MESSAGE.to_string(),
    })
}

/// GET /health
///
/// Reports liveness and the metadata of the loaded model.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.prediction.classifier().summary(),
    }))
}

/// POST /predict
///
/// Validate the patient payload, score it, and return the risk category.
/// The body is decoded here rather than through `Json<T>` so that decoding
/// failures carry the offending field.
pub async fn predict(
    State(state): State<AppState>,
    body: Bytes,
) -> HandlerResult<PredictionResponse> {
    let raw = parse_patient_body(&body)?;

    // Tree traversal is CPU-bound; keep it off the async workers.
    let service = state.prediction.clone();
    let result = tokio::task::spawn_blocking(move || service.predict_raw(&raw))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

    Ok(Json(result.into()))
}

/// Fallback for unknown routes.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
