//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::model::ModelInvocationError;
use crate::services::{FieldViolation, PredictionError, ValidationErrors};

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Field-level validation failures
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldViolation>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            fields: Vec::new(),
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_fields(mut self, fields: Vec<FieldViolation>) -> Self {
        self.fields = fields;
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Request body failed validation
    Validation(ValidationErrors),
    /// The model call failed for this request
    Model(ModelInvocationError),
    /// Internal server error
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::Validation(errors) => {
                tracing::warn!("Rejected request: {}", errors);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ApiError::new("VALIDATION_ERROR", "Invalid patient input")
                        .with_details(errors.to_string())
                        .with_fields(errors.violations),
                )
            }
            AppError::Model(e) => {
                // The cause stays in the logs; callers get a generic message.
                tracing::error!("Model invocation failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new("INTERNAL_ERROR", "Prediction failed"),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new("INTERNAL_ERROR", "Internal server error"),
                )
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::Validation(err)
    }
}

impl From<ModelInvocationError> for AppError {
    fn from(err: ModelInvocationError) -> Self {
        AppError::Model(err)
    }
}

impl From<PredictionError> for AppError {
    fn from(err: PredictionError) -> Self {
        match err {
            PredictionError::Validation(e) => AppError::Validation(e),
            PredictionError::Model(e) => AppError::Model(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_422() {
        let errors = ValidationErrors::single(FieldViolation::new("age", "greater than 0", "bad"));
        let response = AppError::from(errors).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_model_failure_maps_to_500() {
        let err = ModelInvocationError::MalformedOutput("NaN".to_string());
        let response = AppError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_api_error_omits_empty_fields() {
        let body = serde_json::to_value(ApiError::new("NOT_FOUND", "nope")).unwrap();
        assert!(body.get("fields").is_none());
        assert!(body.get("details").is_none());

        let body = serde_json::to_value(
            ApiError::new("X", "y").with_details("more").with_fields(vec![FieldViolation::new(
                "gluc", "less than 150", "too high",
            )]),
        )
        .unwrap();
        assert_eq!(body["details"], "more");
        assert_eq!(body["fields"][0]["field"], "gluc");
    }
}
