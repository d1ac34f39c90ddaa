//! Data Transfer Objects for the HTTP API.

use serde::{Deserialize, Serialize};

use crate::model::ModelSummary;
use crate::services::{PredictionResult, RiskCategory};

/// Greeting returned by `GET /`.
pub const WELCOME_MESSAGE: &str = "Welcome to Cardio Disease Prediction API";

/// Response for `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
}

/// Response for `POST /predict`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// `1` for high risk, `0` for low risk
    pub predicted_category: RiskCategory,
}

impl From<PredictionResult> for PredictionResponse {
    fn from(result: PredictionResult) -> Self {
        Self {
            predicted_category: result.risk,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Crate version
    pub version: String,
    /// Loaded model metadata
    pub model: ModelSummary,
}
