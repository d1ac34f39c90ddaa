//! Client for a running prediction server.
//!
//! Posts patient payloads to `/predict` and interprets the reply. Failures are
//! reported once; nothing is retried.

pub mod form;

use std::time::Duration;

use serde::Serialize;

use crate::services::RiskCategory;

pub use form::PatientForm;

/// Default server base URL.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

/// Transport-level failures seen by the client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Could not connect to the prediction server at {url}. Make sure it's running. ({message})")]
    Connection { url: String, message: String },
    #[error("Error: server responded with status {status}")]
    Status { status: u16, body: String },
    #[error("Invalid response from server. Response is not valid JSON.")]
    InvalidResponse { body: String },
    #[error("Unexpected response format")]
    UnexpectedFormat { body: String },
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl ClientError {
    /// Raw response text, when the server answered at all.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            ClientError::Status { body, .. }
            | ClientError::InvalidResponse { body }
            | ClientError::UnexpectedFormat { body } => Some(body),
            _ => None,
        }
    }
}

/// Message shown to the user for a prediction.
pub fn render_outcome(risk: RiskCategory) -> &'static str {
    match risk {
        RiskCategory::High => "⚠️ High Risk: Cardiovascular disease detected",
        RiskCategory::Low => "✅ Low Risk: No cardiovascular disease detected",
    }
}

/// Interpret a `/predict` reply.
pub fn interpret_response(status: u16, body: &str) -> Result<RiskCategory, ClientError> {
    if status != 200 {
        return Err(ClientError::Status {
            status,
            body: body.to_string(),
        });
    }

    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|_| ClientError::InvalidResponse {
            body: body.to_string(),
        })?;

    value
        .get("predicted_category")
        .and_then(|v| v.as_u64())
        .and_then(|code| u8::try_from(code).ok())
        .and_then(|code| RiskCategory::try_from(code).ok())
        .ok_or_else(|| ClientError::UnexpectedFormat {
            body: body.to_string(),
        })
}

/// HTTP client for the prediction API.
#[derive(Debug, Clone)]
pub struct PredictorClient {
    base_url: String,
    http: reqwest::Client,
}

impl PredictorClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    /// Build with a custom overall request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Build from `PREDICTOR_URL`, falling back to [`DEFAULT_SERVER_URL`].
    pub fn from_env() -> Result<Self, ClientError> {
        let url = std::env::var("PREDICTOR_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
        Self::new(url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Post `payload` verbatim to `/predict`.
    pub async fn predict<T>(&self, payload: &T) -> Result<RiskCategory, ClientError>
    where
        T: Serialize + ?Sized,
    {
        let url = format!("{}/predict", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    ClientError::Connection {
                        url: self.base_url.clone(),
                        message: e.to_string(),
                    }
                } else {
                    ClientError::Request(e)
                }
            })?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        interpret_response(status, &body)
    }
}
