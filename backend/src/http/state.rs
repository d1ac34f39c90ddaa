//! Application state for the HTTP server.

use std::sync::Arc;

use crate::model::Classifier;
use crate::services::PredictionService;

/// Default maximum request body size.
pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024;

/// Shared application state passed to all handlers.
///
/// Holds only read-only data; cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Prediction pipeline around the loaded model
    pub prediction: Arc<PredictionService>,
    /// Maximum accepted request body size
    pub body_limit_bytes: usize,
}

impl AppState {
    /// Create a new application state around a loaded classifier.
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            prediction: Arc::new(PredictionService::new(classifier)),
            body_limit_bytes: DEFAULT_BODY_LIMIT,
        }
    }

    pub fn with_body_limit(mut self, bytes: usize) -> Self {
        self.body_limit_bytes = bytes;
        self
    }
}
