//! Risk prediction: validate, encode, score, threshold.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::encoder::encode;
use super::validation::{validate_patient, ValidationErrors};
use crate::model::{Classifier, ModelInvocationError};
use crate::models::{FeatureVector, PatientInput, RawPatientInput};

/// Probability above which a patient is classified as high risk.
///
/// Tuned on validation data; strictly greater-than.
pub const DECISION_THRESHOLD: f64 = 0.45;

/// Categorical model outcome, serialized as `0` or `1`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum RiskCategory {
    Low,
    High,
}

impl RiskCategory {
    /// Apply [`DECISION_THRESHOLD`] to a positive-class probability.
    pub fn from_probability(probability: f64) -> Self {
        if probability > DECISION_THRESHOLD {
            RiskCategory::High
        } else {
            RiskCategory::Low
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            RiskCategory::Low => 0,
            RiskCategory::High => 1,
        }
    }
}

impl From<RiskCategory> for u8 {
    fn from(risk: RiskCategory) -> Self {
        risk.code()
    }
}

impl TryFrom<u8> for RiskCategory {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(RiskCategory::Low),
            1 => Ok(RiskCategory::High),
            other => Err(format!("invalid risk category {}: expected 0 or 1", other)),
        }
    }
}

/// Outcome of a single prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionResult {
    pub risk: RiskCategory,
    /// Positive-class probability the risk was derived from
    pub probability: f64,
}

/// Request-scoped prediction failure.
#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("Model invocation failed: {0}")]
    Model(#[from] ModelInvocationError),
}

/// Stateless prediction pipeline around a shared, read-only classifier.
#[derive(Clone)]
pub struct PredictionService {
    classifier: Arc<dyn Classifier>,
}

impl PredictionService {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    /// Score an already encoded feature vector.
    pub fn score(&self, features: &FeatureVector) -> Result<PredictionResult, ModelInvocationError> {
        let [_, positive] = self.classifier.predict_proba(features)?;
        if !positive.is_finite() || !(0.0..=1.0).contains(&positive) {
            return Err(ModelInvocationError::MalformedOutput(format!(
                "positive-class probability {} outside [0, 1]",
                positive
            )));
        }
        Ok(PredictionResult {
            risk: RiskCategory::from_probability(positive),
            probability: positive,
        })
    }

    /// Encode and score a validated patient.
    pub fn predict(&self, patient: &PatientInput) -> Result<PredictionResult, ModelInvocationError> {
        let features = encode(patient);
        let result = self.score(&features)?;
        log::debug!(
            "Predicted risk={} (p={:.4})",
            result.risk.code(),
            result.probability
        );
        Ok(result)
    }

    /// Validate, encode and score a raw payload.
    ///
    /// Validation failures return before the classifier is invoked.
    pub fn predict_raw(&self, raw: &RawPatientInput) -> Result<PredictionResult, PredictionError> {
        let patient = validate_patient(raw)?;
        Ok(self.predict(&patient)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelSummary;
    use crate::models::Gender;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns a fixed probability and counts invocations.
    struct FixedClassifier {
        probability: f64,
        calls: AtomicUsize,
    }

    impl FixedClassifier {
        fn new(probability: f64) -> Arc<Self> {
            Arc::new(Self {
                probability,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl Classifier for FixedClassifier {
        fn predict_proba(&self, _: &FeatureVector) -> Result<[f64; 2], ModelInvocationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok([1.0 - self.probability, self.probability])
        }

        fn summary(&self) -> ModelSummary {
            ModelSummary {
                booster: "fixed".to_string(),
                objective: "binary:logistic".to_string(),
                num_trees: 0,
                num_features: 14,
                checksum: None,
            }
        }
    }

    fn raw() -> RawPatientInput {
        RawPatientInput {
            age: 50,
            gender: Gender::Male,
            height: 170.0,
            weight: 80.0,
            ap_hi: 140,
            ap_lo: 90,
            cholesterol: 250,
            gluc: 110,
            smoke: false,
            alco: false,
            active: true,
        }
    }

    #[test]
    fn test_threshold_edge() {
        assert_eq!(RiskCategory::from_probability(0.45), RiskCategory::Low);
        assert_eq!(RiskCategory::from_probability(0.4501), RiskCategory::High);
        assert_eq!(RiskCategory::from_probability(0.0), RiskCategory::Low);
        assert_eq!(RiskCategory::from_probability(1.0), RiskCategory::High);
    }

    #[test]
    fn test_risk_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&RiskCategory::High).unwrap(), "1");
        assert_eq!(serde_json::from_str::<RiskCategory>("0").unwrap(), RiskCategory::Low);
        assert!(serde_json::from_str::<RiskCategory>("2").is_err());
    }

    #[test]
    fn test_predict_raw_applies_threshold() {
        let service = PredictionService::new(FixedClassifier::new(0.45));
        let result = service.predict_raw(&raw()).unwrap();
        assert_eq!(result.risk, RiskCategory::Low);

        let service = PredictionService::new(FixedClassifier::new(0.4501));
        let result = service.predict_raw(&raw()).unwrap();
        assert_eq!(result.risk, RiskCategory::High);
    }

    #[test]
    fn test_invalid_input_never_reaches_model() {
        let classifier = FixedClassifier::new(0.9);
        let service = PredictionService::new(classifier.clone());
        let mut input = raw();
        input.age = 0;

        let err = service.predict_raw(&input).unwrap_err();
        assert!(matches!(err, PredictionError::Validation(_)));
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_out_of_range_probability_is_model_error() {
        let service = PredictionService::new(FixedClassifier::new(1.5));
        let err = service.predict_raw(&raw()).unwrap_err();
        assert!(matches!(
            err,
            PredictionError::Model(ModelInvocationError::MalformedOutput(_))
        ));
    }
}
