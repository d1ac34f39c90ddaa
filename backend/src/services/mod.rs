//! Service layer: the request pipeline between the HTTP handlers and the model.
//!
//! - [`validation`]: body decoding and bound checks
//! - [`encoder`]: patient → fixed-order feature vector
//! - [`prediction`]: scoring and the decision threshold

pub mod encoder;
pub mod prediction;
pub mod validation;

pub use encoder::{body_mass_index, encode};
pub use prediction::{
    PredictionError, PredictionResult, PredictionService, RiskCategory, DECISION_THRESHOLD,
};
pub use validation::{parse_patient_body, validate_patient, FieldViolation, ValidationErrors};
