//! Domain types shared by the service layer and the HTTP API.

pub mod features;
pub mod patient;

pub use features::{
    CholesterolLevel, FeatureVector, GlucoseLevel, FEATURE_COUNT, FEATURE_NAMES,
    TRAINING_COLUMNS,
};
pub use patient::{Gender, PatientInput, RawPatientInput};
