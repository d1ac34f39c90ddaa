//! Fixed-schema feature vector consumed by the risk model.
//!
//! The layout mirrors the column order the classifier was trained on. Cholesterol and
//! glucose are one-hot encoded; all six indicator fields are always present so the
//! vector shape never depends on the input.

use serde::{Deserialize, Serialize};

/// Number of features the model consumes.
pub const FEATURE_COUNT: usize = 14;

/// Field names of [`FeatureVector`], in model order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age",
    "gender_code",
    "systolic",
    "diastolic",
    "smoke_code",
    "alcohol_code",
    "active_code",
    "bmi",
    "cholesterol_high",
    "cholesterol_normal",
    "cholesterol_very_high",
    "glucose_bucket_1",
    "glucose_bucket_2",
    "glucose_bucket_3",
];

/// Column names recorded by the training pipeline, in model order.
///
/// A model artifact that carries feature names must list exactly these.
pub const TRAINING_COLUMNS: [&str; FEATURE_COUNT] = [
    "age",
    "gender",
    "ap_hi",
    "ap_lo",
    "smoke",
    "alco",
    "active",
    "bmi",
    "cholesterol_high",
    "cholesterol_normal",
    "cholesterol_very high",
    "gluc_1",
    "gluc_2",
    "gluc_3",
];

/// Cholesterol category derived from a mg/dL reading.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CholesterolLevel {
    /// Below 200 mg/dL
    Normal,
    /// 200 to 239 mg/dL
    High,
    /// 240 mg/dL and above
    VeryHigh,
}

impl CholesterolLevel {
    pub fn from_mgdl(mgdl: u32) -> Self {
        match mgdl {
            0..=199 => CholesterolLevel::Normal,
            200..=239 => CholesterolLevel::High,
            _ => CholesterolLevel::VeryHigh,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CholesterolLevel::Normal => "normal",
            CholesterolLevel::High => "high",
            CholesterolLevel::VeryHigh => "very high",
        }
    }

    /// Position of this level's indicator within the cholesterol block.
    ///
    /// The training columns are sorted lexically: high, normal, very high.
    pub fn indicator_index(&self) -> usize {
        match self {
            CholesterolLevel::High => 0,
            CholesterolLevel::Normal => 1,
            CholesterolLevel::VeryHigh => 2,
        }
    }
}

/// Glucose category derived from a fasting mg/dL reading.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlucoseLevel {
    /// Below 100 mg/dL (bucket 1)
    Normal,
    /// 100 to 125 mg/dL (bucket 2)
    AboveNormal,
    /// Above 125 mg/dL (bucket 3)
    WellAboveNormal,
}

impl GlucoseLevel {
    pub fn from_mgdl(mgdl: u32) -> Self {
        match mgdl {
            0..=99 => GlucoseLevel::Normal,
            100..=125 => GlucoseLevel::AboveNormal,
            _ => GlucoseLevel::WellAboveNormal,
        }
    }

    /// Bucket number as used in the training data (1, 2 or 3).
    pub fn bucket(&self) -> u8 {
        match self {
            GlucoseLevel::Normal => 1,
            GlucoseLevel::AboveNormal => 2,
            GlucoseLevel::WellAboveNormal => 3,
        }
    }

    pub fn indicator_index(&self) -> usize {
        usize::from(self.bucket() - 1)
    }
}

/// Numeric model input derived from a validated patient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub age: f64,
    pub gender_code: f64,
    pub systolic: f64,
    pub diastolic: f64,
    pub smoke_code: f64,
    pub alcohol_code: f64,
    pub active_code: f64,
    pub bmi: f64,
    pub cholesterol_high: f64,
    pub cholesterol_normal: f64,
    pub cholesterol_very_high: f64,
    pub glucose_bucket_1: f64,
    pub glucose_bucket_2: f64,
    pub glucose_bucket_3: f64,
}

impl FeatureVector {
    /// Values in model order.
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.age,
            self.gender_code,
            self.systolic,
            self.diastolic,
            self.smoke_code,
            self.alcohol_code,
            self.active_code,
            self.bmi,
            self.cholesterol_high,
            self.cholesterol_normal,
            self.cholesterol_very_high,
            self.glucose_bucket_1,
            self.glucose_bucket_2,
            self.glucose_bucket_3,
        ]
    }

    /// `(name, value)` pairs in model order.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> {
        FEATURE_NAMES.into_iter().zip(self.to_array())
    }

    pub fn cholesterol_indicators(&self) -> [f64; 3] {
        [
            self.cholesterol_high,
            self.cholesterol_normal,
            self.cholesterol_very_high,
        ]
    }

    pub fn glucose_indicators(&self) -> [f64; 3] {
        [
            self.glucose_bucket_1,
            self.glucose_bucket_2,
            self.glucose_bucket_3,
        ]
    }
}
