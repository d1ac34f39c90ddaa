//! Request validation for patient payloads.
//!
//! Two stages run before the model is ever touched:
//! 1. [`parse_patient_body`] decodes the JSON body, turning type, enum and
//!    missing-field problems into field-level violations.
//! 2. [`validate_patient`] checks every numeric field against its declared bound and
//!    collects all violations rather than stopping at the first.

use serde::{Deserialize, Serialize};

use crate::models::{PatientInput, RawPatientInput};

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Wire name of the offending field (`body` when the payload itself is unreadable)
    pub field: String,
    /// The constraint that was violated, e.g. `greater than 0`
    pub constraint: String,
    /// Human-readable description including the rejected value
    pub message: String,
}

impl FieldViolation {
    pub fn new(
        field: impl Into<String>,
        constraint: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            constraint: constraint.into(),
            message: message.into(),
        }
    }
}

/// All violations found in one request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid patient input: {}", summarize(.violations))]
pub struct ValidationErrors {
    pub violations: Vec<FieldViolation>,
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{} ({})", v.field, v.constraint))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationErrors {
    pub fn single(violation: FieldViolation) -> Self {
        Self {
            violations: vec![violation],
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.violations.iter().map(|v| v.field.as_str())
    }
}

/// One side of a numeric range.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Limit {
    Inclusive(f64),
    Exclusive(f64),
}

/// Declared bounds of a numeric patient field.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FieldBounds {
    field: &'static str,
    lower: Limit,
    upper: Limit,
}

impl FieldBounds {
    const fn new(field: &'static str, lower: Limit, upper: Limit) -> Self {
        Self {
            field,
            lower,
            upper,
        }
    }

    fn check(&self, value: f64, violations: &mut Vec<FieldViolation>) {
        let (lower_ok, lower_text) = match self.lower {
            Limit::Inclusive(min) => (value >= min, format!("greater than or equal to {}", min)),
            Limit::Exclusive(min) => (value > min, format!("greater than {}", min)),
        };
        if !lower_ok {
            violations.push(FieldViolation::new(
                self.field,
                lower_text.clone(),
                format!("{} must be {} (got {})", self.field, lower_text, value),
            ));
            return;
        }

        let (upper_ok, upper_text) = match self.upper {
            Limit::Inclusive(max) => (value <= max, format!("less than or equal to {}", max)),
            Limit::Exclusive(max) => (value < max, format!("less than {}", max)),
        };
        if !upper_ok {
            violations.push(FieldViolation::new(
                self.field,
                upper_text.clone(),
                format!("{} must be {} (got {})", self.field, upper_text, value),
            ));
        }
    }

    fn describe(&self) -> String {
        let lower = match self.lower {
            Limit::Inclusive(min) => format!("{} <= ", min),
            Limit::Exclusive(min) => format!("{} < ", min),
        };
        let upper = match self.upper {
            Limit::Inclusive(max) => format!(" <= {}", max),
            Limit::Exclusive(max) => format!(" < {}", max),
        };
        format!("{}{}{}", lower, self.field, upper)
    }
}

const AGE: FieldBounds = FieldBounds::new("age", Limit::Exclusive(0.0), Limit::Exclusive(100.0));
const HEIGHT: FieldBounds =
    FieldBounds::new("height", Limit::Exclusive(0.0), Limit::Exclusive(250.0));
const WEIGHT: FieldBounds =
    FieldBounds::new("weight", Limit::Exclusive(0.0), Limit::Exclusive(150.0));
const AP_HI: FieldBounds =
    FieldBounds::new("ap_hi", Limit::Exclusive(0.0), Limit::Exclusive(250.0));
const AP_LO: FieldBounds =
    FieldBounds::new("ap_lo", Limit::Exclusive(0.0), Limit::Exclusive(150.0));
const CHOLESTEROL: FieldBounds = FieldBounds::new(
    "cholesterol",
    Limit::Inclusive(100.0),
    Limit::Exclusive(260.0),
);
const GLUC: FieldBounds =
    FieldBounds::new("gluc", Limit::Inclusive(50.0), Limit::Exclusive(150.0));

const NUMERIC_BOUNDS: [FieldBounds; 7] = [AGE, HEIGHT, WEIGHT, AP_HI, AP_LO, CHOLESTEROL, GLUC];

/// Expected shape of a wire field, used when the body cannot be decoded.
fn expected_shape(field: &str) -> String {
    match field {
        "gender" => "one of \"male\", \"female\"".to_string(),
        "smoke" | "alco" | "active" => "one of \"yes\", \"no\"".to_string(),
        "height" | "weight" => NUMERIC_BOUNDS
            .iter()
            .find(|b| b.field == field)
            .map(|b| format!("number, {}", b.describe()))
            .unwrap_or_default(),
        _ => match NUMERIC_BOUNDS.iter().find(|b| b.field == field) {
            Some(bounds) => format!("integer, {}", bounds.describe()),
            None => "valid JSON object".to_string(),
        },
    }
}

/// Pull the field name out of serde's `missing field `x`` message.
fn missing_field_name(message: &str) -> Option<&str> {
    let rest = message.strip_prefix("missing field `")?;
    rest.split('`').next()
}

/// Decode a `/predict` request body.
///
/// Any decoding failure is reported as a single [`FieldViolation`] naming the field
/// at fault, so callers always receive field-level detail.
pub fn parse_patient_body(body: &[u8]) -> Result<RawPatientInput, ValidationErrors> {
    let mut deserializer = serde_json::Deserializer::from_slice(body);
    let raw = serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        let path = err.path().to_string();
        let inner = err.into_inner();
        let message = inner.to_string();

        let field = if path != "." {
            path
        } else if let Some(name) = missing_field_name(&message) {
            name.to_string()
        } else {
            "body".to_string()
        };

        let constraint = if inner.is_syntax() || inner.is_eof() {
            "valid JSON object".to_string()
        } else if missing_field_name(&message).is_some() {
            format!("required, {}", expected_shape(&field))
        } else {
            expected_shape(&field)
        };

        ValidationErrors::single(FieldViolation::new(field, constraint, message))
    })?;

    deserializer.end().map_err(|err| {
        ValidationErrors::single(FieldViolation::new(
            "body",
            "valid JSON object",
            err.to_string(),
        ))
    })?;

    Ok(raw)
}

/// Check a decoded payload against the declared bounds.
///
/// Returns the validated [`PatientInput`] or every violation found.
pub fn validate_patient(raw: &RawPatientInput) -> Result<PatientInput, ValidationErrors> {
    let mut violations = Vec::new();

    let values = [
        raw.age as f64,
        raw.height,
        raw.weight,
        raw.ap_hi as f64,
        raw.ap_lo as f64,
        raw.cholesterol as f64,
        raw.gluc as f64,
    ];
    for (bounds, value) in NUMERIC_BOUNDS.iter().zip(values) {
        bounds.check(value, &mut violations);
    }

    if !violations.is_empty() {
        return Err(ValidationErrors { violations });
    }

    // Bounds above guarantee every integer fits in u32.
    Ok(PatientInput {
        age: raw.age as u32,
        gender: raw.gender,
        height_cm: raw.height,
        weight_kg: raw.weight,
        systolic: raw.ap_hi as u32,
        diastolic: raw.ap_lo as u32,
        cholesterol_mgdl: raw.cholesterol as u32,
        glucose_mgdl: raw.gluc as u32,
        smokes: raw.smoke,
        drinks_alcohol: raw.alco,
        physically_active: raw.active,
    })
}
