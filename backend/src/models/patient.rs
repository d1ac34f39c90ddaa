//! Patient attributes as they arrive on the wire and after validation.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Biological sex as recorded in the training data.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            other => Err(format!("Unknown gender '{}': expected male or female", other)),
        }
    }
}

/// Request body of `POST /predict`.
///
/// Field names follow the wire format used by the form client. Numeric bounds are
/// not enforced here; see [`crate::services::validation::validate_patient`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPatientInput {
    /// Age in years
    pub age: i64,
    pub gender: Gender,
    /// Height in centimetres
    pub height: f64,
    /// Weight in kilograms
    pub weight: f64,
    /// Systolic blood pressure
    pub ap_hi: i64,
    /// Diastolic blood pressure
    pub ap_lo: i64,
    /// Total cholesterol in mg/dL
    pub cholesterol: i64,
    /// Fasting glucose in mg/dL
    pub gluc: i64,
    #[serde(serialize_with = "serialize_yes_no", deserialize_with = "deserialize_yes_no")]
    pub smoke: bool,
    #[serde(serialize_with = "serialize_yes_no", deserialize_with = "deserialize_yes_no")]
    pub alco: bool,
    #[serde(serialize_with = "serialize_yes_no", deserialize_with = "deserialize_yes_no")]
    pub active: bool,
}

/// Patient attributes that passed validation.
///
/// Every numeric field lies within the bounds enforced by
/// [`crate::services::validation::validate_patient`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatientInput {
    pub age: u32,
    pub gender: Gender,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub systolic: u32,
    pub diastolic: u32,
    pub cholesterol_mgdl: u32,
    pub glucose_mgdl: u32,
    pub smokes: bool,
    pub drinks_alcohol: bool,
    pub physically_active: bool,
}

fn serialize_yes_no<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(if *value { "yes" } else { "no" })
}

/// Accepts `"yes"`/`"no"` (any case) or a JSON boolean.
fn deserialize_yes_no<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as SerdeError;
    use serde_json::Value;

    match Value::deserialize(deserializer)? {
        Value::Bool(b) => Ok(b),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "yes" => Ok(true),
            "no" => Ok(false),
            _ => Err(SerdeError::custom(format!(
                "expected \"yes\" or \"no\", got \"{}\"",
                s
            ))),
        },
        other => Err(SerdeError::custom(format!(
            "expected \"yes\" or \"no\", got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_json() -> serde_json::Value {
        json!({
            "age": 50, "gender": "male", "height": 170.0, "weight": 80.0,
            "ap_hi": 140, "ap_lo": 90, "cholesterol": 250, "gluc": 110,
            "smoke": "no", "alco": "no", "active": "yes"
        })
    }

    #[test]
    fn test_parse_form_payload() {
        let raw: RawPatientInput = serde_json::from_value(sample_json()).unwrap();
        assert_eq!(raw.gender, Gender::Male);
        assert!(!raw.smoke);
        assert!(!raw.alco);
        assert!(raw.active);
    }

    #[test]
    fn test_flags_accept_booleans() {
        let mut value = sample_json();
        value["smoke"] = json!(true);
        value["active"] = json!(false);
        let raw: RawPatientInput = serde_json::from_value(value).unwrap();
        assert!(raw.smoke);
        assert!(!raw.active);
    }

    #[test]
    fn test_flags_reject_other_strings() {
        let mut value = sample_json();
        value["alco"] = json!("sometimes");
        let err = serde_json::from_value::<RawPatientInput>(value).unwrap_err();
        assert!(err.to_string().contains("expected \"yes\" or \"no\""));
    }

    #[test]
    fn test_unknown_gender_rejected() {
        let mut value = sample_json();
        value["gender"] = json!("other");
        assert!(serde_json::from_value::<RawPatientInput>(value).is_err());
    }

    #[test]
    fn test_serializes_flags_as_yes_no() {
        let raw: RawPatientInput = serde_json::from_value(sample_json()).unwrap();
        let out = serde_json::to_value(&raw).unwrap();
        assert_eq!(out["smoke"], "no");
        assert_eq!(out["active"], "yes");
        assert_eq!(out["gender"], "male");
    }

    #[test]
    fn test_gender_from_str() {
        assert_eq!(" Female ".parse::<Gender>().unwrap(), Gender::Female);
        assert!("other".parse::<Gender>().is_err());
    }
}
