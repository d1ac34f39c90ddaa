//! Feature encoding from validated patients to the model's input vector.

use crate::models::{CholesterolLevel, FeatureVector, GlucoseLevel, Gender, PatientInput};

/// Body mass index from height in centimetres and weight in kilograms.
pub fn body_mass_index(height_cm: f64, weight_kg: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Indicator block with a single hot position.
///
/// `None` or an out-of-range index yields an all-zero block.
pub fn one_hot<const N: usize>(hot: Option<usize>) -> [f64; N] {
    let mut block = [0.0; N];
    if let Some(slot) = hot.and_then(|idx| block.get_mut(idx)) {
        *slot = 1.0;
    }
    block
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Encode a validated patient into the fixed-order feature vector.
///
/// Raw height and weight only contribute through BMI.
pub fn encode(patient: &PatientInput) -> FeatureVector {
    let cholesterol = CholesterolLevel::from_mgdl(patient.cholesterol_mgdl);
    let glucose = GlucoseLevel::from_mgdl(patient.glucose_mgdl);

    let [cholesterol_high, cholesterol_normal, cholesterol_very_high] =
        one_hot::<3>(Some(cholesterol.indicator_index()));
    let [glucose_bucket_1, glucose_bucket_2, glucose_bucket_3] =
        one_hot::<3>(Some(glucose.indicator_index()));

    let features = FeatureVector {
        age: f64::from(patient.age),
        gender_code: flag(patient.gender == Gender::Male),
        systolic: f64::from(patient.systolic),
        diastolic: f64::from(patient.diastolic),
        smoke_code: flag(patient.smokes),
        alcohol_code: flag(patient.drinks_alcohol),
        active_code: flag(patient.physically_active),
        bmi: body_mass_index(patient.height_cm, patient.weight_kg),
        cholesterol_high,
        cholesterol_normal,
        cholesterol_very_high,
        glucose_bucket_1,
        glucose_bucket_2,
        glucose_bucket_3,
    };

    log::debug!(
        "Encoded patient: bmi={:.2} cholesterol={} glucose_bucket={}",
        features.bmi,
        cholesterol.as_str(),
        glucose.bucket()
    );
    log::trace!("Feature vector: {:?}", features.named().collect::<Vec<_>>());

    features
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient(cholesterol_mgdl: u32, glucose_mgdl: u32) -> PatientInput {
        PatientInput {
            age: 50,
            gender: Gender::Male,
            height_cm: 170.0,
            weight_kg: 80.0,
            systolic: 140,
            diastolic: 90,
            cholesterol_mgdl,
            glucose_mgdl,
            smokes: false,
            drinks_alcohol: false,
            physically_active: true,
        }
    }

    #[test]
    fn test_bmi_reference_value() {
        let bmi = body_mass_index(180.0, 72.0);
        assert!((bmi - 22.22).abs() < 0.01, "bmi was {}", bmi);
    }

    #[test]
    fn test_reference_patient() {
        let features = encode(&patient(250, 110));
        assert_eq!(features.age, 50.0);
        assert_eq!(features.gender_code, 1.0);
        assert_eq!(features.systolic, 140.0);
        assert_eq!(features.diastolic, 90.0);
        assert_eq!(features.smoke_code, 0.0);
        assert_eq!(features.alcohol_code, 0.0);
        assert_eq!(features.active_code, 1.0);
        assert!((features.bmi - 27.68).abs() < 0.01);
        assert_eq!(features.cholesterol_indicators(), [0.0, 0.0, 1.0]);
        assert_eq!(features.glucose_indicators(), [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_female_non_active_smoker() {
        let mut input = patient(180, 90);
        input.gender = Gender::Female;
        input.smokes = true;
        input.drinks_alcohol = true;
        input.physically_active = false;
        let features = encode(&input);
        assert_eq!(features.gender_code, 0.0);
        assert_eq!(features.smoke_code, 1.0);
        assert_eq!(features.alcohol_code, 1.0);
        assert_eq!(features.active_code, 0.0);
        assert_eq!(features.cholesterol_normal, 1.0);
        assert_eq!(features.glucose_bucket_1, 1.0);
    }

    #[test]
    fn test_cholesterol_one_hot_boundaries() {
        assert_eq!(encode(&patient(199, 90)).cholesterol_normal, 1.0);
        assert_eq!(encode(&patient(200, 90)).cholesterol_high, 1.0);
        assert_eq!(encode(&patient(239, 90)).cholesterol_high, 1.0);
        assert_eq!(encode(&patient(240, 90)).cholesterol_very_high, 1.0);
    }

    #[test]
    fn test_glucose_one_hot_boundaries() {
        assert_eq!(encode(&patient(150, 99)).glucose_bucket_1, 1.0);
        assert_eq!(encode(&patient(150, 100)).glucose_bucket_2, 1.0);
        assert_eq!(encode(&patient(150, 125)).glucose_bucket_2, 1.0);
        assert_eq!(encode(&patient(150, 126)).glucose_bucket_3, 1.0);
    }

    #[test]
    fn test_one_hot_missing_bucket_is_all_zero() {
        assert_eq!(one_hot::<3>(None), [0.0, 0.0, 0.0]);
        assert_eq!(one_hot::<3>(Some(7)), [0.0, 0.0, 0.0]);
        assert_eq!(one_hot::<3>(Some(1)), [0.0, 1.0, 0.0]);
    }
}
