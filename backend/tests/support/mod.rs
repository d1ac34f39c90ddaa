#![allow(dead_code)]

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Mutex;

use serde_json::{json, Value};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores the previous values on unwind and serializes access to the
/// process-global environment across parallel tests.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// Path to the three-tree test model.
pub fn fixture_model_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/cardio_model.json")
}

/// Payload scored as high risk by the fixture model (p ≈ 0.61).
pub fn high_risk_payload() -> Value {
    json!({
        "age": 50,
        "gender": "male",
        "height": 170,
        "weight": 80,
        "ap_hi": 140,
        "ap_lo": 90,
        "cholesterol": 250,
        "gluc": 110,
        "smoke": "no",
        "alco": "no",
        "active": "yes"
    })
}

/// Payload scored as low risk by the fixture model (p ≈ 0.29).
pub fn low_risk_payload() -> Value {
    json!({
        "age": 40,
        "gender": "female",
        "height": 165,
        "weight": 60,
        "ap_hi": 120,
        "ap_lo": 80,
        "cholesterol": 180,
        "gluc": 90,
        "smoke": "no",
        "alco": "yes",
        "active": "yes"
    })
}

/// Copy of `payload` with `field` replaced.
pub fn with_field(mut payload: Value, field: &str, value: Value) -> Value {
    payload[field] = value;
    payload
}
