//! Cardio risk terminal client
//!
//! Collects the patient form on stdin and posts it to a running server.
//!
//! # Usage
//!
//! ```bash
//! # Interactive form
//! cargo run --bin cardio-client
//!
//! # Post a prepared payload as-is
//! cargo run --bin cardio-client -- --json patient.json
//! ```
//!
//! # Environment Variables
//!
//! - `PREDICTOR_URL`: server base URL (default: http://localhost:8000)

use std::env;
use std::fs;
use std::io;

use anyhow::{bail, Context};

use cardio_risk::client::{render_outcome, ClientError, PatientForm, PredictorClient};
use cardio_risk::services::RiskCategory;

fn json_path_arg() -> anyhow::Result<Option<String>> {
    let mut args = env::args().skip(1);
    match args.next().as_deref() {
        None => Ok(None),
        Some("--json") => match args.next() {
            Some(path) => Ok(Some(path)),
            None => bail!("--json requires a file path"),
        },
        Some(other) => bail!("unknown argument '{}'. Usage: cardio-client [--json <file>]", other),
    }
}

fn report(err: &ClientError) {
    eprintln!("{}", err);
    if let Some(body) = err.response_body() {
        // Pretty-print JSON bodies; fall back to the raw text.
        match serde_json::from_str::<serde_json::Value>(body) {
            Ok(value) => match serde_json::to_string_pretty(&value) {
                Ok(pretty) => eprintln!("{}", pretty),
                Err(_) => eprintln!("{}", body),
            },
            Err(_) => eprintln!("{}", body),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = PredictorClient::from_env()?;

    let outcome: Result<RiskCategory, ClientError> = match json_path_arg()? {
        Some(path) => {
            let content =
                fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path))?;
            let payload: serde_json::Value = serde_json::from_str(&content)
                .with_context(|| format!("{} is not valid JSON", path))?;
            client.predict(&payload).await
        }
        None => {
            println!("Cardiovascular Disease Risk Prediction");
            println!("Server: {}", client.base_url());
            let stdin = io::stdin();
            let patient = PatientForm::new(stdin.lock(), io::stdout()).collect()?;
            client.predict(&patient).await
        }
    };

    match outcome {
        Ok(risk) => {
            println!("{}", render_outcome(risk));
            Ok(())
        }
        Err(err) => {
            report(&err);
            Err(err.into())
        }
    }
}
