//! Loading the classifier artifact from disk.

use std::fs;
use std::path::Path;

use super::checksum::calculate_checksum;
use super::xgboost::XgbModel;
use super::{Classifier, ModelLoadError, TreeEnsemble};

/// Load and compile the XGBoost JSON model at `path`.
///
/// Called once at startup. Every structural problem with the artifact is reported
/// here so that no request ever sees a half-usable model.
pub fn load_classifier<P: AsRef<Path>>(path: P) -> Result<TreeEnsemble, ModelLoadError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| ModelLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let checksum = calculate_checksum(&bytes);

    let model = XgbModel::from_slice(&bytes).map_err(|err| ModelLoadError::Parse {
        path: err.path().to_string(),
        message: err.into_inner().to_string(),
    })?;

    let ensemble = TreeEnsemble::from_xgboost(&model)?.with_checksum(checksum);

    let summary = ensemble.summary();
    log::info!(
        "Loaded model from {}: booster={} objective={} trees={} sha256={}",
        path.display(),
        summary.booster,
        summary.objective,
        summary.num_trees,
        summary.checksum.as_deref().unwrap_or("-")
    );
    if !model.version.is_empty() {
        log::debug!("Model was written by XGBoost {:?}", model.version);
    }

    Ok(ensemble)
}
