//! Model store
//!
//! This module caches the deserialized model for the process lifetime.
//! The load outcome is explicit and sticky: a failed load is recorded and
//! never retried, and the prediction path stays disabled while the store
//! holds a failure.

use std::path::{Path, PathBuf};

use crate::error::PredictError;
use crate::model::RidgeModel;

/// Default relative path of the model artifact
pub const DEFAULT_MODEL_PATH: &str = "model/ridge.json";

/// Load state of the cached model
#[derive(Debug, Clone)]
pub enum ModelState {
    /// No load attempted yet
    Uninitialized,
    /// Model loaded and schema-checked
    Ready(RidgeModel),
    /// Load failed; the reason is reported once and cached
    Failed(String),
}

/// Load-once cache for the model artifact
#[derive(Debug)]
pub struct ModelStore {
    path: PathBuf,
    state: ModelState,
}

impl Default for ModelStore {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL_PATH)
    }
}

impl ModelStore {
    /// Create a store for the artifact at `path`; nothing is loaded yet
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: ModelState::Uninitialized,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> &ModelState {
        &self.state
    }

    /// Load the artifact if no attempt has been made yet
    ///
    /// The outcome (success or failure) is cached for the process lifetime.
    pub fn ensure_loaded(&mut self) -> &ModelState {
        if matches!(self.state, ModelState::Uninitialized) {
            self.state = match RidgeModel::load(&self.path) {
                Ok(model) => ModelState::Ready(model),
                Err(e) => ModelState::Failed(e.to_string()),
            };
        }
        &self.state
    }

    /// Borrow the loaded model, without triggering a load
    pub fn get(&self) -> Result<&RidgeModel, PredictError> {
        match &self.state {
            ModelState::Ready(model) => Ok(model),
            ModelState::Failed(reason) => Err(PredictError::ModelUnavailable {
                reason: reason.clone(),
            }),
            ModelState::Uninitialized => Err(PredictError::ModelUnavailable {
                reason: "model not loaded".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FEATURE_NAMES;

    fn write_model(dir: &Path) -> PathBuf {
        let model = RidgeModel {
            model_kind: "ridge".to_string(),
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            coefficients: vec![1.0, 1.0, 1.0, 1.0, 1.0],
            intercept: 0.0,
            alpha: None,
            r_squared: None,
        };
        let path = dir.join("ridge.json");
        std::fs::write(&path, serde_json::to_string(&model).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_lazy_load_on_first_use() {
        let dir = std::env::temp_dir().join("performa-store-lazy");
        std::fs::create_dir_all(&dir).unwrap();
        let path = write_model(&dir);

        let mut store = ModelStore::new(&path);
        assert!(matches!(store.state(), ModelState::Uninitialized));
        assert!(store.get().is_err());

        store.ensure_loaded();
        assert!(store.get().is_ok());
        assert!(matches!(store.state(), ModelState::Ready(_)));
    }

    #[test]
    fn test_missing_file_caches_failure() {
        let mut store = ModelStore::new("no/such/model.json");

        store.ensure_loaded();
        let err = store.get().unwrap_err();
        assert!(matches!(err, PredictError::ModelUnavailable { .. }));

        // Failure state is sticky
        assert!(matches!(store.state(), ModelState::Failed(_)));
        store.ensure_loaded();
        assert!(store.get().is_err());
    }

    #[test]
    fn test_malformed_artifact_caches_failure() {
        let dir = std::env::temp_dir().join("performa-store-malformed");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("ridge.json");
        std::fs::write(&path, "{ not json").unwrap();

        let mut store = ModelStore::new(&path);
        store.ensure_loaded();
        assert!(matches!(store.state(), ModelState::Failed(_)));
    }

    #[test]
    fn test_default_path() {
        let store = ModelStore::default();
        assert_eq!(store.path(), Path::new(DEFAULT_MODEL_PATH));
    }
}
