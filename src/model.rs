//! Serialized regression model
//!
//! This module defines the on-disk model artifact and the predictor boundary:
//! - `RidgeModel` - serde-deserialized linear model with named coefficients
//! - `Predictor` - the trait the pipeline calls through
//! - `PredictorOutput` - scalar-or-sequence return shape, normalized once at
//!   the boundary

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::PredictError;
use crate::record::FEATURE_NAMES;
use crate::types::FeatureRecord;

/// Trait for prediction collaborators
pub trait Predictor {
    /// Produce a prediction for a single feature record
    fn predict(&self, record: &FeatureRecord) -> Result<PredictorOutput, PredictError>;
}

/// Return shape of a predictor call
///
/// Some collaborators return a scalar, others a length-1 sequence. Callers
/// normalize immediately via [`PredictorOutput::into_scalar`] instead of
/// branching on shape at use-sites.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictorOutput {
    Scalar(f64),
    Sequence(Vec<f64>),
}

impl PredictorOutput {
    /// Normalize to a single scalar, taking the first element of a sequence
    pub fn into_scalar(self) -> Result<f64, PredictError> {
        match self {
            PredictorOutput::Scalar(value) => Ok(value),
            PredictorOutput::Sequence(values) => {
                values
                    .first()
                    .copied()
                    .ok_or_else(|| PredictError::PredictionFailure {
                        message: "predictor returned an empty sequence".to_string(),
                    })
            }
        }
    }
}

/// Serialized ridge regression model
///
/// The artifact stores the fitted coefficients by feature name so that a
/// schema divergence fails at load time instead of inside the prediction call:
///
/// ```text
/// index = intercept + sum(coefficients[i] * record[i])
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RidgeModel {
    /// Model family identifier (e.g. "ridge")
    pub model_kind: String,
    /// Feature names in training order
    pub feature_names: Vec<String>,
    /// Fitted coefficients, one per feature
    pub coefficients: Vec<f64>,
    /// Fitted intercept
    pub intercept: f64,
    /// Regularization strength used at training time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
    /// R-squared of the model fit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r_squared: Option<f64>,
}

impl RidgeModel {
    /// Deserialize and schema-check a model from JSON
    pub fn from_json(json: &str) -> Result<Self, PredictError> {
        let model: RidgeModel = serde_json::from_str(json)?;
        model.validate_schema()?;
        Ok(model)
    }

    /// Load a model artifact from disk
    ///
    /// A missing or unreadable file, a malformed artifact, and a schema
    /// mismatch all surface as `ModelUnavailable` so the caller can disable
    /// the prediction path with a single reason string.
    pub fn load(path: &Path) -> Result<Self, PredictError> {
        let data = fs::read_to_string(path).map_err(|e| PredictError::ModelUnavailable {
            reason: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_json(&data).map_err(|e| PredictError::ModelUnavailable {
            reason: format!("invalid model artifact {}: {}", path.display(), e),
        })
    }

    /// Verify the artifact's feature table against the canonical schema
    ///
    /// Names and order must match exactly, and there must be one coefficient
    /// per feature.
    pub fn validate_schema(&self) -> Result<(), PredictError> {
        if self.feature_names != FEATURE_NAMES {
            return Err(PredictError::SchemaMismatch {
                expected: FEATURE_NAMES.join(", "),
                actual: self.feature_names.join(", "),
            });
        }
        if self.coefficients.len() != FEATURE_NAMES.len() {
            return Err(PredictError::SchemaMismatch {
                expected: format!("{} coefficients", FEATURE_NAMES.len()),
                actual: format!("{} coefficients", self.coefficients.len()),
            });
        }
        Ok(())
    }
}

impl Predictor for RidgeModel {
    fn predict(&self, record: &FeatureRecord) -> Result<PredictorOutput, PredictError> {
        // Schema is checked at load time; re-check here for models built in code
        self.validate_schema()?;

        let value: f64 = self.intercept
            + record
                .values()
                .iter()
                .zip(&self.coefficients)
                .map(|(x, c)| x * c)
                .sum::<f64>();

        // Non-finite values pass through; the classifier is total over all reals
        Ok(PredictorOutput::Scalar(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordBuilder;
    use crate::types::StudentInput;
    use pretty_assertions::assert_eq;

    fn unit_model() -> RidgeModel {
        RidgeModel {
            model_kind: "ridge".to_string(),
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            coefficients: vec![1.0, 1.0, 1.0, 1.0, 1.0],
            intercept: 0.0,
            alpha: Some(1.0),
            r_squared: None,
        }
    }

    #[test]
    fn test_predict_is_dot_product_plus_intercept() {
        let mut model = unit_model();
        model.intercept = 10.0;

        let record = RecordBuilder::build(&StudentInput::default());
        let value = model.predict(&record).unwrap().into_scalar().unwrap();

        // 5 + 75 + 1 + 7 + 2 + 10
        assert_eq!(value, 100.0);
    }

    #[test]
    fn test_from_json_round_trip() {
        let json = serde_json::to_string(&unit_model()).unwrap();
        let model = RidgeModel::from_json(&json).unwrap();
        assert_eq!(model.coefficients, vec![1.0; 5]);
        assert_eq!(model.model_kind, "ridge");
    }

    #[test]
    fn test_from_json_rejects_renamed_feature() {
        let mut model = unit_model();
        model.feature_names[2] = "Extracurriculars".to_string();
        let json = serde_json::to_string(&model).unwrap();

        let err = RidgeModel::from_json(&json).unwrap_err();
        assert!(matches!(err, PredictError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_from_json_rejects_reordered_features() {
        let mut model = unit_model();
        model.feature_names.swap(0, 1);
        let json = serde_json::to_string(&model).unwrap();

        let err = RidgeModel::from_json(&json).unwrap_err();
        assert!(matches!(err, PredictError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_from_json_rejects_short_coefficients() {
        let mut model = unit_model();
        model.coefficients.pop();
        let json = serde_json::to_string(&model).unwrap();

        let err = RidgeModel::from_json(&json).unwrap_err();
        assert!(matches!(err, PredictError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_load_missing_file_is_unavailable() {
        let err = RidgeModel::load(Path::new("does/not/exist.json")).unwrap_err();
        match err {
            PredictError::ModelUnavailable { reason } => {
                assert!(reason.contains("does/not/exist.json"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_nan_prediction_passes_through() {
        let mut model = unit_model();
        model.intercept = f64::NAN;

        let record = RecordBuilder::build(&StudentInput::default());
        let value = model.predict(&record).unwrap().into_scalar().unwrap();
        assert!(value.is_nan());
    }

    #[test]
    fn test_into_scalar_takes_first_of_sequence() {
        let value = PredictorOutput::Sequence(vec![42.5, 9.0])
            .into_scalar()
            .unwrap();
        assert_eq!(value, 42.5);
    }

    #[test]
    fn test_into_scalar_rejects_empty_sequence() {
        let err = PredictorOutput::Sequence(Vec::new()).into_scalar().unwrap_err();
        assert!(matches!(err, PredictError::PredictionFailure { .. }));
    }
}
