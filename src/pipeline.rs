//! Pipeline orchestration
//!
//! This module provides the public API for Performa. One interaction runs the
//! full synchronous sequence: build record -> invoke predictor -> normalize
//! output -> classify -> encode report.

use std::path::PathBuf;

use crate::classifier::ResultClassifier;
use crate::error::PredictError;
use crate::model::Predictor;
use crate::record::RecordBuilder;
use crate::report::ReportEncoder;
use crate::store::{ModelState, ModelStore};
use crate::types::{Assessment, AssessmentReport, StudentInput};

/// Run one prediction request against an already-available predictor.
///
/// # Arguments
/// * `predictor` - the model collaborator
/// * `input` - raw form inputs
///
/// # Returns
/// The assessment: predicted performance index plus its category band
///
/// # Example
/// ```ignore
/// let model = RidgeModel::load(Path::new("model/ridge.json"))?;
/// let assessment = assess(&model, &StudentInput::default())?;
/// ```
pub fn assess(
    predictor: &dyn Predictor,
    input: &StudentInput,
) -> Result<Assessment, PredictError> {
    // Stage 1: Build the model-ready feature record
    let record = RecordBuilder::build(input);

    // Stage 2: Invoke the collaborator and normalize its return shape
    let performance_index = predictor.predict(&record)?.into_scalar()?;

    // Stage 3: Classify into a category band
    let category = ResultClassifier::classify(performance_index);

    Ok(Assessment {
        input: *input,
        record,
        performance_index,
        category,
    })
}

/// Stateful engine holding the load-once model cache and report encoder.
///
/// Use this for the request-per-interaction surface: the model is loaded on
/// the first request and reused read-only for the process lifetime.
pub struct PerformaEngine {
    store: ModelStore,
    encoder: ReportEncoder,
}

impl Default for PerformaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PerformaEngine {
    /// Create an engine using the default model path
    pub fn new() -> Self {
        Self {
            store: ModelStore::default(),
            encoder: ReportEncoder::new(),
        }
    }

    /// Create an engine loading its model from a specific artifact path
    pub fn with_model_path(path: impl Into<PathBuf>) -> Self {
        Self {
            store: ModelStore::new(path),
            encoder: ReportEncoder::new(),
        }
    }

    /// Load the model if needed and report its state
    pub fn model_state(&mut self) -> &ModelState {
        self.store.ensure_loaded()
    }

    /// Run one prediction request
    ///
    /// If the model is unavailable the request is never attempted; the cached
    /// failure reason is returned instead.
    pub fn assess(&mut self, input: &StudentInput) -> Result<Assessment, PredictError> {
        self.store.ensure_loaded();
        let model = self.store.get()?;
        assess(model, input)
    }

    /// Run one prediction request and encode the report payload
    pub fn assess_to_report(
        &mut self,
        input: &StudentInput,
    ) -> Result<AssessmentReport, PredictError> {
        self.store.ensure_loaded();
        let model = self.store.get()?;
        let assessment = assess(model, input)?;
        Ok(self.encoder.encode(&assessment, model, self.store.path()))
    }

    /// Run one prediction request and encode the report as pretty JSON
    pub fn assess_to_json(&mut self, input: &StudentInput) -> Result<String, PredictError> {
        let report = self.assess_to_report(input)?;
        serde_json::to_string_pretty(&report).map_err(PredictError::JsonError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PredictorOutput, RidgeModel};
    use crate::record::FEATURE_NAMES;
    use crate::types::{Category, ExtracurricularChoice, FeatureRecord};
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn unit_model() -> RidgeModel {
        RidgeModel {
            model_kind: "ridge".to_string(),
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            coefficients: vec![1.0, 1.0, 1.0, 1.0, 1.0],
            intercept: 0.0,
            alpha: None,
            r_squared: None,
        }
    }

    /// Collaborator stub that fails every call
    struct FailingPredictor;

    impl Predictor for FailingPredictor {
        fn predict(&self, _record: &FeatureRecord) -> Result<PredictorOutput, PredictError> {
            Err(PredictError::PredictionFailure {
                message: "internal numeric fault".to_string(),
            })
        }
    }

    /// Collaborator stub that returns a length-1 sequence
    struct SequencePredictor(Vec<f64>);

    impl Predictor for SequencePredictor {
        fn predict(&self, _record: &FeatureRecord) -> Result<PredictorOutput, PredictError> {
            Ok(PredictorOutput::Sequence(self.0.clone()))
        }
    }

    #[test]
    fn test_assess_default_input() {
        let model = unit_model();
        let assessment = assess(&model, &StudentInput::default()).unwrap();

        // 5 + 75 + 1 + 7 + 2 = 90
        assert_eq!(assessment.performance_index, 90.0);
        assert_eq!(assessment.category, Category::SangatBaik);
        assert_eq!(assessment.record.values(), [5.0, 75.0, 1.0, 7.0, 2.0]);
    }

    #[test]
    fn test_assess_zero_input() {
        let model = unit_model();
        let input = StudentInput {
            hours_studied: 0,
            previous_scores: 0,
            extracurricular: ExtracurricularChoice::No,
            sleep_hours: 0,
            sample_papers: 0,
        };
        let assessment = assess(&model, &input).unwrap();

        assert_eq!(assessment.performance_index, 0.0);
        assert_eq!(assessment.category, Category::PerluPeningkatan);
    }

    #[test]
    fn test_nan_prediction_lands_in_lowest_band() {
        let mut model = unit_model();
        model.intercept = f64::NAN;

        let assessment = assess(&model, &StudentInput::default()).unwrap();
        assert!(assessment.performance_index.is_nan());
        assert_eq!(assessment.category, Category::PerluPeningkatan);
    }

    #[test]
    fn test_collaborator_failure_is_surfaced() {
        let err = assess(&FailingPredictor, &StudentInput::default()).unwrap_err();
        match err {
            PredictError::PredictionFailure { message } => {
                assert_eq!(message, "internal numeric fault");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_sequence_output_is_normalized() {
        let predictor = SequencePredictor(vec![72.5]);
        let assessment = assess(&predictor, &StudentInput::default()).unwrap();

        assert_eq!(assessment.performance_index, 72.5);
        assert_eq!(assessment.category, Category::Baik);
    }

    #[test]
    fn test_empty_sequence_is_a_failure() {
        let predictor = SequencePredictor(Vec::new());
        let err = assess(&predictor, &StudentInput::default()).unwrap_err();
        assert!(matches!(err, PredictError::PredictionFailure { .. }));
    }

    #[test]
    fn test_engine_missing_model_never_predicts() {
        let mut engine = PerformaEngine::with_model_path("no/such/model.json");

        let err = engine.assess(&StudentInput::default()).unwrap_err();
        assert!(matches!(err, PredictError::ModelUnavailable { .. }));
        assert!(matches!(engine.model_state(), ModelState::Failed(_)));
    }

    #[test]
    fn test_engine_end_to_end() {
        let dir = std::env::temp_dir().join("performa-engine-e2e");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("ridge.json");
        std::fs::write(&path, serde_json::to_string(&unit_model()).unwrap()).unwrap();

        let mut engine = PerformaEngine::with_model_path(&path);
        let report = engine.assess_to_report(&StudentInput::default()).unwrap();

        assert_eq!(report.prediction.performance_index, 90.0);
        assert_eq!(report.prediction.formatted, "90.00");
        assert_eq!(report.prediction.label, "Sangat Baik");
        assert_eq!(report.provenance.model_path, path.display().to_string());
        assert_eq!(report.provenance.model_kind, "ridge");
    }

    #[test]
    fn test_engine_reuses_cached_model() {
        let dir = std::env::temp_dir().join("performa-engine-cache");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("ridge.json");
        std::fs::write(&path, serde_json::to_string(&unit_model()).unwrap()).unwrap();

        let mut engine = PerformaEngine::with_model_path(&path);
        assert!(engine.assess(&StudentInput::default()).is_ok());

        // Removing the artifact after the first request must not matter
        std::fs::remove_file(&path).unwrap();
        assert!(engine.assess(&StudentInput::default()).is_ok());
        assert!(!Path::new(&path).exists());
    }
}
