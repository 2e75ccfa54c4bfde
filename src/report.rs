//! Report encoding
//!
//! This module encodes an assessment into a versioned JSON report payload
//! carrying producer and provenance metadata alongside the prediction.

use chrono::Utc;
use std::path::Path;
use uuid::Uuid;

use crate::error::PredictError;
use crate::model::RidgeModel;
use crate::types::{
    Assessment, AssessmentReport, ReportPrediction, ReportProducer, ReportProvenance,
};
use crate::{PERFORMA_VERSION, PRODUCER_NAME};

/// Current report schema version
pub const REPORT_VERSION: &str = "1.0.0";

/// Encoder for assessment report payloads
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    /// Encode an assessment into a report payload
    pub fn encode(
        &self,
        assessment: &Assessment,
        model: &RidgeModel,
        model_path: &Path,
    ) -> AssessmentReport {
        let producer = ReportProducer {
            name: PRODUCER_NAME.to_string(),
            version: PERFORMA_VERSION.to_string(),
            instance_id: self.instance_id.clone(),
        };

        let provenance = ReportProvenance {
            model_path: model_path.display().to_string(),
            model_kind: model.model_kind.clone(),
            computed_at_utc: Utc::now().to_rfc3339(),
        };

        let prediction = ReportPrediction {
            performance_index: assessment.performance_index,
            formatted: format!("{:.2}", assessment.performance_index),
            category: assessment.category,
            label: assessment.category.label().to_string(),
        };

        AssessmentReport {
            report_version: REPORT_VERSION.to_string(),
            producer,
            provenance,
            input: assessment.input,
            prediction,
        }
    }

    /// Encode to a pretty-printed JSON string
    pub fn encode_to_json(
        &self,
        assessment: &Assessment,
        model: &RidgeModel,
        model_path: &Path,
    ) -> Result<String, PredictError> {
        let report = self.encode(assessment, model, model_path);
        serde_json::to_string_pretty(&report).map_err(PredictError::JsonError)
    }
}
