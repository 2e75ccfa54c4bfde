//! Feature record construction
//!
//! This module builds the one-row feature record handed to the model:
//! - Pass-through of the four numeric inputs
//! - Indicator encoding of the extracurricular choice (Yes = 1, No = 0)
//! - Canonical name table in training-schema order

use crate::types::{FeatureRecord, StudentInput};

/// Feature names in the exact order the model was trained on
pub const FEATURE_NAMES: [&str; 5] = [
    "Hours Studied",
    "Previous Scores",
    "Extracurricular Activities",
    "Sleep Hours",
    "Sample Question Papers Practiced",
];

/// Builder for model-ready feature records
pub struct RecordBuilder;

impl RecordBuilder {
    /// Build a feature record from raw form inputs
    ///
    /// Pure function: identical inputs always produce identical records.
    pub fn build(input: &StudentInput) -> FeatureRecord {
        FeatureRecord {
            hours_studied: input.hours_studied as f64,
            previous_scores: input.previous_scores as f64,
            extracurricular_activities: input.extracurricular.as_indicator() as f64,
            sleep_hours: input.sleep_hours as f64,
            sample_papers_practiced: input.sample_papers as f64,
        }
    }
}
