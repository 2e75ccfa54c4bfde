//! Core types for the Performa pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: raw form input, feature record, category band, and report output.

use serde::{Deserialize, Serialize};

use crate::error::PredictError;

/// Maximum hours per day for the hour-valued inputs
pub const MAX_HOURS: u8 = 24;
/// Maximum value for score-valued inputs (previous scores, sample papers)
pub const MAX_SCORE: u8 = 100;

/// Extracurricular participation choice, as presented by the input form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtracurricularChoice {
    #[serde(alias = "yes")]
    Yes,
    #[serde(alias = "no")]
    No,
}

impl ExtracurricularChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtracurricularChoice::Yes => "Yes",
            ExtracurricularChoice::No => "No",
        }
    }

    /// Indicator encoding used at training time: Yes = 1, No = 0
    pub fn as_indicator(&self) -> u8 {
        match self {
            ExtracurricularChoice::Yes => 1,
            ExtracurricularChoice::No => 0,
        }
    }
}

/// Raw form inputs for one prediction request
///
/// Bounds mirror the input widgets: hour-valued fields are 0-24, score-valued
/// fields are 0-100. Widget surfaces clamp these before submission; file-driven
/// surfaces call [`StudentInput::validate`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentInput {
    /// Daily study time (hours)
    pub hours_studied: u8,
    /// Score from the previous examination (0-100)
    pub previous_scores: u8,
    /// Extracurricular participation
    pub extracurricular: ExtracurricularChoice,
    /// Daily sleep time (hours)
    pub sleep_hours: u8,
    /// Number of sample question papers practiced
    pub sample_papers: u8,
}

impl Default for StudentInput {
    /// Form defaults: 5 hours studied, previous score 75, extracurricular Yes,
    /// 7 sleep hours, 2 sample papers
    fn default() -> Self {
        Self {
            hours_studied: 5,
            previous_scores: 75,
            extracurricular: ExtracurricularChoice::Yes,
            sleep_hours: 7,
            sample_papers: 2,
        }
    }
}

impl StudentInput {
    /// Check all fields against the widget bounds
    pub fn validate(&self) -> Result<(), PredictError> {
        check_range("hours_studied", self.hours_studied, MAX_HOURS)?;
        check_range("previous_scores", self.previous_scores, MAX_SCORE)?;
        check_range("sleep_hours", self.sleep_hours, MAX_HOURS)?;
        check_range("sample_papers", self.sample_papers, MAX_SCORE)?;
        Ok(())
    }

    /// Parse newline-delimited JSON into input records
    pub fn parse_ndjson(data: &str) -> Result<Vec<StudentInput>, PredictError> {
        let mut records = Vec::new();
        for line in data.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            records.push(serde_json::from_str(trimmed)?);
        }
        Ok(records)
    }

    /// Parse a JSON array into input records
    pub fn parse_array(data: &str) -> Result<Vec<StudentInput>, PredictError> {
        Ok(serde_json::from_str(data)?)
    }
}

fn check_range(field: &str, value: u8, max: u8) -> Result<(), PredictError> {
    if value > max {
        return Err(PredictError::InvalidInput {
            field: field.to_string(),
            value: value as u32,
            min: 0,
            max: max as u32,
        });
    }
    Ok(())
}

/// One-row feature record matching the model's training schema
///
/// Field order mirrors [`crate::record::FEATURE_NAMES`]. Constructed fresh per
/// prediction request and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureRecord {
    pub hours_studied: f64,
    pub previous_scores: f64,
    pub extracurricular_activities: f64,
    pub sleep_hours: f64,
    pub sample_papers_practiced: f64,
}

impl FeatureRecord {
    /// Values in training-schema order
    pub fn values(&self) -> [f64; 5] {
        [
            self.hours_studied,
            self.previous_scores,
            self.extracurricular_activities,
            self.sleep_hours,
            self.sample_papers_practiced,
        ]
    }
}

/// Category band for a predicted performance index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    SangatBaik,
    Baik,
    PerluPeningkatan,
}

impl Category {
    /// Display label shown to the user
    pub fn label(&self) -> &'static str {
        match self {
            Category::SangatBaik => "Sangat Baik",
            Category::Baik => "Baik",
            Category::PerluPeningkatan => "Perlu Peningkatan",
        }
    }

    /// English gloss of the band
    pub fn description(&self) -> &'static str {
        match self {
            Category::SangatBaik => "Excellent",
            Category::Baik => "Good",
            Category::PerluPeningkatan => "Needs Improvement",
        }
    }
}

/// Result of one prediction request, before report encoding
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    /// Echo of the raw inputs
    pub input: StudentInput,
    /// The record handed to the model
    pub record: FeatureRecord,
    /// Predicted performance index
    pub performance_index: f64,
    /// Category band for the prediction
    pub category: Category,
}

/// Report producer metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Report provenance information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportProvenance {
    pub model_path: String,
    pub model_kind: String,
    pub computed_at_utc: String,
}

/// Prediction section of a report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportPrediction {
    /// Raw predicted value
    pub performance_index: f64,
    /// Value formatted to two decimals for display
    pub formatted: String,
    pub category: Category,
    /// Display label for the category
    pub label: String,
}

/// Complete assessment report payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentReport {
    pub report_version: String,
    pub producer: ReportProducer,
    pub provenance: ReportProvenance,
    pub input: StudentInput,
    pub prediction: ReportPrediction,
}
