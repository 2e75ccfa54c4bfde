//! Performa - Inference engine for student performance index prediction
//!
//! Performa turns five student-performance features into a predicted
//! performance index with a qualitative category band, through a deterministic
//! pipeline: record building -> model prediction -> classification -> report
//! encoding.
//!
//! ## Modules
//!
//! - **record**: feature record construction from raw form inputs
//! - **model**: serialized ridge regression artifact and the predictor boundary
//! - **store**: load-once model cache with an explicit failure state
//! - **classifier**: three-band categorization of the predicted index
//! - **report**: versioned JSON report payloads

pub mod classifier;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod record;
pub mod report;
pub mod store;
pub mod types;

pub use classifier::ResultClassifier;
pub use error::PredictError;
pub use model::{Predictor, PredictorOutput, RidgeModel};
pub use pipeline::{assess, PerformaEngine};
pub use record::{RecordBuilder, FEATURE_NAMES};
pub use store::{ModelState, ModelStore, DEFAULT_MODEL_PATH};
pub use types::{Assessment, AssessmentReport, Category, ExtracurricularChoice, StudentInput};

/// Performa version embedded in all report payloads
pub const PERFORMA_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for report payloads
pub const PRODUCER_NAME: &str = "performa";
