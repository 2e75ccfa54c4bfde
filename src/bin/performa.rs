//! Performa CLI - Command-line interface for Performa
//!
//! Commands:
//! - predict: Predict the performance index for one set of inputs
//! - batch: Predict for each record in an input file
//! - validate: Validate input records against the form ranges
//! - doctor: Diagnose model availability and configuration
//! - schema: Print schema information

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use performa::model::RidgeModel;
use performa::record::FEATURE_NAMES;
use performa::store::DEFAULT_MODEL_PATH;
use performa::types::{AssessmentReport, ExtracurricularChoice, StudentInput};
use performa::{PerformaEngine, PredictError, PERFORMA_VERSION, PRODUCER_NAME};

/// Performa - Predict a student performance index from five form inputs
#[derive(Parser)]
#[command(name = "performa")]
#[command(author = "Performa Maintainers")]
#[command(version = PERFORMA_VERSION)]
#[command(about = "Predict student performance index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict the performance index for one set of inputs
    Predict {
        /// Daily study time in hours (0-24)
        #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(0..=24))]
        hours_studied: u8,

        /// Previous examination score (0-100)
        #[arg(long, default_value_t = 75, value_parser = clap::value_parser!(u8).range(0..=100))]
        previous_scores: u8,

        /// Extracurricular participation
        #[arg(long, value_enum, default_value = "yes")]
        extracurricular: ChoiceArg,

        /// Daily sleep time in hours (0-24)
        #[arg(long, default_value_t = 7, value_parser = clap::value_parser!(u8).range(0..=24))]
        sleep_hours: u8,

        /// Sample question papers practiced (0-100)
        #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(0..=100))]
        sample_papers: u8,

        /// Model artifact path
        #[arg(long, default_value = DEFAULT_MODEL_PATH)]
        model: PathBuf,

        /// Output the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Predict for each record in an input file (batch mode)
    Batch {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long)]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "ndjson")]
        output_format: OutputFormat,

        /// Model artifact path
        #[arg(long, default_value = DEFAULT_MODEL_PATH)]
        model: PathBuf,
    },

    /// Validate input records against the form ranges
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose model availability and configuration
    Doctor {
        /// Model artifact path to check
        #[arg(long, default_value = DEFAULT_MODEL_PATH)]
        model: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print schema information
    Schema {
        /// Schema to print (input or output)
        #[arg(value_enum)]
        schema_type: SchemaType,

        /// Output as JSON schema
        #[arg(long)]
        json_schema: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ChoiceArg {
    /// Participates in extracurricular activities
    Yes,
    /// Does not participate
    No,
}

impl From<ChoiceArg> for ExtracurricularChoice {
    fn from(choice: ChoiceArg) -> Self {
        match choice {
            ChoiceArg::Yes => ExtracurricularChoice::Yes,
            ChoiceArg::No => ExtracurricularChoice::No,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one record per line)
    Ndjson,
    /// JSON array of records
    Json,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON (one report per line)
    Ndjson,
    /// JSON array of reports
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

#[derive(Clone, ValueEnum)]
enum SchemaType {
    /// Input schema (student_input.v1)
    Input,
    /// Output schema (assessment_report.v1)
    Output,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), PerformaCliError> {
    match cli.command {
        Commands::Predict {
            hours_studied,
            previous_scores,
            extracurricular,
            sleep_hours,
            sample_papers,
            model,
            json,
        } => {
            let input = StudentInput {
                hours_studied,
                previous_scores,
                extracurricular: extracurricular.into(),
                sleep_hours,
                sample_papers,
            };
            cmd_predict(&input, &model, json)
        }

        Commands::Batch {
            input,
            output,
            input_format,
            output_format,
            model,
        } => cmd_batch(&input, &output, input_format, output_format, &model),

        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, input_format, json),

        Commands::Doctor { model, json } => cmd_doctor(&model, json),

        Commands::Schema {
            schema_type,
            json_schema,
        } => cmd_schema(schema_type, json_schema),
    }
}

fn cmd_predict(input: &StudentInput, model: &Path, json: bool) -> Result<(), PerformaCliError> {
    let mut engine = PerformaEngine::with_model_path(model);
    let report = engine.assess_to_report(input)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Prediction Result");
        println!("=================");
        println!("Hours studied:     {}", input.hours_studied);
        println!("Previous scores:   {}", input.previous_scores);
        println!("Extracurricular:   {}", input.extracurricular.as_str());
        println!("Sleep hours:       {}", input.sleep_hours);
        println!("Sample papers:     {}", input.sample_papers);
        println!();
        println!("Performance Index: {}", report.prediction.formatted);
        println!("Kategori:          {}", report.prediction.label);
    }

    Ok(())
}

fn cmd_batch(
    input: &PathBuf,
    output: &PathBuf,
    input_format: InputFormat,
    output_format: OutputFormat,
    model: &Path,
) -> Result<(), PerformaCliError> {
    // Read input
    let input_data = if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(input)?
    };

    // Parse records
    let records = match input_format {
        InputFormat::Ndjson => StudentInput::parse_ndjson(&input_data)?,
        InputFormat::Json => StudentInput::parse_array(&input_data)?,
    };

    if records.is_empty() {
        return Err(PerformaCliError::NoRecords);
    }

    // The model is loaded once and reused across the whole run
    let mut engine = PerformaEngine::with_model_path(model);

    let mut reports: Vec<AssessmentReport> = Vec::new();
    for record in &records {
        record.validate()?;
        reports.push(engine.assess_to_report(record)?);
    }

    // Write output
    let output_data = format_output(&reports, &output_format)?;

    if output.to_string_lossy() == "-" {
        print!("{}", output_data);
        io::stdout().flush()?;
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn cmd_validate(
    input: &PathBuf,
    input_format: InputFormat,
    json: bool,
) -> Result<(), PerformaCliError> {
    // Read input
    let input_data = if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(input)?
    };

    // Parse records
    let records = match input_format {
        InputFormat::Ndjson => StudentInput::parse_ndjson(&input_data)?,
        InputFormat::Json => StudentInput::parse_array(&input_data)?,
    };

    // Validate each record
    let errors: Vec<ValidationErrorDetail> = records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            record.validate().err().map(|e| ValidationErrorDetail {
                index,
                error: e.to_string(),
            })
        })
        .collect();

    let report = ValidationReport {
        total_records: records.len(),
        valid_records: records.len() - errors.len(),
        invalid_records: errors.len(),
        errors,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total records:   {}", report.total_records);
        println!("Valid records:   {}", report.valid_records);
        println!("Invalid records: {}", report.invalid_records);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!("  - Record {}: {}", err.index, err.error);
            }
        }
    }

    if report.invalid_records > 0 {
        Err(PerformaCliError::ValidationFailed(report.invalid_records))
    } else {
        Ok(())
    }
}

fn cmd_doctor(model: &Path, json: bool) -> Result<(), PerformaCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    // Check Performa version
    checks.push(DoctorCheck {
        name: "performa_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Performa version {}", PERFORMA_VERSION),
    });

    // Check the canonical feature schema
    checks.push(DoctorCheck {
        name: "feature_schema".to_string(),
        status: CheckStatus::Ok,
        message: format!("{} features: {}", FEATURE_NAMES.len(), FEATURE_NAMES.join(", ")),
    });

    // Check the model artifact
    if model.exists() {
        match RidgeModel::load(model) {
            Ok(loaded) => {
                checks.push(DoctorCheck {
                    name: "model".to_string(),
                    status: CheckStatus::Ok,
                    message: format!(
                        "Model artifact valid ({} at {})",
                        loaded.model_kind,
                        model.display()
                    ),
                });

                if loaded.alpha.is_none() && loaded.r_squared.is_none() {
                    checks.push(DoctorCheck {
                        name: "model_metadata".to_string(),
                        status: CheckStatus::Warning,
                        message: "Artifact carries no training metadata (alpha, r_squared)"
                            .to_string(),
                    });
                } else {
                    checks.push(DoctorCheck {
                        name: "model_metadata".to_string(),
                        status: CheckStatus::Ok,
                        message: format!(
                            "alpha {}, r_squared {}",
                            loaded
                                .alpha
                                .map(|a| a.to_string())
                                .unwrap_or_else(|| "n/a".to_string()),
                            loaded
                                .r_squared
                                .map(|r| r.to_string())
                                .unwrap_or_else(|| "n/a".to_string())
                        ),
                    });
                }
            }
            Err(e) => {
                checks.push(DoctorCheck {
                    name: "model".to_string(),
                    status: CheckStatus::Error,
                    message: e.to_string(),
                });
            }
        }
    } else {
        checks.push(DoctorCheck {
            name: "model".to_string(),
            status: CheckStatus::Error,
            message: format!(
                "Model artifact not found at {}; prediction is disabled",
                model.display()
            ),
        });
    }

    // Check stdin state (for batch mode)
    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (interactive mode)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (batch mode ready)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: PERFORMA_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Performa Doctor Report");
        println!("======================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(PerformaCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

fn cmd_schema(schema_type: SchemaType, json_schema: bool) -> Result<(), PerformaCliError> {
    match schema_type {
        SchemaType::Input => {
            if json_schema {
                println!("{}", get_input_json_schema());
            } else {
                println!("Input Schema: student_input.v1");
                println!();
                println!("One record per prediction request, five fields:");
                println!();
                println!("1. hours_studied - integer, 0-24 (default 5)");
                println!("2. previous_scores - integer, 0-100 (default 75)");
                println!("3. extracurricular - \"Yes\" or \"No\" (default \"Yes\")");
                println!("4. sleep_hours - integer, 0-24 (default 7)");
                println!("5. sample_papers - integer, 0-100 (default 2)");
                println!();
                println!("The model consumes the record under these trained column names:");
                for name in FEATURE_NAMES {
                    println!("  - {name}");
                }
            }
        }
        SchemaType::Output => {
            if json_schema {
                println!("{}", get_output_json_schema());
            } else {
                println!("Output Schema: assessment_report.v1");
                println!();
                println!("Each report contains:");
                println!();
                println!("- report_version: Schema version (1.0.0)");
                println!("- producer: {{ name, version, instance_id }}");
                println!("- provenance: {{ model_path, model_kind, computed_at_utc }}");
                println!("- input: Echo of the five raw inputs");
                println!("- prediction:");
                println!("  - performance_index: Raw predicted value");
                println!("  - formatted: Value formatted to two decimals");
                println!("  - category: sangat_baik | baik | perlu_peningkatan");
                println!("  - label: Display label for the category");
                println!();
                println!("Category bands: >= 80 Sangat Baik, 60-80 Baik, < 60 Perlu Peningkatan");
            }
        }
    }

    Ok(())
}

// Helper functions

fn format_output(
    reports: &[AssessmentReport],
    format: &OutputFormat,
) -> Result<String, PerformaCliError> {
    match format {
        OutputFormat::Ndjson => {
            let mut lines: Vec<String> = Vec::new();
            for report in reports {
                lines.push(serde_json::to_string(report)?);
            }
            Ok(lines.join("\n") + "\n")
        }
        OutputFormat::Json => Ok(serde_json::to_string(reports)?),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(reports)?),
    }
}

fn get_input_json_schema() -> String {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "student_input.v1",
        "description": "Performa student input record",
        "type": "object",
        "required": [
            "hours_studied",
            "previous_scores",
            "extracurricular",
            "sleep_hours",
            "sample_papers"
        ],
        "properties": {
            "hours_studied": { "type": "integer", "minimum": 0, "maximum": 24, "default": 5 },
            "previous_scores": { "type": "integer", "minimum": 0, "maximum": 100, "default": 75 },
            "extracurricular": { "type": "string", "enum": ["Yes", "No"], "default": "Yes" },
            "sleep_hours": { "type": "integer", "minimum": 0, "maximum": 24, "default": 7 },
            "sample_papers": { "type": "integer", "minimum": 0, "maximum": 100, "default": 2 }
        }
    })
    .to_string()
}

fn get_output_json_schema() -> String {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "assessment_report.v1",
        "description": "Performa assessment report",
        "type": "object",
        "required": ["report_version", "producer", "provenance", "input", "prediction"],
        "properties": {
            "report_version": { "type": "string" },
            "producer": {
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "version": { "type": "string" },
                    "instance_id": { "type": "string" }
                }
            },
            "provenance": {
                "type": "object",
                "properties": {
                    "model_path": { "type": "string" },
                    "model_kind": { "type": "string" },
                    "computed_at_utc": { "type": "string" }
                }
            },
            "input": { "type": "object" },
            "prediction": {
                "type": "object",
                "properties": {
                    "performance_index": { "type": "number" },
                    "formatted": { "type": "string" },
                    "category": {
                        "type": "string",
                        "enum": ["sangat_baik", "baik", "perlu_peningkatan"]
                    },
                    "label": { "type": "string" }
                }
            }
        }
    })
    .to_string()
}

// Error types

#[derive(Debug)]
enum PerformaCliError {
    Io(io::Error),
    Predict(PredictError),
    Json(serde_json::Error),
    NoRecords,
    ValidationFailed(usize),
    DoctorFailed,
}

impl From<io::Error> for PerformaCliError {
    fn from(e: io::Error) -> Self {
        PerformaCliError::Io(e)
    }
}

impl From<PredictError> for PerformaCliError {
    fn from(e: PredictError) -> Self {
        PerformaCliError::Predict(e)
    }
}

impl From<serde_json::Error> for PerformaCliError {
    fn from(e: serde_json::Error) -> Self {
        PerformaCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<PerformaCliError> for CliError {
    fn from(e: PerformaCliError) -> Self {
        match e {
            PerformaCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            PerformaCliError::Predict(e) => {
                let (code, hint) = match &e {
                    PredictError::ModelUnavailable { .. } => (
                        "MODEL_UNAVAILABLE",
                        "Ensure the model artifact exists at the given path",
                    ),
                    PredictError::PredictionFailure { .. } => (
                        "PREDICTION_FAILED",
                        "Check that feature names and order match the trained schema",
                    ),
                    PredictError::SchemaMismatch { .. } => (
                        "SCHEMA_MISMATCH",
                        "Regenerate the model artifact with the canonical feature names",
                    ),
                    PredictError::InvalidInput { .. } => (
                        "INVALID_INPUT",
                        "Values must stay within the form widget ranges",
                    ),
                    PredictError::JsonError(_) => ("JSON_ERROR", "Check JSON syntax"),
                };
                CliError {
                    code: code.to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
            PerformaCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            PerformaCliError::NoRecords => CliError {
                code: "NO_RECORDS".to_string(),
                message: "No records found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            PerformaCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} records failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
            PerformaCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_records: usize,
    valid_records: usize,
    invalid_records: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    index: usize,
    error: String,
}

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
