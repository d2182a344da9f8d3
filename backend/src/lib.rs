//! # Combogen - prompt combination generator
//!
//! Combogen reads a four-sheet workbook (prompts, substitution values, models,
//! parameters), validates it and expands it into every combination of
//! prompt × filled value row × model × parameter set.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Workbook   │────▶│  Validator  │────▶│  Generator  │────▶│  CSV / JSON │
//! │ (4 sheets)  │     │ (4 checks)  │     │ (P×V×M×Π)   │     │  encoders   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use combogen::{run_file, to_json, PipelineOptions};
//! use std::path::Path;
//!
//! let output = run_file(Path::new("prompts.xlsx"), &PipelineOptions::default()).unwrap();
//! println!("{}", to_json(&output.combinations).unwrap());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`models`] - Cells, tables and domain records
//! - [`parser`] - Workbook reading
//! - [`validation`] - Content checks
//! - [`transform`] - Template substitution, parameter space, generator, pipeline
//! - [`export`] - CSV and JSON encoders
//! - [`sample`] - Example workbook
//! - [`api`] - HTTP API server and log streaming

// Core modules
pub mod error;
pub mod models;

// Reading
pub mod parser;

// Validation
pub mod validation;

// Generation
pub mod transform;

// Output
pub mod export;
pub mod sample;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ExportError, PipelineError, SampleError, ServerError, ValidationError, WorkbookError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    Cell, CombinationRow, CombinationTable, Model, Parameter, Prompt, SheetPreview, Table, ValueRow, Workbook,
    REQUIRED_SHEETS,
};

// =============================================================================
// Re-exports - Reading and validation
// =============================================================================

pub use parser::{missing_sheets, read_workbook_bytes, read_workbook_file};

pub use validation::{is_valid, validate, validation_message, ValidatedWorkbook};

// =============================================================================
// Re-exports - Generation
// =============================================================================

pub use transform::{
    expected_row_count, fill_template, generate, generate_combinations, placeholders, run_bytes, run_file,
    run_workbook, ParameterSpace, PipelineOptions, PipelineOutput, DEFAULT_MAX_ROWS,
};

// =============================================================================
// Re-exports - Output
// =============================================================================

pub use export::{to_csv, to_json, to_json_value};
pub use sample::sample_workbook;

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{error_response, Downloads, ResultPreview, UploadResponse};

// Server
pub mod server {
    pub use crate::api::server::{router, start_server};
}
