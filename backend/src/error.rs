//! Error types for the combination pipeline.
//!
//! Two classes of failure stop a run:
//!
//! - [`WorkbookError`] - structural problems (unreadable file, missing sheets)
//! - [`ValidationError`] - content problems found by the validator
//!
//! Both convert into [`PipelineError`] via `From`, so `?` works across the
//! reader, validator and pipeline layers. Encoding the final table can fail
//! with [`ExportError`], building the sample workbook with [`SampleError`].

use thiserror::Error;

use crate::models::REQUIRED_SHEETS;

// =============================================================================
// Workbook Errors (structural)
// =============================================================================

/// Errors raised while opening a workbook and locating its sheets.
#[derive(Debug, Error)]
pub enum WorkbookError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// The spreadsheet library could not open or decode the data.
    #[error("Unreadable spreadsheet: {0}")]
    Unreadable(String),

    /// One or more of the four required sheets is absent.
    #[error(
        "Missing one or more required sheets: {} (missing: {})",
        REQUIRED_SHEETS.join(", "),
        .0.join(", ")
    )]
    MissingSheets(Vec<String>),

    /// A sheet was listed but its cells could not be read.
    #[error("Failed to read sheet '{sheet}': {message}")]
    Sheet { sheet: String, message: String },
}

impl From<calamine::Error> for WorkbookError {
    fn from(err: calamine::Error) -> Self {
        WorkbookError::Unreadable(err.to_string())
    }
}

// =============================================================================
// Validation Errors (content)
// =============================================================================

/// Itemised content problems, in check order.
///
/// Displays as the messages joined by newline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .messages.join("\n"))]
pub struct ValidationError {
    pub messages: Vec<String>,
}

impl ValidationError {
    pub fn new(messages: Vec<String>) -> Self {
        Self { messages }
    }
}

// =============================================================================
// Export Errors
// =============================================================================

/// Errors while encoding the combination table.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV writer failure.
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    /// The CSV writer could not hand back its buffer.
    #[error("CSV export failed: {0}")]
    CsvBuffer(String),

    /// JSON serialization failure.
    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Encoded output was not valid UTF-8.
    #[error("Export produced invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

// =============================================================================
// Sample Workbook Errors
// =============================================================================

/// Errors while building the example spreadsheet.
#[derive(Debug, Error)]
pub enum SampleError {
    #[error("Failed to build sample workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// This is the error returned by [`crate::transform::pipeline::run_file`]
/// and friends. Either variant means no combinations were produced.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Structural error: the workbook could not be used at all.
    #[error("{0}")]
    Workbook(#[from] WorkbookError),

    /// Content validation error.
    #[error("Validation Error:\n{0}")]
    Validation(#[from] ValidationError),

    /// The workbook expands to more rows than the run allows.
    /// `rows` saturates at `usize::MAX`.
    #[error("Too many combinations: {rows} rows exceeds the limit of {limit}")]
    TooManyRows { rows: usize, limit: usize },
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Pipeline error for one upload.
    #[error("Pipeline error: {source}")]
    Pipeline { job_id: String, source: PipelineError },

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for workbook reading.
pub type WorkbookResult<T> = Result<T, WorkbookError>;

/// Result type for export encoders.
pub type ExportResult<T> = Result<T, ExportError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
