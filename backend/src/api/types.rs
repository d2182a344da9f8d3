//! REST API types for frontend integration.
//!
//! One upload produces one [`UploadResponse`]: the validation outcome, the
//! sheet previews, a preview of the generated table and both download
//! payloads. Nothing is kept server-side between requests.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ExportResult, PipelineError};
use crate::export::{to_csv, to_json};
use crate::models::SheetPreview;
use crate::transform::pipeline::PipelineOutput;

pub const STATUS_READY: &str = "ready";
pub const STATUS_INVALID: &str = "invalid";
pub const STATUS_ERROR: &str = "error";

/// Rows of the generated table included in the response preview.
pub const RESULT_PREVIEW_ROWS: usize = 100;

/// Response sent to the frontend after an upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Unique job identifier
    pub job_id: String,

    /// "ready", "invalid" or "error"
    pub status: String,

    /// Structural error, or the validation messages joined by newline
    pub error: Option<String>,

    /// Itemised validation messages
    #[serde(default)]
    pub validation_errors: Vec<String>,

    /// First rows of each input sheet
    #[serde(default)]
    pub sheets: Vec<SheetPreview>,

    /// Generated table (absent unless status is "ready")
    pub result: Option<ResultPreview>,

    /// Download payloads (absent unless status is "ready")
    pub downloads: Option<Downloads>,
}

/// Preview of the generated table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPreview {
    pub columns: Vec<String>,
    pub row_count: usize,
    pub rows: Vec<Vec<String>>,
}

/// Encoded downloads
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Downloads {
    pub csv: String,
    pub json: String,
}

impl UploadResponse {
    /// Build a ready response, encoding both downloads.
    pub fn ready(job_id: &str, output: &PipelineOutput) -> ExportResult<Self> {
        let table = &output.combinations;
        Ok(Self {
            job_id: job_id.to_string(),
            status: STATUS_READY.to_string(),
            error: None,
            validation_errors: Vec::new(),
            sheets: output.previews.clone(),
            result: Some(ResultPreview {
                columns: table.columns(),
                row_count: table.len(),
                rows: table.head(RESULT_PREVIEW_ROWS),
            }),
            downloads: Some(Downloads {
                csv: to_csv(table)?,
                json: to_json(table)?,
            }),
        })
    }

    /// Build the response for a pipeline failure.
    pub fn failed(job_id: &str, err: &PipelineError) -> Self {
        let (status, validation_errors) = match err {
            PipelineError::Validation(v) => (STATUS_INVALID, v.messages.clone()),
            PipelineError::Workbook(_) | PipelineError::TooManyRows { .. } => (STATUS_ERROR, Vec::new()),
        };
        Self {
            job_id: job_id.to_string(),
            status: status.to_string(),
            validation_errors,
            ..error_response(&failure_message(err))
        }
    }
}

/// The user-facing message: the structural error, or the joined validation list.
fn failure_message(err: &PipelineError) -> String {
    match err {
        PipelineError::Validation(v) => v.to_string(),
        PipelineError::Workbook(w) => w.to_string(),
        PipelineError::TooManyRows { .. } => err.to_string(),
    }
}

/// Create an error response for request-level failures (bad multipart, etc.)
pub fn error_response(error: &str) -> UploadResponse {
    UploadResponse {
        job_id: Uuid::new_v4().to_string(),
        status: STATUS_ERROR.to_string(),
        error: Some(error.to_string()),
        validation_errors: Vec::new(),
        sheets: Vec::new(),
        result: None,
        downloads: None,
    }
}
