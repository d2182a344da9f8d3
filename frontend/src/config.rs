//! Application configuration.
//!
//! Centralized configuration for the Combogen frontend.

/// Backend API base URL.
pub const BACKEND_URL: &str = "http://localhost:3000";

/// Application name, used as the page title.
pub const APP_NAME: &str = "Spreadsheet Validator and Combination Generator";

/// Maximum file size for upload (in bytes).
///
/// 50 MB limit, same as the backend body limit.
pub const MAX_FILE_SIZE: f64 = 50.0 * 1024.0 * 1024.0;

/// Maximum logs to keep in memory.
pub const MAX_LOG_ENTRIES: usize = 100;

/// Accepted upload extensions.
pub const ACCEPTED_EXTENSIONS: &str = ".xls,.xlsx";

/// Download names and MIME types.
pub const CSV_FILE_NAME: &str = "combinations.csv";
pub const CSV_MIME: &str = "text/csv";
pub const JSON_FILE_NAME: &str = "combinations.json";
pub const JSON_MIME: &str = "application/json";
pub const SAMPLE_FILE_NAME: &str = "example.xlsx";

/// Sample workbook endpoint.
pub fn sample_url() -> String {
    format!("{}/api/sample", BACKEND_URL)
}
