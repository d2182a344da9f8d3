//! UI Components for the Combogen application.
//!
//! # Layout Components
//! - [`Header`] - Title bar with the sample workbook link
//! - [`Hero`] - Main title and description
//! - [`Footer`] - Page footer
//!
//! # Feature Components
//! - [`UploadSection`] - Workbook selection and upload
//! - [`ValidationBanner`] - Validation outcome
//! - [`SheetPreviews`] - First rows of each uploaded sheet
//! - [`ResultsSection`] - Generated table and downloads
//! - [`DataTable`] - Shared table rendering
//! - [`LogsPanel`] - Real-time processing logs (SSE)

mod header;
mod hero;
mod upload;
mod validation;
mod data_table;
mod sheets;
mod results;
mod footer;
mod logs;

pub use header::*;
pub use hero::*;
pub use upload::*;
pub use validation::*;
pub use data_table::*;
pub use sheets::*;
pub use results::*;
pub use footer::*;
pub use logs::*;
