//! Backend and browser services.
//!
//! # Services
//!
//! - [`upload`] - Workbook upload to the combogen backend
//! - [`download`] - Save generated CSV/JSON through a Blob URL

pub mod upload;
pub mod download;

pub use upload::*;
pub use download::*;
