//! Combination generation.
//!
//! - Template: `{{column}}` placeholder substitution
//! - Params: Cartesian product of parameter values
//! - Generator: prompt × value row × model × parameter set expansion
//! - Pipeline: read → validate → generate

pub mod generator;
pub mod params;
pub mod pipeline;
pub mod template;

pub use generator::{expected_row_count, generate, generate_combinations, DEFAULT_MAX_ROWS};
pub use params::ParameterSpace;
pub use pipeline::*;
pub use template::{fill_template, placeholder, placeholders, unresolved_placeholders};
