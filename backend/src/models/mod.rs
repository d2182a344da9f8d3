//! Domain models for prompt workbooks and generated combinations.
//!
//! # Input
//!
//! A [`Workbook`] holds four [`Table`]s read from the `Prompts`, `Values`,
//! `Models` and `Parameters` sheets. Once validated, the typed views
//! [`Prompt`], [`ValueRow`], [`Model`] and [`Parameter`] are extracted from
//! those tables.
//!
//! # Output
//!
//! A [`CombinationTable`] is the flat result: one [`CombinationRow`] per
//! (prompt, value row, model, parameter set) tuple.

mod table;

pub use table::{Cell, Table};

use serde::{Deserialize, Serialize};

// =============================================================================
// Sheet and column names
// =============================================================================

pub const PROMPTS_SHEET: &str = "Prompts";
pub const VALUES_SHEET: &str = "Values";
pub const MODELS_SHEET: &str = "Models";
pub const PARAMETERS_SHEET: &str = "Parameters";

/// Sheets every workbook must contain, in reporting order.
pub const REQUIRED_SHEETS: [&str; 4] = [PROMPTS_SHEET, VALUES_SHEET, MODELS_SHEET, PARAMETERS_SHEET];

pub const PROMPT_ID_COLUMN: &str = "prompt_id";
pub const MODEL_NAME_COLUMN: &str = "Name";
pub const MODEL_VERSION_COLUMN: &str = "Version";

/// Fixed output columns around the parameter columns.
pub const OUTPUT_PROMPT_ID: &str = "prompt_id";
pub const OUTPUT_MODEL_NAME: &str = "model_name";
pub const OUTPUT_MODEL_VERSION: &str = "model_version";
pub const OUTPUT_FILLED_PROMPT: &str = "filled_prompt";

// =============================================================================
// Workbook
// =============================================================================

/// The four input sheets of one upload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workbook {
    /// Every sheet name found in the file, in file order.
    pub sheet_names: Vec<String>,
    pub prompts: Table,
    pub values: Table,
    pub models: Table,
    /// Read headerless: columns are `0` (name) and `1` (values).
    pub parameters: Table,
}

impl Workbook {
    /// Sheets paired with their display names, in [`REQUIRED_SHEETS`] order.
    pub fn sheets(&self) -> [(&'static str, &Table); 4] {
        [
            (PROMPTS_SHEET, &self.prompts),
            (VALUES_SHEET, &self.values),
            (MODELS_SHEET, &self.models),
            (PARAMETERS_SHEET, &self.parameters),
        ]
    }

    /// Preview of the first `rows` rows of every sheet.
    pub fn previews(&self, rows: usize) -> Vec<SheetPreview> {
        self.sheets()
            .into_iter()
            .map(|(name, table)| SheetPreview::of(name, table, rows))
            .collect()
    }
}

/// First rows of one input sheet, rendered as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetPreview {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
}

impl SheetPreview {
    pub fn of(name: &str, table: &Table, rows: usize) -> Self {
        Self {
            name: name.to_string(),
            columns: table.columns.clone(),
            rows: table.head(rows),
            total_rows: table.len(),
        }
    }
}

// =============================================================================
// Typed input records
// =============================================================================

/// A prompt template keyed by its id.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub prompt_id: Cell,
    /// Template text with `{{column}}` placeholders.
    pub template: String,
}

/// One set of substitution values for a prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueRow {
    pub prompt_id: Cell,
    /// (column name, string value) pairs in Values column order,
    /// `prompt_id` excluded.
    pub fields: Vec<(String, String)>,
}

/// A model identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub name: Cell,
    pub version: Cell,
}

/// A named parameter and its candidate values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub values: Vec<String>,
}

impl Parameter {
    /// Split a comma-delimited value list. No trimming is applied.
    pub fn parse(name: impl Into<String>, raw: &str) -> Self {
        Self {
            name: name.into(),
            values: raw.split(',').map(str::to_string).collect(),
        }
    }
}

// =============================================================================
// Output
// =============================================================================

/// One generated (prompt, value fill, model, parameter set) tuple.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinationRow {
    pub prompt_id: Cell,
    pub model_name: Cell,
    pub model_version: Cell,
    /// Parameter values in parameter declaration order.
    pub parameters: Vec<String>,
    pub filled_prompt: String,
}

impl CombinationRow {
    /// Cells in output column order.
    pub fn cells(&self) -> Vec<Cell> {
        let mut cells = Vec::with_capacity(self.parameters.len() + 4);
        cells.push(self.prompt_id.clone());
        cells.push(self.model_name.clone());
        cells.push(self.model_version.clone());
        cells.extend(self.parameters.iter().cloned().map(Cell::Text));
        cells.push(Cell::Text(self.filled_prompt.clone()));
        cells
    }

    /// String form of every cell in output column order.
    pub fn fields(&self) -> Vec<String> {
        self.cells().iter().map(ToString::to_string).collect()
    }
}

/// The flat result table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CombinationTable {
    pub parameter_names: Vec<String>,
    pub rows: Vec<CombinationRow>,
}

impl CombinationTable {
    /// `prompt_id, model_name, model_version, <parameter names...>, filled_prompt`
    pub fn columns(&self) -> Vec<String> {
        let mut columns = Vec::with_capacity(self.parameter_names.len() + 4);
        columns.push(OUTPUT_PROMPT_ID.to_string());
        columns.push(OUTPUT_MODEL_NAME.to_string());
        columns.push(OUTPUT_MODEL_VERSION.to_string());
        columns.extend(self.parameter_names.iter().cloned());
        columns.push(OUTPUT_FILLED_PROMPT.to_string());
        columns
    }

    /// Output column names that occur more than once, in first-repeat order.
    ///
    /// A parameter named like a fixed column, or two parameters sharing a
    /// name, produce these. JSON records keep only the last value per key.
    pub fn duplicate_columns(&self) -> Vec<String> {
        let columns = self.columns();
        let mut duplicates: Vec<String> = Vec::new();
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].contains(column) && !duplicates.contains(column) {
                duplicates.push(column.clone());
            }
        }
        duplicates
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First `n` rows rendered as strings.
    pub fn head(&self, n: usize) -> Vec<Vec<String>> {
        self.rows.iter().take(n).map(CombinationRow::fields).collect()
    }
}
