//! Content validation for prompt workbooks.
//!
//! All four checks run on every workbook; their messages are collected in
//! check order:
//!
//! 1. `Prompts` has a `prompt_id` column
//! 2. `Values` has a `prompt_id` column
//! 3. `Models` has `Name` and `Version` columns
//! 4. `Parameters` is non-empty with no missing cells
//!
//! A passing workbook comes back as a [`ValidatedWorkbook`], which is the
//! only input the generator accepts.
//!
//! # Example
//!
//! ```rust,ignore
//! use combogen::{read_workbook_file, validate};
//!
//! let workbook = read_workbook_file("prompts.xlsx")?;
//! match validate(&workbook) {
//!     Ok(valid) => println!("{} prompts ready", valid.prompts().len()),
//!     Err(err) => eprintln!("Validation Error:\n{}", err),
//! }
//! ```

use crate::error::ValidationError;
use crate::models::{
    Cell, Model, Parameter, Prompt, Table, ValueRow, Workbook, MODEL_NAME_COLUMN, MODEL_VERSION_COLUMN,
    PROMPT_ID_COLUMN,
};

pub const MSG_PROMPTS_ID: &str = "The Prompts sheet must have a 'prompt_id' column.";
pub const MSG_VALUES_ID: &str = "The Values sheet must have a 'prompt_id' column.";
pub const MSG_MODELS_COLUMNS: &str = "The Models sheet must have 'Name' and 'Version' columns.";
pub const MSG_PARAMETERS: &str = "Each parameter in the Parameters sheet must have a name and values.";

/// Run every check and collect the triggered messages.
pub fn check(workbook: &Workbook) -> Vec<String> {
    resolve(workbook).err().unwrap_or_default()
}

/// Joined validation messages, or `None` when the workbook is valid.
pub fn validation_message(workbook: &Workbook) -> Option<String> {
    let errors = check(workbook);
    if errors.is_empty() {
        None
    } else {
        Some(errors.join("\n"))
    }
}

/// Validate a workbook, resolving the column positions the generator needs.
pub fn validate(workbook: &Workbook) -> Result<ValidatedWorkbook<'_>, ValidationError> {
    let columns = resolve(workbook).map_err(ValidationError::new)?;
    Ok(ValidatedWorkbook {
        workbook,
        prompt_id: columns.prompt_id,
        value_prompt_id: columns.value_prompt_id,
        model_name: columns.model_name,
        model_version: columns.model_version,
    })
}

/// Quick check: does the workbook pass validation?
pub fn is_valid(workbook: &Workbook) -> bool {
    check(workbook).is_empty()
}

/// Column positions of a workbook that passed every check.
struct Columns {
    prompt_id: usize,
    value_prompt_id: usize,
    model_name: usize,
    model_version: usize,
}

/// Look up every required column, one message per failed check.
fn resolve(workbook: &Workbook) -> Result<Columns, Vec<String>> {
    let mut errors = Vec::new();

    let prompt_id = workbook.prompts.column_index(PROMPT_ID_COLUMN);
    if prompt_id.is_none() {
        errors.push(MSG_PROMPTS_ID.to_string());
    }
    let value_prompt_id = workbook.values.column_index(PROMPT_ID_COLUMN);
    if value_prompt_id.is_none() {
        errors.push(MSG_VALUES_ID.to_string());
    }
    let model_name = workbook.models.column_index(MODEL_NAME_COLUMN);
    let model_version = workbook.models.column_index(MODEL_VERSION_COLUMN);
    if model_name.is_none() || model_version.is_none() {
        errors.push(MSG_MODELS_COLUMNS.to_string());
    }
    if !parameters_complete(&workbook.parameters) {
        errors.push(MSG_PARAMETERS.to_string());
    }

    match (prompt_id, value_prompt_id, model_name, model_version) {
        (Some(prompt_id), Some(value_prompt_id), Some(model_name), Some(model_version)) if errors.is_empty() => {
            Ok(Columns {
                prompt_id,
                value_prompt_id,
                model_name,
                model_version,
            })
        }
        _ => Err(errors),
    }
}

/// Parameters need at least one row and both a name and a value cell in each.
fn parameters_complete(parameters: &Table) -> bool {
    !parameters.is_empty() && parameters.columns.len() >= 2 && !parameters.has_missing()
}

/// A workbook that passed validation, with resolved column positions.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedWorkbook<'a> {
    workbook: &'a Workbook,
    prompt_id: usize,
    value_prompt_id: usize,
    model_name: usize,
    model_version: usize,
}

impl<'a> ValidatedWorkbook<'a> {
    pub fn workbook(&self) -> &'a Workbook {
        self.workbook
    }

    /// Prompts in row order. The template is the second column.
    pub fn prompts(&self) -> Vec<Prompt> {
        self.workbook
            .prompts
            .rows
            .iter()
            .map(|row| Prompt {
                prompt_id: row[self.prompt_id].clone(),
                template: row.get(1).map(ToString::to_string).unwrap_or_default(),
            })
            .collect()
    }

    /// Values column names used as substitution fields: every column but `prompt_id`.
    pub fn value_fields(&self) -> Vec<String> {
        self.workbook
            .values
            .columns
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != self.value_prompt_id)
            .map(|(_, column)| column.clone())
            .collect()
    }

    /// Value rows in row order, with every non-`prompt_id` column as a field.
    pub fn value_rows(&self) -> Vec<ValueRow> {
        let values = &self.workbook.values;
        values
            .rows
            .iter()
            .map(|row| ValueRow {
                prompt_id: row[self.value_prompt_id].clone(),
                fields: values
                    .columns
                    .iter()
                    .zip(row)
                    .enumerate()
                    .filter(|(i, _)| *i != self.value_prompt_id)
                    .map(|(_, (column, cell))| (column.clone(), cell.to_string()))
                    .collect(),
            })
            .collect()
    }

    pub fn models(&self) -> Vec<Model> {
        self.workbook
            .models
            .rows
            .iter()
            .map(|row| Model {
                name: row[self.model_name].clone(),
                version: row[self.model_version].clone(),
            })
            .collect()
    }

    /// Parameters in row order: name from column 0, values from column 1.
    pub fn parameters(&self) -> Vec<Parameter> {
        self.workbook
            .parameters
            .rows
            .iter()
            .map(|row| {
                let name = row.first().map(ToString::to_string).unwrap_or_default();
                let raw = row.get(1).map(ToString::to_string).unwrap_or_default();
                Parameter::parse(name, &raw)
            })
            .collect()
    }

    /// Values rows whose prompt id has no matching prompt.
    pub fn orphan_value_rows(&self) -> Vec<Cell> {
        let prompt_ids: Vec<&Cell> = self
            .workbook
            .prompts
            .rows
            .iter()
            .map(|row| &row[self.prompt_id])
            .collect();

        self.workbook
            .values
            .rows
            .iter()
            .map(|row| &row[self.value_prompt_id])
            .filter(|id| !prompt_ids.iter().any(|p| p.matches(id)))
            .cloned()
            .collect()
    }
}
