//! Combination generator.
//!
//! Output order is prompt → matched value row → model → parameter set:
//!
//! ```text
//! for prompt in prompts
//!   for value_row in values where value_row.prompt_id == prompt.prompt_id
//!     filled = fill_template(prompt.template, value_row)
//!     for model in models
//!       for set in parameter_space
//!         emit (prompt_id, model.name, model.version, set..., filled)
//! ```

use super::params::ParameterSpace;
use super::template::fill_template;
use crate::models::{CombinationRow, CombinationTable, Model, Prompt, ValueRow};
use crate::validation::ValidatedWorkbook;

/// Default row limit for a pipeline run.
pub const DEFAULT_MAX_ROWS: usize = 1_000_000;

/// Generate every combination of a validated workbook.
pub fn generate_combinations(workbook: &ValidatedWorkbook<'_>) -> CombinationTable {
    let space = ParameterSpace::new(workbook.parameters());
    generate(&workbook.prompts(), &workbook.value_rows(), &workbook.models(), &space)
}

/// Generate every combination from typed inputs.
pub fn generate(
    prompts: &[Prompt],
    value_rows: &[ValueRow],
    models: &[Model],
    space: &ParameterSpace,
) -> CombinationTable {
    let parameter_sets = space.combinations();
    let capacity = expected_row_count(prompts, value_rows, models, space).min(DEFAULT_MAX_ROWS);
    let mut rows = Vec::with_capacity(capacity);

    for prompt in prompts {
        for value_row in matching_rows(prompt, value_rows) {
            let filled = fill_template(&prompt.template, &value_row.fields);

            for model in models {
                for set in &parameter_sets {
                    rows.push(CombinationRow {
                        prompt_id: prompt.prompt_id.clone(),
                        model_name: model.name.clone(),
                        model_version: model.version.clone(),
                        parameters: set.clone(),
                        filled_prompt: filled.clone(),
                    });
                }
            }
        }
    }

    CombinationTable {
        parameter_names: space.names(),
        rows,
    }
}

/// Σ_p (m_p × M × Π n_i), saturating at `usize::MAX`.
pub fn expected_row_count(
    prompts: &[Prompt],
    value_rows: &[ValueRow],
    models: &[Model],
    space: &ParameterSpace,
) -> usize {
    let per_fill = models.len().saturating_mul(space.combination_count());
    prompts
        .iter()
        .map(|prompt| matching_rows(prompt, value_rows).count().saturating_mul(per_fill))
        .fold(0usize, usize::saturating_add)
}

fn matching_rows<'a>(prompt: &'a Prompt, value_rows: &'a [ValueRow]) -> impl Iterator<Item = &'a ValueRow> + 'a {
    value_rows.iter().filter(move |row| row.prompt_id.matches(&prompt.prompt_id))
}
