//! High-level pipeline: read → validate → generate.
//!
//! # Example
//!
//! ```rust,ignore
//! use combogen::{run_file, to_csv, PipelineOptions};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let result = run_file(Path::new("prompts.xlsx"), &PipelineOptions::default())?;
//!     println!("Generated {} rows", result.combinations.len());
//!     std::fs::write("combinations.csv", to_csv(&result.combinations)?)?;
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::generator::{expected_row_count, generate, DEFAULT_MAX_ROWS};
use super::params::ParameterSpace;
use super::template::unresolved_placeholders;
use crate::api::logs::JobLog;
use crate::error::{PipelineError, PipelineResult};
use crate::models::{CombinationTable, SheetPreview, Workbook};
use crate::parser::{read_workbook_bytes, read_workbook_file};
use crate::validation::{validate, ValidatedWorkbook};

/// Options for the pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOptions {
    /// Rows of each input sheet included in previews
    pub preview_rows: usize,

    /// Largest combination table the run may build
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,

    /// Tags this run's log entries; `None` logs to stderr only
    #[serde(default)]
    pub job_id: Option<String>,
}

fn default_max_rows() -> usize {
    DEFAULT_MAX_ROWS
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            preview_rows: 5,
            max_rows: DEFAULT_MAX_ROWS,
            job_id: None,
        }
    }
}

impl PipelineOptions {
    /// Default options for the upload identified by `job_id`.
    pub fn for_job(job_id: impl Into<String>) -> Self {
        Self {
            job_id: Some(job_id.into()),
            ..Self::default()
        }
    }

    fn log(&self) -> JobLog {
        JobLog::new(self.job_id.clone())
    }
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub workbook: Workbook,
    pub combinations: CombinationTable,
    /// First rows of each input sheet
    pub previews: Vec<SheetPreview>,
}

/// Run the pipeline on a workbook file.
pub fn run_file(path: &Path, options: &PipelineOptions) -> PipelineResult<PipelineOutput> {
    let log = options.log();
    log.info(format!("📖 Reading workbook {}...", path.display()));
    let workbook = read_workbook_file(path).inspect_err(|e| log.error(e.to_string()))?;
    run_workbook(workbook, options)
}

/// Run the pipeline on uploaded bytes.
pub fn run_bytes(bytes: &[u8], options: &PipelineOptions) -> PipelineResult<PipelineOutput> {
    let log = options.log();
    log.info(format!("📖 Reading workbook ({} bytes)...", bytes.len()));
    let workbook = read_workbook_bytes(bytes).inspect_err(|e| log.error(e.to_string()))?;
    run_workbook(workbook, options)
}

/// Validate and expand an already-loaded workbook.
pub fn run_workbook(workbook: Workbook, options: &PipelineOptions) -> PipelineResult<PipelineOutput> {
    let log = options.log();
    log.success(format!("Found sheets: {}", workbook.sheet_names.join(", ")));
    for (name, table) in workbook.sheets() {
        log.info_indent(format!("{}: {} rows × {} columns", name, table.len(), table.columns.len()), 1);
    }

    log.info("✔️  Validating workbook...");
    let combinations = {
        let validated = validate(&workbook).map_err(|e| {
            for message in &e.messages {
                log.error(message.clone());
            }
            PipelineError::from(e)
        })?;
        log.success("Validation Passed!");

        report_diagnostics(&validated, &log);
        expand(&validated, options.max_rows, &log)?
    };

    let previews = workbook.previews(options.preview_rows);

    Ok(PipelineOutput {
        workbook,
        combinations,
        previews,
    })
}

fn expand(validated: &ValidatedWorkbook<'_>, max_rows: usize, log: &JobLog) -> PipelineResult<CombinationTable> {
    let prompts = validated.prompts();
    let value_rows = validated.value_rows();
    let models = validated.models();
    let space = ParameterSpace::new(validated.parameters());

    log.info("⚙️  Generating combinations...");
    log.info_indent(
        format!(
            "{} prompts, {} value rows, {} models, {} parameter sets",
            prompts.len(),
            value_rows.len(),
            models.len(),
            space.combination_count()
        ),
        1,
    );

    let expected = expected_row_count(&prompts, &value_rows, &models, &space);
    if expected > max_rows {
        let err = PipelineError::TooManyRows {
            rows: expected,
            limit: max_rows,
        };
        log.error(err.to_string());
        return Err(err);
    }
    log.info_indent(format!("Expecting {} rows", expected), 1);

    let table = generate(&prompts, &value_rows, &models, &space);
    let duplicates = table.duplicate_columns();
    if !duplicates.is_empty() {
        log.warning(format!(
            "Duplicate output columns: {} (JSON keeps the last value of each)",
            duplicates.join(", ")
        ));
    }
    log.success(format!("Generated {} rows", table.len()));
    Ok(table)
}

/// Warn about placeholders no Values column fills and Values rows with no prompt.
fn report_diagnostics(validated: &ValidatedWorkbook<'_>, log: &JobLog) {
    let value_rows = validated.value_rows();
    let fields = validated.value_fields();

    for prompt in validated.prompts() {
        let has_fill = value_rows.iter().any(|row| row.prompt_id.matches(&prompt.prompt_id));
        if !has_fill {
            log.warning(format!("Prompt '{}' has no rows in the Values sheet", prompt.prompt_id));
            continue;
        }
        let unresolved = unresolved_placeholders(&prompt.template, &fields);
        if !unresolved.is_empty() {
            let tokens: Vec<String> = unresolved.iter().map(|name| format!("{{{{{}}}}}", name)).collect();
            log.warning(format!("Prompt '{}' has placeholders with no Values column:", prompt.prompt_id));
            log.warning_indent(tokens.join(", "), 1);
        }
    }

    let orphans = validated.orphan_value_rows();
    if !orphans.is_empty() {
        let ids: Vec<String> = orphans.iter().map(ToString::to_string).collect();
        log.warning(format!("{} Values rows match no prompt: {}", orphans.len(), ids.join(", ")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::logs::{LogEntry, LOG_BROADCASTER};
    use crate::models::{Cell, Table};
    use tokio::sync::broadcast::{self, error::TryRecvError};

    fn drain(rx: &mut broadcast::Receiver<LogEntry>) -> Vec<LogEntry> {
        let mut entries = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(entry) => entries.push(entry),
                Err(TryRecvError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }
        entries
    }

    fn messages_for(entries: &[LogEntry], job: &str) -> Vec<String> {
        entries
            .iter()
            .filter(|e| e.belongs_to(job))
            .map(|e| e.message.clone())
            .collect()
    }

    fn text(s: &str) -> Cell {
        Cell::from(s)
    }

    fn table(columns: &[&str], rows: Vec<Vec<Cell>>) -> Table {
        Table::new(columns.iter().map(|c| c.to_string()).collect(), rows)
    }

    fn workbook() -> Workbook {
        Workbook {
            sheet_names: vec!["Prompts".into(), "Values".into(), "Models".into(), "Parameters".into()],
            prompts: table(&["prompt_id", "template"], vec![vec![text("p1"), text("Hi {{name}}")]]),
            values: table(&["prompt_id", "name"], vec![vec![text("p1"), text("Alice")]]),
            models: table(&["Name", "Version"], vec![vec![text("gpt"), Cell::Int(4)]]),
            parameters: table(&["0", "1"], vec![vec![text("temp"), text("0,1")]]),
        }
    }

    #[test]
    fn test_default_options() {
        assert_eq!(PipelineOptions::default().preview_rows, 5);
    }

    #[test]
    fn test_run_workbook() {
        let output = run_workbook(workbook(), &PipelineOptions::default()).unwrap();
        assert_eq!(output.combinations.len(), 2);
        assert_eq!(output.previews.len(), 4);
        assert_eq!(output.previews[0].rows[0], vec!["p1", "Hi {{name}}"]);
    }

    #[test]
    fn test_validation_failure_stops_generation() {
        let mut wb = workbook();
        wb.parameters = Table::default();
        let err = run_workbook(wb, &PipelineOptions::default()).unwrap_err();
        match err {
            PipelineError::Validation(v) => assert_eq!(v.messages.len(), 1),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_preview_rows_option() {
        let mut wb = workbook();
        for i in 0..10 {
            wb.values.rows.push(vec![text("p1"), text(&format!("n{}", i))]);
        }
        let output = run_workbook(wb, &PipelineOptions {
                preview_rows: 3,
                ..PipelineOptions::default()
            }).unwrap();
        assert_eq!(output.previews[1].rows.len(), 3);
        assert_eq!(output.previews[1].total_rows, 11);
        assert_eq!(output.combinations.len(), 22);
    }

    #[test]
    fn test_job_logs_reach_only_their_subscriber() {
        let mut rx = LOG_BROADCASTER.subscribe();
        let mut wb = workbook();
        wb.prompts.rows[0][0] = text("secret-client-prompt");
        wb.values.rows.clear();

        run_workbook(wb, &PipelineOptions::for_job("job-a")).unwrap();

        let entries = drain(&mut rx);
        let own = messages_for(&entries, "job-a");
        assert!(own.contains(&"Prompt 'secret-client-prompt' has no rows in the Values sheet".to_string()));
        assert!(messages_for(&entries, "job-b").is_empty());
        assert!(entries
            .iter()
            .filter(|e| e.message.contains("secret-client-prompt"))
            .all(|e| e.belongs_to("job-a")));
    }

    #[test]
    fn test_untagged_run_broadcasts_nothing() {
        let mut rx = LOG_BROADCASTER.subscribe();
        let mut wb = workbook();
        wb.prompts.rows[0][0] = text("cli-only-prompt");
        wb.values.rows.clear();

        run_workbook(wb, &PipelineOptions::default()).unwrap();

        assert!(!drain(&mut rx).iter().any(|e| e.message.contains("cli-only-prompt")));
    }

    #[test]
    fn test_prompt_id_placeholder_is_reported() {
        let mut rx = LOG_BROADCASTER.subscribe();
        let mut wb = workbook();
        wb.prompts.rows[0][1] = text("{{prompt_id}}: Hi {{name}}");

        let output = run_workbook(wb, &PipelineOptions::for_job("job-placeholders")).unwrap();
        assert_eq!(output.combinations.rows[0].filled_prompt, "{{prompt_id}}: Hi Alice");

        let messages = messages_for(&drain(&mut rx), "job-placeholders");
        assert!(messages.contains(&"Prompt 'p1' has placeholders with no Values column:".to_string()));
        assert!(messages.contains(&"{{prompt_id}}".to_string()));
    }

    #[test]
    fn test_oversized_parameter_space_is_rejected() {
        let mut wb = workbook();
        wb.parameters = table(
            &["0", "1"],
            (0..20)
                .map(|i| vec![text(&format!("p{}", i)), text("0,1,2,3,4,5,6,7,8,9")])
                .collect(),
        );

        match run_workbook(wb, &PipelineOptions::default()) {
            Err(PipelineError::TooManyRows { rows, limit }) => {
                assert_eq!(rows, usize::MAX);
                assert_eq!(limit, DEFAULT_MAX_ROWS);
            }
            other => panic!("expected row limit error, got {:?}", other.map(|o| o.combinations.len())),
        }
    }

    #[test]
    fn test_row_limit_option() {
        let options = PipelineOptions {
            max_rows: 1,
            ..PipelineOptions::default()
        };
        let err = run_workbook(workbook(), &options).unwrap_err();
        assert_eq!(err.to_string(), "Too many combinations: 2 rows exceeds the limit of 1");

        let options = PipelineOptions {
            max_rows: 2,
            ..PipelineOptions::default()
        };
        assert_eq!(run_workbook(workbook(), &options).unwrap().combinations.len(), 2);
    }

    #[test]
    fn test_duplicate_parameter_names_are_reported() {
        let mut rx = LOG_BROADCASTER.subscribe();
        let mut wb = workbook();
        wb.parameters.rows.push(vec![text("temp"), text("5")]);

        let output = run_workbook(wb, &PipelineOptions::for_job("job-duplicates")).unwrap();
        assert_eq!(output.combinations.parameter_names, vec!["temp", "temp"]);

        let messages = messages_for(&drain(&mut rx), "job-duplicates");
        assert!(messages.iter().any(|m| m.starts_with("Duplicate output columns: temp")));
    }
}
