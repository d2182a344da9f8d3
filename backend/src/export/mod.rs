//! CSV and JSON encoders for the combination table.
//!
//! Both encoders use the same column order:
//! `prompt_id, model_name, model_version, <parameter names...>, filled_prompt`.
//! CSV cells are in string form; JSON keeps the native type of the
//! prompt id and model cells.
//!
//! Column names are written as they are. When a name repeats (see
//! [`CombinationTable::duplicate_columns`]) the CSV header repeats it and
//! each JSON record repeats the key, so decoders keep only the last value.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::ser::PrettyFormatter;

use crate::error::{ExportError, ExportResult};
use crate::models::{CombinationRow, CombinationTable};

pub const CSV_FILE_NAME: &str = "combinations.csv";
pub const CSV_MIME: &str = "text/csv";
pub const JSON_FILE_NAME: &str = "combinations.json";
pub const JSON_MIME: &str = "application/json";

/// Encode the table as UTF-8 CSV with a header row and no index column.
pub fn to_csv(table: &CombinationTable) -> ExportResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.columns())?;
    for row in &table.rows {
        writer.write_record(row.fields())?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::CsvBuffer(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Encode the table as a pretty-printed JSON array of objects.
pub fn to_json(table: &CombinationTable) -> ExportResult<String> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    Records::new(table).serialize(&mut serializer)?;
    Ok(String::from_utf8(buffer)?)
}

/// The table as a JSON value (same shape as [`to_json`]).
pub fn to_json_value(table: &CombinationTable) -> ExportResult<serde_json::Value> {
    Ok(serde_json::to_value(Records::new(table))?)
}

/// Serializes rows as objects keyed by the table's columns, in column order.
struct Records<'a> {
    columns: Vec<String>,
    rows: &'a [CombinationRow],
}

impl<'a> Records<'a> {
    fn new(table: &'a CombinationTable) -> Self {
        Self {
            columns: table.columns(),
            rows: &table.rows,
        }
    }
}

impl Serialize for Records<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in self.rows {
            seq.serialize_element(&Record {
                columns: &self.columns,
                row,
            })?;
        }
        seq.end()
    }
}

struct Record<'a> {
    columns: &'a [String],
    row: &'a CombinationRow,
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let cells = self.row.cells();
        let mut map = serializer.serialize_map(Some(cells.len()))?;
        for (column, cell) in self.columns.iter().zip(&cells) {
            map.serialize_entry(column, cell)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Cell;

    fn sample_table() -> CombinationTable {
        let row = |param: &str| CombinationRow {
            prompt_id: Cell::from("p1"),
            model_name: Cell::from("gpt"),
            model_version: Cell::Int(4),
            parameters: vec![param.to_string()],
            filled_prompt: "Hi, \"Alice\"".to_string(),
        };
        CombinationTable {
            parameter_names: vec!["temp".into()],
            rows: vec![row("0"), row("1")],
        }
    }

    #[test]
    fn test_csv_layout() {
        let csv = to_csv(&sample_table()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "prompt_id,model_name,model_version,temp,filled_prompt");
        assert_eq!(lines[1], r#"p1,gpt,4,0,"Hi, ""Alice""""#);
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_json_layout() {
        let json = to_json(&sample_table()).unwrap();
        assert!(json.starts_with("[\n    {\n        \"prompt_id\": \"p1\""));
        // field order follows the table schema
        let name = json.find("\"model_name\"").unwrap();
        let version = json.find("\"model_version\"").unwrap();
        let temp = json.find("\"temp\"").unwrap();
        let filled = json.find("\"filled_prompt\"").unwrap();
        assert!(name < version && version < temp && temp < filled);
        assert!(json.contains("\"model_version\": 4,"));
    }

    #[test]
    fn test_empty_table() {
        let table = CombinationTable {
            parameter_names: vec!["temp".into()],
            rows: vec![],
        };
        assert_eq!(to_json(&table).unwrap(), "[]");
        assert_eq!(to_csv(&table).unwrap(), "prompt_id,model_name,model_version,temp,filled_prompt\n");
    }

    #[test]
    fn test_csv_and_json_agree() {
        let table = sample_table();
        let csv = to_csv(&table).unwrap();
        let json: Vec<serde_json::Map<String, serde_json::Value>> =
            serde_json::from_str(&to_json(&table).unwrap()).unwrap();

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
        let csv_rows: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect();

        let json_rows: Vec<Vec<String>> = json
            .iter()
            .map(|obj| {
                headers
                    .iter()
                    .map(|h| match &obj[h] {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect()
            })
            .collect();

        assert_eq!(csv_rows, json_rows);
    }

    #[test]
    fn test_json_value_shape() {
        let value = to_json_value(&sample_table()).unwrap();
        assert_eq!(value[1]["temp"], "1");
        assert_eq!(value[0]["model_version"], 4);
    }

    #[test]
    fn test_repeated_column_names() {
        let table = CombinationTable {
            parameter_names: vec!["temp".into(), "temp".into()],
            rows: vec![CombinationRow {
                prompt_id: Cell::from("p1"),
                model_name: Cell::from("gpt"),
                model_version: Cell::Int(4),
                parameters: vec!["0".into(), "1".into()],
                filled_prompt: "Hi".into(),
            }],
        };

        let csv = to_csv(&table).unwrap();
        assert_eq!(
            csv,
            "prompt_id,model_name,model_version,temp,temp,filled_prompt\np1,gpt,4,0,1,Hi\n"
        );

        let json = to_json(&table).unwrap();
        assert_eq!(json.matches("\"temp\"").count(), 2);
        let decoded: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded[0]["temp"], "1");
        assert_eq!(decoded[0].as_object().unwrap().len(), 5);
    }
}
