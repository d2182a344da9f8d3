//! Spreadsheet reader for prompt workbooks.
//!
//! Opens `.xlsx`/`.xlsm`/`.xlsb`/`.xls`/`.ods` data with calamine, checks
//! that the four required sheets exist and loads each one into a [`Table`].
//! `Prompts`, `Values` and `Models` use their first row as the header;
//! `Parameters` is read headerless.

use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Reader, Sheets};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use crate::error::{WorkbookError, WorkbookResult};
use crate::models::{
    Cell, Table, Workbook, MODELS_SHEET, PARAMETERS_SHEET, PROMPTS_SHEET, REQUIRED_SHEETS, VALUES_SHEET,
};

/// Read a workbook from disk.
///
/// # Example
/// ```ignore
/// let workbook = read_workbook_file("prompts.xlsx")?;
/// println!("{} prompts", workbook.prompts.len());
/// ```
pub fn read_workbook_file<P: AsRef<Path>>(path: P) -> WorkbookResult<Workbook> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(WorkbookError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        )));
    }
    let mut sheets = open_workbook_auto(path)?;
    read_sheets(&mut sheets)
}

/// Read a workbook from uploaded bytes.
pub fn read_workbook_bytes(bytes: &[u8]) -> WorkbookResult<Workbook> {
    if bytes.is_empty() {
        return Err(WorkbookError::Unreadable("file is empty".to_string()));
    }
    let mut sheets = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    read_sheets(&mut sheets)
}

/// Names of required sheets absent from `sheet_names`, in required order.
pub fn missing_sheets(sheet_names: &[String]) -> Vec<String> {
    REQUIRED_SHEETS
        .iter()
        .filter(|required| !sheet_names.iter().any(|name| name == *required))
        .map(|s| s.to_string())
        .collect()
}

fn read_sheets<RS: Read + Seek>(sheets: &mut Sheets<RS>) -> WorkbookResult<Workbook> {
    let sheet_names = sheets.sheet_names();

    let missing = missing_sheets(&sheet_names);
    if !missing.is_empty() {
        return Err(WorkbookError::MissingSheets(missing));
    }

    let prompts = Table::from_rows_with_header(raw_rows(sheets, PROMPTS_SHEET)?);
    let values = Table::from_rows_with_header(raw_rows(sheets, VALUES_SHEET)?);
    let models = Table::from_rows_with_header(raw_rows(sheets, MODELS_SHEET)?);
    let parameters = Table::from_rows_headerless(raw_rows(sheets, PARAMETERS_SHEET)?);

    Ok(Workbook {
        sheet_names,
        prompts,
        values,
        models,
        parameters,
    })
}

fn raw_rows<RS: Read + Seek>(sheets: &mut Sheets<RS>, name: &str) -> WorkbookResult<Vec<Vec<Cell>>> {
    let range = sheets.worksheet_range(name).map_err(|e| WorkbookError::Sheet {
        sheet: name.to_string(),
        message: e.to_string(),
    })?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(convert_cell).collect())
        .collect())
}

/// Map a calamine cell to a [`Cell`].
///
/// Empty strings and error cells (`#N/A`, `#DIV/0!`...) count as missing.
pub fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) if s.is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(x) => Cell::Float(*x),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => Cell::Text(naive.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => Cell::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_sheets_in_required_order() {
        let names = vec!["Models".to_string(), "Prompts".to_string()];
        assert_eq!(missing_sheets(&names), vec!["Values", "Parameters"]);
    }

    #[test]
    fn test_sheet_names_are_case_sensitive() {
        let names: Vec<String> = ["prompts", "Values", "Models", "Parameters"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(missing_sheets(&names), vec!["Prompts"]);
    }

    #[test]
    fn test_convert_cell() {
        assert_eq!(convert_cell(&Data::String("gpt".into())), Cell::Text("gpt".into()));
        assert_eq!(convert_cell(&Data::String(String::new())), Cell::Empty);
        assert_eq!(convert_cell(&Data::Float(0.5)), Cell::Float(0.5));
        assert_eq!(convert_cell(&Data::Int(7)), Cell::Int(7));
        assert_eq!(convert_cell(&Data::Bool(true)), Cell::Bool(true));
        assert_eq!(convert_cell(&Data::Empty), Cell::Empty);
    }

    #[test]
    fn test_empty_bytes_rejected() {
        let err = read_workbook_bytes(&[]).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let result = read_workbook_bytes(b"prompt_id,template\np1,Hi");
        assert!(matches!(result, Err(WorkbookError::Unreadable(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = read_workbook_file("/definitely/not/here.xlsx");
        assert!(matches!(result, Err(WorkbookError::Io(_))));
    }
}
