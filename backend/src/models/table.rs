//! Generic in-memory table: ordered named columns plus ordered rows.
//!
//! Sheets are loaded into [`Table`]s before any domain logic runs, so the
//! validator can reason about column names without knowing anything about
//! prompts or models.

use serde::ser::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Whether two cells hold the same value for lookup purposes.
    ///
    /// Numbers compare numerically across `Int`/`Float`; text never equals
    /// a number and `Empty` never matches anything.
    pub fn matches(&self, other: &Cell) -> bool {
        match (self, other) {
            (Cell::Text(a), Cell::Text(b)) => a == b,
            (Cell::Bool(a), Cell::Bool(b)) => a == b,
            (Cell::Int(a), Cell::Int(b)) => a == b,
            (Cell::Int(a), Cell::Float(b)) | (Cell::Float(b), Cell::Int(a)) => (*a as f64) == *b,
            (Cell::Float(a), Cell::Float(b)) => a == b,
            _ => false,
        }
    }

    /// Integral floats that fit an `i64`, as an integer.
    fn integral(value: f64) -> Option<i64> {
        if value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15 {
            Some(value as i64)
        } else {
            None
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Int(i) => write!(f, "{}", i),
            Cell::Float(x) => match Cell::integral(*x) {
                Some(i) => write!(f, "{}", i),
                None => write!(f, "{}", x),
            },
            Cell::Bool(true) => f.write_str("True"),
            Cell::Bool(false) => f.write_str("False"),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Empty => serializer.serialize_none(),
            Cell::Text(s) => serializer.serialize_str(s),
            Cell::Int(i) => serializer.serialize_i64(*i),
            Cell::Float(x) => match Cell::integral(*x) {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*x),
            },
            Cell::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<i64> for Cell {
    fn from(i: i64) -> Self {
        Cell::Int(i)
    }
}

impl From<f64> for Cell {
    fn from(x: f64) -> Self {
        Cell::Float(x)
    }
}

/// Ordered list of named columns plus ordered list of rows.
///
/// Every row holds exactly `columns.len()` cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Build a table from explicit column names and rows.
    ///
    /// Rows are padded with [`Cell::Empty`] or truncated to the column count.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Empty);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Use the first raw row as the header.
    ///
    /// Blank header cells become `Unnamed: i`, repeated names get `.1`, `.2`...
    /// Fully blank data rows are dropped.
    pub fn from_rows_with_header(raw: Vec<Vec<Cell>>) -> Self {
        let mut iter = raw.into_iter();
        let Some(header) = iter.next() else {
            return Self::default();
        };

        let data: Vec<Vec<Cell>> = iter.filter(|row| !is_blank(row)).collect();
        let width = data.iter().map(Vec::len).max().unwrap_or(0).max(header.len());

        let mut seen: HashMap<String, usize> = HashMap::new();
        let columns = (0..width)
            .map(|i| {
                let base = match header.get(i) {
                    Some(cell) if !cell.is_empty() => cell.to_string(),
                    _ => format!("Unnamed: {}", i),
                };
                let count = seen.entry(base.clone()).or_insert(0);
                let name = if *count == 0 { base } else { format!("{}.{}", base, count) };
                *count += 1;
                name
            })
            .collect();

        Self::new(columns, data)
    }

    /// Positional column names `0`, `1`, ... with every raw row as data.
    pub fn from_rows_headerless(raw: Vec<Vec<Cell>>) -> Self {
        let data: Vec<Vec<Cell>> = raw.into_iter().filter(|row| !is_blank(row)).collect();
        let width = data.iter().map(Vec::len).max().unwrap_or(0);
        let columns = (0..width).map(|i| i.to_string()).collect();
        Self::new(columns, data)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether any cell of any row is missing.
    pub fn has_missing(&self) -> bool {
        self.rows.iter().any(|row| row.iter().any(Cell::is_empty))
    }

    /// First `n` rows rendered as strings.
    pub fn head(&self, n: usize) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .take(n)
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect()
    }
}

fn is_blank(row: &[Cell]) -> bool {
    row.iter().all(Cell::is_empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::from(s)
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::Empty.to_string(), "");
        assert_eq!(Cell::Int(42).to_string(), "42");
        assert_eq!(Cell::Float(4.0).to_string(), "4");
        assert_eq!(Cell::Float(0.7).to_string(), "0.7");
        assert_eq!(Cell::Bool(true).to_string(), "True");
        assert_eq!(text("gpt").to_string(), "gpt");
    }

    #[test]
    fn test_cell_json() {
        let cells = vec![Cell::Empty, text("a"), Cell::Int(3), Cell::Float(4.0), Cell::Float(1.5), Cell::Bool(false)];
        let json = serde_json::to_string(&cells).unwrap();
        assert_eq!(json, r#"[null,"a",3,4,1.5,false]"#);
    }

    #[test]
    fn test_cell_matches() {
        assert!(Cell::Int(1).matches(&Cell::Float(1.0)));
        assert!(text("p1").matches(&text("p1")));
        assert!(!text("1").matches(&Cell::Int(1)));
        assert!(!Cell::Empty.matches(&Cell::Empty));
    }

    #[test]
    fn test_header_naming() {
        let table = Table::from_rows_with_header(vec![
            vec![text("a"), Cell::Empty, text("a")],
            vec![Cell::Int(1), Cell::Int(2), Cell::Int(3)],
        ]);
        assert_eq!(table.columns, vec!["a", "Unnamed: 1", "a.1"]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_blank_rows_dropped_and_short_rows_padded() {
        let table = Table::from_rows_with_header(vec![
            vec![text("x"), text("y")],
            vec![Cell::Empty, Cell::Empty],
            vec![text("1")],
        ]);
        assert_eq!(table.rows, vec![vec![text("1"), Cell::Empty]]);
        assert!(table.has_missing());
    }

    #[test]
    fn test_headerless() {
        let table = Table::from_rows_headerless(vec![
            vec![text("temp"), text("0,1")],
            vec![text("top_p"), Cell::Float(0.9)],
        ]);
        assert_eq!(table.columns, vec!["0", "1"]);
        assert_eq!(table.len(), 2);
        assert!(!table.has_missing());
        assert_eq!(table.head(1), vec![vec!["temp".to_string(), "0,1".to_string()]]);
    }

    #[test]
    fn test_empty_input() {
        assert!(Table::from_rows_with_header(vec![]).is_empty());
        assert!(Table::from_rows_headerless(vec![]).columns.is_empty());
    }
}
