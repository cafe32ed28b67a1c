//! Core table types for representing one loaded CSV file

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A parsed table from a single CSV file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    /// Column definitions, in file order
    pub columns: Vec<Column>,
    /// Row data; every row has one cell per column
    pub rows: Vec<Row>,
    /// Source file path
    pub source_path: PathBuf,
}

impl Table {
    /// Create a new empty table
    pub fn new(source_path: PathBuf) -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            source_path,
        }
    }

    /// Get the number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Header names in column order
    pub fn header(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Replace every cell equal to `target` with `replacement`, returning the count
    ///
    /// Only text cells can match: a numeric cell was coerced at load time and
    /// never compares equal to a string.
    pub fn replace_text(&mut self, target: &str, replacement: &CellValue) -> usize {
        let mut replaced = 0;
        for row in &mut self.rows {
            for cell in &mut row.cells {
                if cell.is_text(target) {
                    *cell = replacement.clone();
                    replaced += 1;
                }
            }
        }
        replaced
    }
}

/// A column definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    /// Column name as written in the header row
    pub name: String,
    /// Column index (0-based)
    pub index: usize,
    /// Type inferred from the column's values
    pub kind: ColumnKind,
}

impl Column {
    /// Create a new column with no inferred type yet
    pub fn new(name: String, index: usize) -> Self {
        Self {
            name,
            index,
            kind: ColumnKind::Empty,
        }
    }
}

/// Inferred type of a whole column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Every non-empty value is an integer
    Integer,
    /// Every non-empty value is a number, at least one is not an integer
    Float,
    /// At least one value is not numeric
    Text,
    /// No values at all
    Empty,
}

impl ColumnKind {
    /// Infer the kind from raw field values
    ///
    /// A column is only numeric if every value survives the round trip
    /// through its number type: integers beyond i64 and non-finite floats
    /// (`1e400`, `inf`, `NaN`) keep the whole column as text.
    pub fn infer<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut kind = ColumnKind::Empty;
        for value in values {
            if value.is_empty() {
                continue;
            }
            kind = match (kind, classify(value.trim())) {
                (ColumnKind::Empty | ColumnKind::Integer, ColumnKind::Integer) => {
                    ColumnKind::Integer
                }
                (ColumnKind::Empty | ColumnKind::Integer | ColumnKind::Float, ColumnKind::Float)
                | (ColumnKind::Float, ColumnKind::Integer) => ColumnKind::Float,
                _ => return ColumnKind::Text,
            };
        }
        kind
    }
}

/// Kind of a single trimmed, non-empty value
fn classify(value: &str) -> ColumnKind {
    if value.parse::<i64>().is_ok() {
        return ColumnKind::Integer;
    }
    if is_integer_literal(value) {
        // out of i64 range; as f64 the digits would be rounded
        return ColumnKind::Text;
    }
    match value.parse::<f64>() {
        Ok(f) if f.is_finite() => ColumnKind::Float,
        _ => ColumnKind::Text,
    }
}

fn is_integer_literal(value: &str) -> bool {
    let digits = value.strip_prefix(['+', '-']).unwrap_or(value);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// A row of data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Row {
    /// Cell values for each column
    pub cells: Vec<CellValue>,
}

impl Row {
    /// Create a new row
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }
}

/// A cell value, typed by its column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    /// Integer value
    Integer(i64),
    /// Floating-point value
    Float(f64),
    /// String value, kept exactly as read
    String(String),
    /// Missing value
    Empty,
}

impl CellValue {
    /// Coerce a raw field according to its column's kind
    ///
    /// An empty field is always missing. Falls back to a string if the
    /// field does not fit the kind.
    pub fn coerce(raw: &str, kind: ColumnKind) -> Self {
        if raw.is_empty() {
            return CellValue::Empty;
        }

        match kind {
            ColumnKind::Integer => raw
                .trim()
                .parse::<i64>()
                .map(CellValue::Integer)
                .unwrap_or_else(|_| CellValue::String(raw.to_string())),
            ColumnKind::Float => raw
                .trim()
                .parse::<f64>()
                .map(CellValue::Float)
                .unwrap_or_else(|_| CellValue::String(raw.to_string())),
            ColumnKind::Text | ColumnKind::Empty => CellValue::String(raw.to_string()),
        }
    }

    /// Check if the cell is the given text
    pub fn is_text(&self, text: &str) -> bool {
        matches!(self, CellValue::String(s) if s == text)
    }

    /// Convert to the serialized field text
    pub fn to_string_value(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Float(fl) => write!(f, "{}", fl),
            CellValue::String(s) => write!(f, "{}", s),
            CellValue::Empty => Ok(()),
        }
    }
}
