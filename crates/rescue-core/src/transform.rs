//! Sentinel replacement for a single CSV file

use crate::encoding::TextEncoding;
use crate::error::Result;
use crate::parser::parse_csv;
use crate::table::CellValue;
use crate::writer::write_csv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Token that stands in for missing data in rescued files
pub const DEFAULT_SENTINEL: &str = "BURNOUT";

/// Maps one literal value to a replacement
#[derive(Debug, Clone, PartialEq)]
pub struct ReplacementRule {
    /// Text a cell must equal exactly to be replaced
    pub match_value: String,
    /// Value written in its place
    pub replacement: CellValue,
}

impl ReplacementRule {
    /// Replace `match_value` with the missing-value marker
    pub fn to_missing(match_value: impl Into<String>) -> Self {
        Self {
            match_value: match_value.into(),
            replacement: CellValue::Empty,
        }
    }

    /// Replace `match_value` with fixed text; `None` means the missing-value marker
    pub fn new(match_value: impl Into<String>, replacement: Option<String>) -> Self {
        Self {
            match_value: match_value.into(),
            replacement: replacement.map_or(CellValue::Empty, CellValue::String),
        }
    }
}

impl Default for ReplacementRule {
    fn default() -> Self {
        Self::to_missing(DEFAULT_SENTINEL)
    }
}

/// What a transform did to one file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformOutcome {
    /// File that was read
    pub source: PathBuf,
    /// File that was written
    pub output: PathBuf,
    /// Number of data rows
    pub rows: usize,
    /// Number of columns
    pub columns: usize,
    /// Number of cells replaced
    pub replacements: usize,
    /// Whether the output file was (re)written
    pub written: bool,
}

/// Load `path`, apply `rule` to every cell, and write the result to `output_path`
///
/// `output_path` may be `path` itself. An in-place transform that replaces
/// nothing leaves the file untouched, so a second pass never reformats it.
pub fn transform_file<P, Q>(
    path: P,
    rule: &ReplacementRule,
    output_path: Q,
    encoding: TextEncoding,
) -> Result<TransformOutcome>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let path = path.as_ref();
    let output_path = output_path.as_ref();

    let mut table = parse_csv(path, encoding)?;
    let replacements = table.replace_text(&rule.match_value, &rule.replacement);

    let written = replacements > 0 || output_path != path;
    if written {
        write_csv(&table, output_path, encoding)?;
    }

    Ok(TransformOutcome {
        source: path.to_path_buf(),
        output: output_path.to_path_buf(),
        rows: table.row_count(),
        columns: table.column_count(),
        replacements,
        written,
    })
}

/// Transform a file and write it back to the same path
pub fn transform_in_place<P: AsRef<Path>>(
    path: P,
    rule: &ReplacementRule,
    encoding: TextEncoding,
) -> Result<TransformOutcome> {
    let path = path.as_ref();
    transform_file(path, rule, path, encoding)
}
