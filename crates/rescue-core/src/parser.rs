//! CSV parser for loading files into tables

use crate::encoding::TextEncoding;
use crate::error::{Error, Result};
use crate::table::{CellValue, Column, ColumnKind, Row, Table};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Parse a CSV file into a Table, decoding it with `encoding`
pub fn parse_csv<P: AsRef<Path>>(path: P, encoding: TextEncoding) -> Result<Table> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let content = encoding.decode(&bytes, path)?;
    parse_content(&content, path.to_path_buf())
}

/// Parse CSV from a string (useful for testing)
pub fn parse_csv_str(content: &str, source_name: &str) -> Result<Table> {
    parse_content(content, PathBuf::from(source_name))
}

fn parse_content(content: &str, path: PathBuf) -> Result<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // Short rows are padded below, long rows rejected
        .from_reader(content.as_bytes());

    let headers = csv_reader
        .headers()
        .map_err(|e| Error::Csv {
            path: path.clone(),
            source: e,
        })?
        .clone();

    if headers.is_empty() {
        return Err(Error::CsvParse {
            path,
            message: "no columns found in CSV".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for name in headers.iter() {
        if !seen.insert(name) {
            return Err(Error::CsvParse {
                path,
                message: format!("duplicate column name '{}'", name),
            });
        }
    }

    // Raw fields first; types are inferred per column once every row is in
    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for result in csv_reader.records() {
        let record = result.map_err(|e| Error::Csv {
            path: path.clone(),
            source: e,
        })?;

        if record.len() > headers.len() {
            return Err(Error::CsvParse {
                path,
                message: format!(
                    "record at line {} has {} fields, expected {}",
                    record.position().map_or(0, |p| p.line()),
                    record.len(),
                    headers.len()
                ),
            });
        }

        let mut fields: Vec<String> = record.iter().map(str::to_string).collect();
        fields.resize(headers.len(), String::new());
        raw_rows.push(fields);
    }

    let columns: Vec<Column> = headers
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let mut column = Column::new(name.to_string(), i);
            column.kind = ColumnKind::infer(raw_rows.iter().map(|r| r[i].as_str()));
            column
        })
        .collect();

    let rows = raw_rows
        .into_iter()
        .map(|fields| {
            let cells = fields
                .iter()
                .zip(&columns)
                .map(|(raw, col)| CellValue::coerce(raw, col.kind))
                .collect();
            Row::new(cells)
        })
        .collect();

    tracing::debug!(
        path = %path.display(),
        columns = columns.len(),
        "parsed CSV"
    );

    Ok(Table {
        columns,
        rows,
        source_path: path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_simple_csv() {
        let csv = "ID,Name,Value\n1,foo,100\n2,bar,200\n";
        let table = parse_csv_str(csv, "test.csv").unwrap();

        assert_eq!(table.columns.len(), 3);
        assert_eq!(table.columns[0].name, "ID");
        assert_eq!(table.columns[1].name, "Name");
        assert_eq!(table.columns[2].name, "Value");
        assert_eq!(table.columns[0].kind, ColumnKind::Integer);
        assert_eq!(table.columns[1].kind, ColumnKind::Text);

        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].cells[0], CellValue::Integer(1));
        assert_eq!(table.rows[1].cells[2], CellValue::Integer(200));
    }

    #[test]
    fn test_parse_with_empty_cells() {
        let csv = "ID,Name,Value\n1,,100\n2,bar,\n";
        let table = parse_csv_str(csv, "test.csv").unwrap();

        assert_eq!(table.rows[0].cells[1], CellValue::Empty);
        assert_eq!(table.rows[1].cells[2], CellValue::Empty);
    }

    #[test]
    fn test_parse_with_floats() {
        let csv = "ID,Value\n1,3.5\n2,-2\n";
        let table = parse_csv_str(csv, "test.csv").unwrap();

        assert_eq!(table.columns[1].kind, ColumnKind::Float);
        assert_eq!(table.rows[0].cells[1], CellValue::Float(3.5));
        assert_eq!(table.rows[1].cells[1], CellValue::Float(-2.0));
    }

    #[test]
    fn test_parse_mixed_column_is_text() {
        let csv = "id,score\n1,10\n2,BURNOUT\n3,007\n";
        let table = parse_csv_str(csv, "test.csv").unwrap();

        assert_eq!(table.columns[1].kind, ColumnKind::Text);
        assert_eq!(table.rows[0].cells[1], CellValue::String("10".to_string()));
        assert_eq!(table.rows[2].cells[1], CellValue::String("007".to_string()));
    }

    #[test]
    fn test_parse_quoted_fields() {
        let csv = "id,note\n1,\"hello, world\"\n2,\"say \"\"hi\"\"\"\n";
        let table = parse_csv_str(csv, "test.csv").unwrap();

        assert_eq!(
            table.rows[0].cells[1],
            CellValue::String("hello, world".to_string())
        );
        assert_eq!(
            table.rows[1].cells[1],
            CellValue::String("say \"hi\"".to_string())
        );
    }

    #[test]
    fn test_parse_pads_short_rows() {
        let csv = "a,b,c\n1,2\n";
        let table = parse_csv_str(csv, "test.csv").unwrap();

        assert_eq!(table.rows[0].cells.len(), 3);
        assert_eq!(table.rows[0].cells[2], CellValue::Empty);
    }

    #[test]
    fn test_parse_rejects_long_rows() {
        let csv = "a,b\n1,2,3\n";
        let result = parse_csv_str(csv, "test.csv");
        assert!(matches!(result, Err(Error::CsvParse { .. })));
    }

    #[test]
    fn test_long_row_reports_its_starting_line() {
        let csv = "a,b\n1,\"multi\nline\"\n1,2,3\n";
        let err = parse_csv_str(csv, "test.csv").unwrap_err();
        assert!(
            err.to_string().contains("record at line 4 has 3 fields"),
            "{}",
            err
        );
    }

    #[test]
    fn test_parse_rejects_duplicate_columns() {
        let csv = "a,a\n1,2\n";
        let result = parse_csv_str(csv, "test.csv");
        assert!(matches!(result, Err(Error::CsvParse { .. })));
    }

    #[test]
    fn test_parse_empty_input() {
        let result = parse_csv_str("", "test.csv");
        assert!(matches!(result, Err(Error::CsvParse { .. })));
    }

    #[test]
    fn test_parse_header_only() {
        let table = parse_csv_str("id,status\n", "test.csv").unwrap();
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.columns[0].kind, ColumnKind::Empty);
    }

    #[test]
    fn test_parse_file_with_bom() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"\xEF\xBB\xBFid,status\n1,OK\n").unwrap();

        let table = parse_csv(file.path(), TextEncoding::UTF_8).unwrap();
        assert_eq!(table.columns[0].name, "id");
        assert_eq!(table.source_path, file.path());
    }

    #[test]
    fn test_parse_file_bad_encoding() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"id,status\n1,\xC3\x28\n").unwrap();

        let result = parse_csv(file.path(), TextEncoding::UTF_8);
        assert!(matches!(result, Err(Error::Decode { .. })));
    }

    #[test]
    fn test_parse_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = parse_csv(dir.path().join("nope.csv"), TextEncoding::UTF_8);
        assert!(matches!(result, Err(Error::FileRead { .. })));
    }
}
