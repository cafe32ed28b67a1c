//! CSV serialization for writing tables back to disk

use crate::encoding::TextEncoding;
use crate::error::{Error, Result};
use crate::table::Table;
use std::fs;
use std::path::Path;

/// Serialize a table to CSV text
///
/// Quotes only fields that need it and ends every record with `\n`.
/// Missing values become empty fields.
pub fn to_csv_string(table: &Table) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    let csv_err = |e: csv::Error| Error::Csv {
        path: table.source_path.clone(),
        source: e,
    };

    writer.write_record(table.header()).map_err(csv_err)?;
    for row in &table.rows {
        writer
            .write_record(row.cells.iter().map(|c| c.to_string_value()))
            .map_err(csv_err)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))?;

    // The writer only ever sees &str fields
    String::from_utf8(bytes).map_err(|e| Error::CsvParse {
        path: table.source_path.clone(),
        message: e.to_string(),
    })
}

/// Write a table to `path` in `encoding`, replacing any existing content
pub fn write_csv<P: AsRef<Path>>(table: &Table, path: P, encoding: TextEncoding) -> Result<()> {
    let path = path.as_ref();
    let text = to_csv_string(table)?;
    let bytes = encoding.encode(&text, path)?;

    fs::write(path, bytes).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
