//! Reads a delimited export into memory with columns addressable by name.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::error::{PipelineError, Result};

/// The whole input held in memory: header names plus raw text rows.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<StringRecord>,
}

impl RawTable {
    /// Position of the column called `name`, ignoring surrounding whitespace
    /// in the header cell.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        let wanted = name.trim();
        self.headers
            .iter()
            .position(|h| h.trim() == wanted)
            .ok_or_else(|| PipelineError::MissingColumn(name.to_string()))
    }

    /// Cell text at (`row`, `col`), `None` if the row is shorter than the header.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Opens `path` and loads it as CSV with a header row.
pub fn load_path(path: &Path) -> Result<RawTable> {
    let file = File::open(path).map_err(|e| PipelineError::io(path, e))?;
    let table = load_reader(file)?;
    debug!(path = %path.display(), rows = table.len(), "Loaded input table");
    Ok(table)
}

/// Loads CSV with a header row from any reader.
///
/// Rows may be shorter or longer than the header; missing trailing cells read
/// as absent rather than failing the load.
pub fn load_reader<R: Read>(reader: R) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        rows.push(result?);
    }

    Ok(RawTable { headers, rows })
}
