//! Delimited file reading using DuckDB

use crate::error::{DeltaError, Result};
use duckdb::types::ValueRef;
use duckdb::Connection;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Field delimiter of snapshot, master and delta files
pub const DELIMITER: &str = "|";

/// Data processor for delimited snapshot files
pub struct DataProcessor {
    connection: Connection,
}

impl DataProcessor {
    pub fn new() -> Result<Self> {
        let connection = Connection::open_in_memory()?;

        // Rows must come back in file order
        connection.execute("SET preserve_insertion_order=true", [])?;
        connection.execute("SET threads=1", [])?;
        connection.execute("SET enable_progress_bar=false", [])?;

        Ok(Self { connection })
    }

    /// Load a delimited file with a header row and return basic info
    ///
    /// The dialect is fixed from `layout` so the reader never guesses a
    /// header or skips leading rows. A data row wider than the header is a
    /// read error, and the row count must match the records found by the scan.
    pub fn load_delimited(&self, file_path: &Path, delimiter: &str, layout: &FileLayout) -> Result<DataInfo> {
        if !file_path.is_file() {
            return Err(DeltaError::missing_input(file_path));
        }
        // Surface permission problems before DuckDB does
        if std::fs::File::open(file_path).is_err() {
            return Err(DeltaError::missing_input(file_path));
        }

        let column_spec = (0..layout.header_columns)
            .map(|i| format!("'column{}': 'VARCHAR'", i))
            .collect::<Vec<_>>()
            .join(", ");

        let create_view_sql = format!(
            "CREATE OR REPLACE VIEW data_view AS SELECT * FROM read_csv('{}', delim='{}', header=true, skip=0, auto_detect=false, null_padding=false, quote='\"', escape='\"', columns={{{}}})",
            escape_sql_literal(&file_path.to_string_lossy()),
            delimiter,
            column_spec
        );

        self.connection
            .execute(&create_view_sql, [])
            .map_err(|e| convert_duckdb_error(e, file_path))?;

        let row_count: u64 = self
            .connection
            .prepare("SELECT COUNT(*) FROM data_view")
            .and_then(|mut stmt| stmt.query_row([], |row| row.get(0)))
            .map_err(|e| convert_duckdb_error(e, file_path))?;

        let expected = layout.record_lines.len() as u64;
        if row_count != expected {
            let line = layout
                .record_lines
                .get(row_count.min(expected) as usize)
                .copied()
                .unwrap_or(1);
            return Err(DeltaError::malformed(
                file_path,
                line,
                format!("read {} rows but the file holds {} records", row_count, expected),
            ));
        }

        Ok(DataInfo {
            row_count,
            column_count: layout.header_columns,
        })
    }

    /// Extract every row of the current view as strings
    pub fn extract_all_data(&self, column_count: usize) -> Result<Vec<Vec<String>>> {
        if column_count == 0 {
            return Ok(Vec::new());
        }

        let mut stmt = self.connection.prepare("SELECT * FROM data_view").map_err(|e| {
            DeltaError::invalid_input(format!("Failed to prepare data extraction query: {}", e))
        })?;

        let rows = stmt.query_map([], |row| {
            let mut string_row = Vec::with_capacity(column_count);
            for i in 0..column_count {
                string_row.push(value_to_string(row.get_ref(i)?));
            }
            Ok(string_row)
        })?;

        let mut data = Vec::new();
        for row in rows {
            data.push(row?);
        }
        Ok(data)
    }
}

/// Information about a loaded file
#[derive(Debug, Clone)]
pub struct DataInfo {
    pub row_count: u64,
    pub column_count: usize,
}

/// Physical layout of a delimited file: header width and the line each record starts on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileLayout {
    /// Fields in the header row, 0 for a zero-byte file
    pub header_columns: usize,
    /// 1-based file line of every non-blank data record, in file order
    pub record_lines: Vec<u64>,
}

impl FileLayout {
    pub fn has_records(&self) -> bool {
        !self.record_lines.is_empty()
    }
}

/// Scan a delimited file for its header width and record start lines
///
/// Quoted fields may span lines; a record starts on the line where the
/// previous one closed all of its quotes.
pub fn scan_layout(file_path: &Path, delimiter: &str) -> Result<FileLayout> {
    if !file_path.is_file() {
        return Err(DeltaError::missing_input(file_path));
    }
    let file = File::open(file_path).map_err(|_| DeltaError::missing_input(file_path))?;

    let mut layout = FileLayout::default();
    let mut header_seen = false;
    let mut in_quotes = false;

    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        let line_no = index as u64 + 1;

        if !header_seen {
            header_seen = true;
            let header = line.trim_end_matches('\r');
            if !header.trim().is_empty() {
                layout.header_columns = count_fields(header, delimiter);
            }
            in_quotes = ends_in_quotes(header, false);
            continue;
        }

        if !in_quotes && !line.trim().is_empty() {
            layout.record_lines.push(line_no);
        }
        in_quotes = ends_in_quotes(&line, in_quotes);
    }

    Ok(layout)
}

/// Number of delimited fields on a line, ignoring delimiters inside quotes
fn count_fields(line: &str, delimiter: &str) -> usize {
    let mut in_quotes = false;
    let mut fields = 1;
    let mut rest = line;
    while let Some(c) = rest.chars().next() {
        if c == '"' {
            in_quotes = !in_quotes;
        } else if !in_quotes && rest.starts_with(delimiter) {
            fields += 1;
            rest = &rest[delimiter.len()..];
            continue;
        }
        rest = &rest[c.len_utf8()..];
    }
    fields
}

/// Quote state after a line; doubled quotes cancel out
fn ends_in_quotes(line: &str, in_quotes: bool) -> bool {
    (line.chars().filter(|&c| c == '"').count() % 2 == 1) != in_quotes
}

fn value_to_string(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Text(s) => String::from_utf8_lossy(s).to_string(),
        ValueRef::Boolean(b) => b.to_string(),
        ValueRef::Int(i) => i.to_string(),
        ValueRef::BigInt(i) => i.to_string(),
        ValueRef::HugeInt(i) => i.to_string(),
        ValueRef::UBigInt(i) => i.to_string(),
        ValueRef::Double(f) => f.to_string(),
        _ => "<unknown>".to_string(),
    }
}

fn escape_sql_literal(s: &str) -> String {
    s.replace('\'', "''")
}

/// Convert DuckDB read errors into input errors that name the file
fn convert_duckdb_error(error: duckdb::Error, file_path: &Path) -> DeltaError {
    let error_msg = error.to_string();

    if error_msg.contains("No files found") || error_msg.contains("does not exist") {
        DeltaError::missing_input(file_path)
    } else if error_msg.contains("Permission denied") {
        DeltaError::missing_input(file_path)
    } else if let Some(line) = reported_line(&error_msg) {
        DeltaError::malformed(file_path, line, error_msg)
    } else if error_msg.contains("CSV")
        || error_msg.contains("Could not convert")
        || error_msg.contains("Unterminated quoted field")
        || error_msg.contains("UTF-8")
        || error_msg.contains("empty")
    {
        DeltaError::invalid_input(format!(
            "Malformed delimited file '{}': {}",
            file_path.display(),
            error_msg
        ))
    } else {
        DeltaError::DuckDb(error)
    }
}

/// Line number from a DuckDB "CSV Error on Line: N" message
fn reported_line(error_msg: &str) -> Option<u64> {
    let rest = &error_msg[error_msg.find("Line: ")? + "Line: ".len()..];
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}
