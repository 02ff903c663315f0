//! Snapshot loading and record coercion

use crate::context::RunContext;
use crate::data::{scan_layout, DataProcessor, DELIMITER};
use crate::error::{DeltaError, Result};
use crate::record::{ChangeIndicator, ClassifiedRecord, CustomerRecord, DeltaSet, SNAPSHOT_COLUMNS};
use crate::workspace::DataWorkspace;
use std::path::{Path, PathBuf};

/// Previous-day and current-day snapshots of one run
#[derive(Debug, Clone)]
pub struct SnapshotPair {
    pub previous_path: PathBuf,
    pub current_path: PathBuf,
    pub previous: Vec<CustomerRecord>,
    pub current: Vec<CustomerRecord>,
}

/// Snapshot loader
pub struct SnapshotLoader {
    processor: DataProcessor,
}

impl SnapshotLoader {
    pub fn new() -> Result<Self> {
        Ok(Self {
            processor: DataProcessor::new()?,
        })
    }

    /// Locate and load the previous master and the current day's input for a run
    pub fn load_for_run(&self, workspace: &DataWorkspace, context: &RunContext) -> Result<SnapshotPair> {
        let previous_path = workspace.previous_master_path(context);
        let current_path = workspace.current_input_path(context);
        log::info!("Previous day file consumed from: {}", previous_path.display());
        log::info!("Current day file consumed from: {}", current_path.display());

        // Check both before parsing either so a missing file is reported first
        for path in [&previous_path, &current_path] {
            if !path.is_file() {
                log::error!("Input file not found: {}", path.display());
                return Err(DeltaError::missing_input(path.as_path()));
            }
        }

        let previous = self.load_snapshot(&previous_path)?;
        let current = self.load_snapshot(&current_path)?;

        Ok(SnapshotPair {
            previous_path,
            current_path,
            previous,
            current,
        })
    }

    /// Load a snapshot or master file into typed records, in file order
    pub fn load_snapshot(&self, path: &Path) -> Result<Vec<CustomerRecord>> {
        let rows = self.load_rows(path, SNAPSHOT_COLUMNS.len())?;

        let records = rows
            .iter()
            .map(|(line, row)| parse_customer_row(path, *line, row))
            .collect::<Result<Vec<_>>>()?;

        log::debug!("Loaded {} records from {}", records.len(), path.display());
        Ok(records)
    }

    /// Load a delta file written by a previous run
    pub fn load_delta(&self, path: &Path) -> Result<DeltaSet> {
        let rows = self.load_rows(path, SNAPSHOT_COLUMNS.len() + 1)?;

        let mut records = Vec::with_capacity(rows.len());
        for (line, row) in &rows {
            let line = *line;
            let record = parse_customer_row(path, line, row)?;
            let change = ChangeIndicator::parse(&row[SNAPSHOT_COLUMNS.len()])
                .map_err(|reason| DeltaError::malformed(path, line, reason))?;
            records.push(ClassifiedRecord::new(record, change));
        }

        Ok(DeltaSet { records })
    }

    /// Data rows paired with the file line each one starts on
    fn load_rows(&self, path: &Path, min_columns: usize) -> Result<Vec<(u64, Vec<String>)>> {
        let layout = scan_layout(path, DELIMITER)?;
        check_column_count(path, layout.header_columns, min_columns)?;

        if !layout.has_records() {
            log::debug!("{} has no data rows", path.display());
            return Ok(Vec::new());
        }

        let info = self.processor.load_delimited(path, DELIMITER, &layout)?;
        log::debug!(
            "Read {} rows of {} columns from {}",
            info.row_count,
            info.column_count,
            path.display()
        );

        let rows = self.processor.extract_all_data(min_columns)?;
        Ok(layout.record_lines.into_iter().zip(rows).collect())
    }
}

fn check_column_count(path: &Path, found: usize, min_columns: usize) -> Result<()> {
    if found < min_columns {
        return Err(DeltaError::malformed(
            path,
            1,
            format!(
                "expected at least {} '{}'-delimited columns, found {}",
                min_columns, DELIMITER, found
            ),
        ));
    }
    Ok(())
}

/// Coerce one raw row into a customer record
pub fn parse_customer_row(path: &Path, line: u64, row: &[String]) -> Result<CustomerRecord> {
    if row.len() < SNAPSHOT_COLUMNS.len() {
        return Err(DeltaError::malformed(
            path,
            line,
            format!("expected {} fields, found {}", SNAPSHOT_COLUMNS.len(), row.len()),
        ));
    }

    Ok(CustomerRecord {
        source_id: parse_id(path, line, SNAPSHOT_COLUMNS[0], &row[0])?,
        source_customer_id: parse_id(path, line, SNAPSHOT_COLUMNS[1], &row[1])?,
        customer_name: row[2].clone(),
        phone_id: row[3].clone(),
    })
}

fn parse_id(path: &Path, line: u64, column: &str, value: &str) -> Result<i64> {
    value.trim().parse::<i64>().map_err(|_| {
        DeltaError::malformed(
            path,
            line,
            format!("{} '{}' is not an integer", column, value),
        )
    })
}
