//! Master and delta file serialization

use crate::change_detection::DeltaOutcome;
use crate::context::RunContext;
use crate::data::DELIMITER;
use crate::error::{DeltaError, Result};
use crate::record::{DeltaSet, MasterSnapshot, CHANGE_INDICATOR_COLUMN, SNAPSHOT_COLUMNS};
use crate::workspace::DataWorkspace;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Which output a file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OutputKind {
    Master,
    Delta,
}

/// A write that failed but did not abort the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteFailure {
    pub kind: OutputKind,
    pub path: PathBuf,
    pub message: String,
}

impl From<WriteFailure> for DeltaError {
    fn from(failure: WriteFailure) -> Self {
        DeltaError::WriteFailure {
            path: failure.path,
            message: failure.message,
        }
    }
}

/// Outcome of best-effort persistence
#[derive(Debug, Clone, Serialize)]
pub struct PersistReport {
    pub master_path: PathBuf,
    pub delta_path: PathBuf,
    pub failures: Vec<WriteFailure>,
}

impl PersistReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn wrote(&self, kind: OutputKind) -> bool {
        !self.failures.iter().any(|f| f.kind == kind)
    }
}

/// Writer for master and delta files
pub struct SnapshotWriter;

impl SnapshotWriter {
    /// Write both outputs of a run into its dated directory.
    ///
    /// A failed write is logged and recorded in the report; the other file is
    /// still attempted.
    pub fn persist(workspace: &DataWorkspace, context: &RunContext, outcome: &DeltaOutcome) -> PersistReport {
        let master_path = workspace.master_output_path(context);
        let delta_path = workspace.delta_output_path(context);
        log::info!("Current day master file: {}", master_path.display());
        log::info!("Current day delta file: {}", delta_path.display());

        Self::persist_to(&master_path, &delta_path, outcome)
    }

    /// Write both outputs to explicit paths
    pub fn persist_to(master_path: &Path, delta_path: &Path, outcome: &DeltaOutcome) -> PersistReport {
        let mut failures = Vec::new();

        if let Err(e) = Self::write_master(master_path, &outcome.master) {
            log::error!("Failed to write master file {}: {}", master_path.display(), e);
            failures.push(WriteFailure {
                kind: OutputKind::Master,
                path: master_path.to_path_buf(),
                message: e.to_string(),
            });
        }

        if let Err(e) = Self::write_delta(delta_path, &outcome.delta) {
            log::error!("Failed to write delta file {}: {}", delta_path.display(), e);
            failures.push(WriteFailure {
                kind: OutputKind::Delta,
                path: delta_path.to_path_buf(),
                message: e.to_string(),
            });
        }

        PersistReport {
            master_path: master_path.to_path_buf(),
            delta_path: delta_path.to_path_buf(),
            failures,
        }
    }

    pub fn write_master(path: &Path, master: &MasterSnapshot) -> Result<()> {
        write_file(path, &render_master(master))?;
        log::debug!("Wrote {} master rows to {}", master.len(), path.display());
        Ok(())
    }

    pub fn write_delta(path: &Path, delta: &DeltaSet) -> Result<()> {
        write_file(path, &render_delta(delta))?;
        log::debug!("Wrote {} delta rows to {}", delta.len(), path.display());
        Ok(())
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, content)?;
    Ok(())
}

/// Delimited content of a master snapshot, header first
pub fn render_master(master: &MasterSnapshot) -> String {
    let mut content = header_line(&SNAPSHOT_COLUMNS);
    for record in &master.records {
        push_row(&mut content, &record.fields());
    }
    content
}

/// Delimited content of a delta set, header first
pub fn render_delta(delta: &DeltaSet) -> String {
    let mut columns = SNAPSHOT_COLUMNS.to_vec();
    columns.push(CHANGE_INDICATOR_COLUMN);

    let mut content = header_line(&columns);
    for classified in &delta.records {
        let [id, cust, name, phone] = classified.record.fields();
        push_row(&mut content, &[id, cust, name, phone, classified.change.code().to_string()]);
    }
    content
}

fn header_line(columns: &[&str]) -> String {
    let mut line = columns.join(DELIMITER);
    line.push('\n');
    line
}

fn push_row(content: &mut String, values: &[String]) {
    let escaped: Vec<String> = values.iter().map(|v| escape_field(v)).collect();
    content.push_str(&escaped.join(DELIMITER));
    content.push('\n');
}

/// Quote a value if it contains the delimiter, quotes or newlines
fn escape_field(value: &str) -> String {
    if value.contains(DELIMITER) || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
