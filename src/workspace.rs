//! Data directory layout for daily runs

use crate::context::{date_stamp, parse_date_stamp, RunContext};
use crate::error::Result;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File name prefix of a master snapshot written by a run
pub const MASTER_PREFIX: &str = "N_MasterFile_";
/// File name prefix of the raw current-day snapshot
pub const CURRENT_INPUT_PREFIX: &str = "O_MasterFile_";
/// File name prefix of a delta file
pub const DELTA_PREFIX: &str = "DeltaFile_";
/// Extension of all snapshot files
pub const SNAPSHOT_EXTENSION: &str = "txt";

/// Manages the dated directories under the data root.
///
/// Each run date owns `<root>/<YYYYMMDD>/`, which holds the raw input for that
/// day and the master and delta files the run produces.
#[derive(Debug, Clone)]
pub struct DataWorkspace {
    pub root: PathBuf,
}

impl DataWorkspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn day_dir(&self, date: NaiveDate) -> PathBuf {
        self.root.join(date_stamp(date))
    }

    pub fn master_path(&self, date: NaiveDate) -> PathBuf {
        self.day_dir(date).join(file_name(MASTER_PREFIX, date))
    }

    pub fn input_path(&self, date: NaiveDate) -> PathBuf {
        self.day_dir(date).join(file_name(CURRENT_INPUT_PREFIX, date))
    }

    pub fn delta_path(&self, date: NaiveDate) -> PathBuf {
        self.day_dir(date).join(file_name(DELTA_PREFIX, date))
    }

    /// Master written by the previous day's run
    pub fn previous_master_path(&self, context: &RunContext) -> PathBuf {
        self.master_path(context.previous_date)
    }

    pub fn current_input_path(&self, context: &RunContext) -> PathBuf {
        self.input_path(context.run_date)
    }

    pub fn master_output_path(&self, context: &RunContext) -> PathBuf {
        self.master_path(context.run_date)
    }

    pub fn delta_output_path(&self, context: &RunContext) -> PathBuf {
        self.delta_path(context.run_date)
    }

    /// List run dates that have master or delta outputs, oldest first
    pub fn list_runs(&self) -> Result<Vec<ProcessedRun>> {
        let mut runs: BTreeMap<NaiveDate, ProcessedRun> = BTreeMap::new();

        if !self.root.exists() {
            return Ok(Vec::new());
        }

        for entry in WalkDir::new(&self.root).min_depth(2).max_depth(2) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let Some((prefix, date)) = parse_output_name(entry.path()) else {
                continue;
            };

            // Files must live in the directory of their own date
            let in_own_dir = entry
                .path()
                .parent()
                .and_then(|p| p.file_name())
                .map(|name| name.to_string_lossy() == date_stamp(date))
                .unwrap_or(false);
            if !in_own_dir {
                continue;
            }

            let run = runs.entry(date).or_insert_with(|| ProcessedRun {
                date,
                has_master: false,
                has_delta: false,
            });
            match prefix {
                MASTER_PREFIX => run.has_master = true,
                DELTA_PREFIX => run.has_delta = true,
                _ => {}
            }
        }

        Ok(runs.into_values().collect())
    }
}

/// A run date found in the data directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedRun {
    pub date: NaiveDate,
    pub has_master: bool,
    pub has_delta: bool,
}

fn file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{}{}.{}", prefix, date_stamp(date), SNAPSHOT_EXTENSION)
}

/// Split an output file name into its prefix and date
fn parse_output_name(path: &Path) -> Option<(&'static str, NaiveDate)> {
    if path.extension()? != SNAPSHOT_EXTENSION {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;

    [MASTER_PREFIX, DELTA_PREFIX].into_iter().find_map(|prefix| {
        let stamp = stem.strip_prefix(prefix)?;
        parse_date_stamp(stamp).ok().map(|date| (prefix, date))
    })
}
