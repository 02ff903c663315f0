//! The daily delta run: load, classify, persist, store, report

use crate::change_detection::{DeltaClassifier, DeltaOutcome, SnapshotSources};
use crate::config::DeltaConfig;
use crate::context::RunContext;
use crate::error::Result;
use crate::progress::{ProgressReporter, Stage};
use crate::record::ChangeCounts;
use crate::report::TrendReporter;
use crate::snapshot::SnapshotLoader;
use crate::store::MasterStore;
use crate::workspace::DataWorkspace;
use crate::writer::{OutputKind, SnapshotWriter, WriteFailure};
use chrono::NaiveDate;
use serde::Serialize;
use std::path::PathBuf;
use uuid::Uuid;

/// Switches for one run
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub render_report: bool,
    pub show_progress: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            render_report: true,
            show_progress: false,
        }
    }
}

/// What a completed run produced
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub run_date: NaiveDate,
    pub previous_date: NaiveDate,
    pub previous_path: PathBuf,
    pub current_path: PathBuf,
    pub master_path: PathBuf,
    pub delta_path: PathBuf,
    pub counts: ChangeCounts,
    pub write_failures: Vec<WriteFailure>,
    pub chart_path: Option<PathBuf>,
    pub stored_rows: Option<usize>,
}

impl RunSummary {
    pub fn is_complete(&self) -> bool {
        self.write_failures.is_empty()
    }
}

/// One delta run over the configured data directory
pub struct DeltaRun<'a> {
    config: &'a DeltaConfig,
    workspace: DataWorkspace,
    context: RunContext,
    options: RunOptions,
    store: Option<Box<dyn MasterStore>>,
}

impl<'a> DeltaRun<'a> {
    pub fn new(config: &'a DeltaConfig, context: RunContext) -> Self {
        Self {
            config,
            workspace: DataWorkspace::new(&config.data_directory),
            context,
            options: RunOptions::default(),
            store: None,
        }
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_store(mut self, store: Box<dyn MasterStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Run every stage in sequence.
    ///
    /// Load and classification errors abort before anything is written. Write
    /// failures are recorded in the summary and skip the chart only when the
    /// delta file is missing.
    pub fn execute(mut self) -> Result<RunSummary> {
        let mut progress = ProgressReporter::new(self.options.show_progress);
        log::info!(
            "Starting delta run {} for {} (previous day {})",
            self.context.run_id,
            self.context.run_stamp(),
            self.context.previous_stamp()
        );

        progress.start_stage(Stage::Load);
        let pair = SnapshotLoader::new()?.load_for_run(&self.workspace, &self.context)?;
        progress.finish_stage(&format!(
            "Loaded {} previous and {} current records",
            pair.previous.len(),
            pair.current.len()
        ));

        progress.start_stage(Stage::Classify);
        let sources = SnapshotSources::new(&pair.previous_path, &pair.current_path);
        let outcome = DeltaClassifier::new().classify(&pair.previous, &pair.current, &sources)?;
        progress.finish_stage(&format!("{} changes found", outcome.counts.delta_total()));

        progress.start_stage(Stage::Write);
        let persisted = SnapshotWriter::persist(&self.workspace, &self.context, &outcome);
        progress.finish_stage(if persisted.is_complete() {
            "Master and delta files written"
        } else {
            "Some outputs could not be written"
        });

        let chart_path = if !self.options.render_report {
            log::info!("Trend chart disabled for this run");
            None
        } else if !persisted.wrote(OutputKind::Delta) {
            log::error!(
                "Delta file {} was not written; skipping trend chart",
                persisted.delta_path.display()
            );
            None
        } else {
            progress.start_stage(Stage::Report);
            let path = TrendReporter::chart_path(&self.config.plot_directory, self.context.run_date);
            TrendReporter::new(self.config.online_source_id)
                .report_delta_file(&persisted.delta_path, &path)?;
            progress.finish_stage("Trend chart rendered");
            Some(path)
        };

        let stored_rows = match self.store.as_mut() {
            Some(store) => {
                progress.start_stage(Stage::Store);
                let rows = store.persist_master(self.context.run_date, &outcome.master)?;
                progress.finish_stage("Master snapshot stored");
                Some(rows)
            }
            None => None,
        };

        log::info!(
            "Delta run {} finished in {:.2?}",
            self.context.run_id,
            progress.elapsed()
        );

        Ok(RunSummary {
            run_id: self.context.run_id,
            run_date: self.context.run_date,
            previous_date: self.context.previous_date,
            previous_path: pair.previous_path,
            current_path: pair.current_path,
            master_path: persisted.master_path,
            delta_path: persisted.delta_path,
            counts: outcome.counts,
            write_failures: persisted.failures,
            chart_path,
            stored_rows,
        })
    }
}

/// Classify two arbitrary snapshot files without touching the data directory
pub fn classify_files(previous: &std::path::Path, current: &std::path::Path) -> Result<DeltaOutcome> {
    let loader = SnapshotLoader::new()?;
    let previous_records = loader.load_snapshot(previous)?;
    let current_records = loader.load_snapshot(current)?;
    DeltaClassifier::new().classify(
        &previous_records,
        &current_records,
        &SnapshotSources::new(previous, current),
    )
}
