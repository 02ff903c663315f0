//! Output formatting utilities

use crate::change_detection::DeltaOutcome;
use crate::error::Result;
use crate::pipeline::RunSummary;
use crate::record::{ChangeCounts, ChangeIndicator};
use crate::report::ChangeTally;
use crate::workspace::ProcessedRun;
use crate::writer::{PersistReport, WriteFailure};
use std::path::Path;

/// Pretty printer for custdelta output
pub struct PrettyPrinter;

impl PrettyPrinter {
    /// Print the summary of a daily run
    pub fn print_run_summary(summary: &RunSummary) {
        println!("📅 Delta run {} (previous day {})", summary.run_date, summary.previous_date);
        println!("├─ Run id: {}", summary.run_id);
        println!("├─ Previous master: {}", summary.previous_path.display());
        println!("├─ Current input: {}", summary.current_path.display());
        Self::print_counts(&summary.counts, "├─ ");
        println!("├─ Master file: {}", summary.master_path.display());
        println!("├─ Delta file: {}", summary.delta_path.display());
        if let Some(rows) = summary.stored_rows {
            println!("├─ Stored master rows: {}", rows);
        }
        match &summary.chart_path {
            Some(path) => println!("└─ Trend chart: {}", path.display()),
            None => println!("└─ Trend chart: not rendered"),
        }
        Self::print_write_failures(&summary.write_failures);
    }

    /// Print the result of classifying two files
    pub fn print_diff_outcome(previous: &Path, current: &Path, outcome: &DeltaOutcome) {
        println!("🔍 Delta: {} → {}", previous.display(), current.display());
        Self::print_counts(&outcome.counts, "├─ ");

        if outcome.delta.is_empty() {
            println!("└─ ✅ No changes");
            return;
        }

        println!("└─ Changed records:");
        for (i, classified) in outcome.delta.records.iter().enumerate() {
            println!(
                "   {} {} {} ({}, {})",
                tree_prefix(i, outcome.delta.len()),
                classified.change.code(),
                classified.record.key(),
                classified.record.customer_name,
                classified.record.phone_id
            );
        }
    }

    pub fn print_persist_report(report: &PersistReport) {
        println!("📁 Master file: {}", report.master_path.display());
        println!("📁 Delta file: {}", report.delta_path.display());
        Self::print_write_failures(&report.failures);
    }

    /// Print write failures as warnings
    pub fn print_write_failures(failures: &[WriteFailure]) {
        for failure in failures {
            eprintln!("⚠️  Warning: {}", crate::error::DeltaError::from(failure.clone()));
        }
    }

    /// Print chart counts per indicator and category
    pub fn print_tally(tally: &ChangeTally, chart_path: &Path) {
        println!("📊 Trend chart: {}", chart_path.display());
        if tally.is_empty() {
            println!("└─ No changes to chart");
            return;
        }

        let entries: Vec<_> = tally.entries().collect();
        for (i, (change, category, count)) in entries.iter().enumerate() {
            println!("{} {} {}: {}", tree_prefix(i, entries.len()), change, category, count);
        }
    }

    /// Print processed run dates
    pub fn print_run_list(runs: &[ProcessedRun]) {
        if runs.is_empty() {
            println!("No processed runs found.");
            return;
        }

        println!("📅 Processed Runs:");
        for (i, run) in runs.iter().enumerate() {
            println!(
                "{} {} [{}]",
                tree_prefix(i, runs.len()),
                run.date.format("%Y%m%d"),
                run_outputs(run)
            );
        }
    }

    fn print_counts(counts: &ChangeCounts, prefix: &str) {
        println!(
            "{}Inserted: {}, Updated: {}, Deleted: {}, Unchanged: {}",
            prefix,
            counts.get(ChangeIndicator::Insert),
            counts.get(ChangeIndicator::Update),
            counts.get(ChangeIndicator::Delete),
            counts.get(ChangeIndicator::NoChange)
        );
        println!(
            "{}Master rows: {}, Delta rows: {}",
            prefix,
            counts.master_total(),
            counts.delta_total()
        );
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl JsonFormatter {
    /// Format any serializable data as JSON
    pub fn format<T: serde::Serialize + ?Sized>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }

    pub fn format_diff_outcome(
        previous: &Path,
        current: &Path,
        outcome: &DeltaOutcome,
        persisted: Option<&PersistReport>,
    ) -> Result<String> {
        let json = serde_json::json!({
            "previous": previous,
            "current": current,
            "counts": outcome.counts,
            "delta": outcome.delta.records,
            "master_rows": outcome.master.len(),
            "outputs": persisted,
        });
        Ok(serde_json::to_string_pretty(&json)?)
    }

    pub fn format_run_list(runs: &[ProcessedRun]) -> Result<String> {
        let json: Vec<_> = runs
            .iter()
            .map(|run| {
                serde_json::json!({
                    "date": run.date.format("%Y%m%d").to_string(),
                    "has_master": run.has_master,
                    "has_delta": run.has_delta,
                })
            })
            .collect();
        Ok(serde_json::to_string_pretty(&json)?)
    }
}

fn tree_prefix(index: usize, len: usize) -> &'static str {
    if index + 1 == len {
        "└─"
    } else {
        "├─"
    }
}

fn run_outputs(run: &ProcessedRun) -> &'static str {
    match (run.has_master, run.has_delta) {
        (true, true) => "master, delta",
        (true, false) => "master",
        (false, true) => "delta",
        (false, false) => "none",
    }
}
