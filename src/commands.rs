//! Command implementations for custdelta CLI

use crate::cli::{Commands, OutputFormat};
use crate::config::{DeltaConfig, DEFAULT_CONFIG_FILE};
use crate::context::RunContext;
use crate::error::{DeltaError, Result};
use crate::output::{JsonFormatter, PrettyPrinter};
use crate::pipeline::{classify_files, DeltaRun, RunOptions};
use crate::report::TrendReporter;
use crate::store::DuckDbMasterStore;
use crate::workspace::{DataWorkspace, DELTA_PREFIX, MASTER_PREFIX, SNAPSHOT_EXTENSION};
use crate::writer::SnapshotWriter;
use std::path::{Path, PathBuf};

/// Options shared by every command
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub config_path: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub quiet: bool,
}

impl GlobalOptions {
    /// Resolve the config file and apply command-line overrides
    pub fn load_config(&self) -> Result<DeltaConfig> {
        let mut config = DeltaConfig::resolve(self.config_path.as_deref())?;
        if let Some(data_dir) = &self.data_dir {
            config.data_directory = data_dir.clone();
        }
        Ok(config)
    }
}

/// Execute a command
pub fn execute_command(command: Commands, options: &GlobalOptions) -> Result<()> {
    match command {
        Commands::Init { force } => init_command(options, force),
        Commands::Run { date, no_report, json } => {
            run_command(options, date.as_deref(), no_report, json)
        }
        Commands::Diff {
            previous,
            current,
            output_dir,
            date,
            json,
        } => diff_command(&previous, &current, output_dir.as_deref(), date.as_deref(), json),
        Commands::Report {
            delta_file,
            output,
            date,
        } => report_command(options, &delta_file, output.as_deref(), date.as_deref()),
        Commands::List { format } => list_command(options, &format),
    }
}

/// Write the config file and create the configured directories
fn init_command(options: &GlobalOptions, force: bool) -> Result<()> {
    let config_path = options
        .config_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    let mut config = if config_path.exists() && !force {
        DeltaConfig::load(&config_path)?
    } else {
        match config_path.parent() {
            Some(base) if !base.as_os_str().is_empty() => DeltaConfig::with_base_dir(base),
            _ => DeltaConfig::default(),
        }
    };
    if let Some(data_dir) = &options.data_dir {
        config.data_directory = data_dir.clone();
    }

    if config.save(&config_path, force)? {
        println!("✅ Wrote config: {}", config_path.display());
    } else {
        println!("ℹ️  Config already exists: {} (use --force to overwrite)", config_path.display());
    }

    config.ensure_directories()?;
    println!("├─ Data directory: {}", config.data_directory.display());
    println!("├─ Plot directory: {}", config.plot_directory.display());
    match &config.log_directory {
        Some(dir) => println!("└─ Log directory: {}", dir.display()),
        None => println!("└─ Logging to stderr"),
    }
    Ok(())
}

/// Run the daily pipeline
fn run_command(options: &GlobalOptions, date: Option<&str>, no_report: bool, json: bool) -> Result<()> {
    let config = options.load_config()?;
    let context = RunContext::from_arg(date)?;

    let mut run = DeltaRun::new(&config, context).with_options(RunOptions {
        render_report: !no_report,
        show_progress: !options.quiet && !json,
    });

    if let Some(store_config) = &config.store {
        let store = DuckDbMasterStore::open(&store_config.database_path, &store_config.table)?;
        run = run.with_store(Box::new(store));
    }

    let summary = run.execute()?;

    if json {
        println!("{}", JsonFormatter::format(&summary)?);
        PrettyPrinter::print_write_failures(&summary.write_failures);
    } else {
        PrettyPrinter::print_run_summary(&summary);
    }
    Ok(())
}

/// Classify two snapshot files, optionally writing outputs
fn diff_command(
    previous: &Path,
    current: &Path,
    output_dir: Option<&Path>,
    date: Option<&str>,
    json: bool,
) -> Result<()> {
    let outcome = classify_files(previous, current)?;

    let persisted = match output_dir {
        Some(dir) => {
            let stamp = RunContext::from_arg(date)?.run_stamp();
            let master_path = dir.join(format!("{}{}.{}", MASTER_PREFIX, stamp, SNAPSHOT_EXTENSION));
            let delta_path = dir.join(format!("{}{}.{}", DELTA_PREFIX, stamp, SNAPSHOT_EXTENSION));
            Some(SnapshotWriter::persist_to(&master_path, &delta_path, &outcome))
        }
        None => None,
    };

    if json {
        println!(
            "{}",
            JsonFormatter::format_diff_outcome(previous, current, &outcome, persisted.as_ref())?
        );
        if let Some(report) = &persisted {
            PrettyPrinter::print_write_failures(&report.failures);
        }
    } else {
        PrettyPrinter::print_diff_outcome(previous, current, &outcome);
        if let Some(report) = &persisted {
            PrettyPrinter::print_persist_report(report);
        }
    }
    Ok(())
}

/// Render the trend chart for an existing delta file
fn report_command(
    options: &GlobalOptions,
    delta_file: &Path,
    output: Option<&Path>,
    date: Option<&str>,
) -> Result<()> {
    let config = options.load_config()?;

    let chart_path = match output {
        Some(path) => path.to_path_buf(),
        None => {
            let context = RunContext::from_arg(date)?;
            TrendReporter::chart_path(&config.plot_directory, context.run_date)
        }
    };

    let tally = TrendReporter::new(config.online_source_id).report_delta_file(delta_file, &chart_path)?;
    PrettyPrinter::print_tally(&tally, &chart_path);
    Ok(())
}

/// List processed run dates
fn list_command(options: &GlobalOptions, format: &str) -> Result<()> {
    let format = OutputFormat::parse(format).map_err(DeltaError::invalid_input)?;
    let config = options.load_config()?;
    let runs = DataWorkspace::new(&config.data_directory).list_runs()?;

    match format {
        OutputFormat::Json => println!("{}", JsonFormatter::format_run_list(&runs)?),
        OutputFormat::Pretty => PrettyPrinter::print_run_list(&runs),
    }
    Ok(())
}
