//! Command-line interface for custdelta

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "custdelta")]
#[command(about = "Daily customer snapshot delta processor")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (defaults to custdelta.json in the working directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the data directory
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Hide progress spinners
    #[arg(long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default config file and create its directories
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Process the day's snapshot against the previous master
    Run {
        /// Run date as YYYYMMDD (defaults to today)
        #[arg(long, value_parser = validate_date)]
        date: Option<String>,

        /// Skip the trend chart
        #[arg(long)]
        no_report: bool,

        /// Output the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Classify two snapshot files
    Diff {
        /// Previous snapshot file
        previous: PathBuf,

        /// Current snapshot file
        current: PathBuf,

        /// Write master and delta files into this directory
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Date used to name output files, as YYYYMMDD (defaults to today)
        #[arg(long, value_parser = validate_date)]
        date: Option<String>,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render the trend chart for an existing delta file
    Report {
        /// Delta file to chart
        delta_file: PathBuf,

        /// Chart file (defaults to the plot directory)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Date used to name the chart, as YYYYMMDD (defaults to today)
        #[arg(long, value_parser = validate_date)]
        date: Option<String>,
    },

    /// List processed run dates
    List {
        /// Output format: "pretty", "json"
        #[arg(long, default_value = "pretty")]
        format: String,
    },
}

/// Parse output format string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {}. Use 'pretty' or 'json'", s)),
        }
    }
}

/// Validate a YYYYMMDD date argument
fn validate_date(s: &str) -> Result<String, String> {
    crate::context::parse_date_stamp(s)
        .map(|_| s.trim().to_string())
        .map_err(|e| e.to_string())
}
