//! # custdelta
//!
//! Daily customer snapshot delta processor. Compares the previous day's master
//! snapshot with the current day's input, classifies each customer as
//! inserted, updated, deleted or unchanged, writes the new master and delta
//! files and charts the day's changes.

pub mod cli;
pub mod error;
pub mod config;
pub mod context;
pub mod workspace;
pub mod record;
pub mod hash;
pub mod data;
pub mod snapshot;
pub mod change_detection;
pub mod writer;
pub mod report;
pub mod store;
pub mod pipeline;
pub mod commands;
pub mod output;
pub mod progress;
pub mod logging;

pub use change_detection::{DeltaClassifier, DeltaOutcome};
pub use config::DeltaConfig;
pub use context::RunContext;
pub use error::{DeltaError, Result};
pub use pipeline::{DeltaRun, RunSummary};
pub use workspace::DataWorkspace;

/// Current format version of config files
pub const FORMAT_VERSION: &str = "1.0.0";
