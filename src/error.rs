//! Error types for delta processing

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DeltaError>;

/// Exit status reported when the same day's file is submitted twice
pub const DUPLICATE_SUBMISSION_EXIT_CODE: i32 = 101;

#[derive(Error, Debug)]
pub enum DeltaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    #[error("Input file not found or unreadable: {path}")]
    MissingInputFile { path: PathBuf },

    #[error("Duplicate file received for the day: {current} is identical to {previous}")]
    DuplicateSubmission { previous: PathBuf, current: PathBuf },

    #[error("Malformed record in {path} at line {line}: {reason}")]
    MalformedRecord {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    #[error("Duplicate key {key} in {path}")]
    DuplicateKey { path: PathBuf, key: String },

    #[error("Failed to write {path}: {message}")]
    WriteFailure { path: PathBuf, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Report rendering error: {message}")]
    Report { message: String },

    #[error("Master store error: {message}")]
    Store { message: String },

    #[error("Walkdir error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

impl DeltaError {
    pub fn missing_input(path: impl Into<PathBuf>) -> Self {
        Self::MissingInputFile { path: path.into() }
    }

    pub fn malformed(path: impl Into<PathBuf>, line: u64, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }

    pub fn report(msg: impl Into<String>) -> Self {
        Self::Report {
            message: msg.into(),
        }
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store {
            message: msg.into(),
        }
    }

    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::DuplicateSubmission { .. } => DUPLICATE_SUBMISSION_EXIT_CODE,
            _ => 1,
        }
    }
}
