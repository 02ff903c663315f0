//! Logger setup for the binary

use crate::error::{DeltaError, Result};
use chrono::Local;
use env_logger::{Builder, Env, Target};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const LOG_FILE_PREFIX: &str = "delta_processing_";

pub fn log_file_path(log_dir: &Path, date_stamp: &str) -> PathBuf {
    log_dir.join(format!("{}{}.log", LOG_FILE_PREFIX, date_stamp))
}

/// Initialise the global logger.
///
/// With a log directory, records are appended to the dated log file in it;
/// otherwise they go to stderr. `RUST_LOG` sets the level unless `verbose`
/// forces debug. Returns the log file path when one is used.
pub fn init(log_dir: Option<&Path>, date_stamp: &str, verbose: bool) -> Result<Option<PathBuf>> {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }

    let log_path = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let path = log_file_path(dir, date_stamp);
            let file = OpenOptions::new().create(true).append(true).open(&path)?;

            builder
                .target(Target::Pipe(Box::new(file)))
                .format(|buf, record| {
                    writeln!(
                        buf,
                        "{}::{} [{}] {}",
                        record.level(),
                        Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                        record.target(),
                        record.args()
                    )
                });
            Some(path)
        }
        None => None,
    };

    builder
        .try_init()
        .map_err(|e| DeltaError::Generic(anyhow::Error::new(e)))?;
    Ok(log_path)
}
