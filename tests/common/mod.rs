//! Common test utilities and helpers

use chrono::NaiveDate;
use custdelta::config::DeltaConfig;
use custdelta::context::RunContext;
use custdelta::record::{CustomerRecord, MasterSnapshot};
use custdelta::writer::render_master;
use custdelta::{DataWorkspace, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const SNAPSHOT_HEADER: &str = "sor_id|sor_cust_id|CustomerName|PhoneId";
pub const DELTA_HEADER: &str = "sor_id|sor_cust_id|CustomerName|PhoneId|CHANGE_INDICATOR";

/// Test fixture with a config file and a dated data directory
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub config: DeltaConfig,
    pub config_path: PathBuf,
    pub workspace: DataWorkspace,
}

impl TestFixture {
    /// Create a fixture whose config points every directory into the temp dir
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();

        let config = DeltaConfig {
            log_directory: None,
            ..DeltaConfig::with_base_dir(root)
        };
        let config_path = root.join("custdelta.json");
        config.save(&config_path, true)?;

        let workspace = DataWorkspace::new(&config.data_directory);

        Ok(Self {
            temp_dir,
            config,
            config_path,
            workspace,
        })
    }

    /// Get the root path of the test fixture
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write the previous day's master for a run
    pub fn write_previous_master(&self, context: &RunContext, rows: &[CustomerRecord]) -> Result<PathBuf> {
        self.write_raw(&self.workspace.previous_master_path(context), &snapshot_content(rows))
    }

    /// Write the current day's input for a run
    pub fn write_current_input(&self, context: &RunContext, rows: &[CustomerRecord]) -> Result<PathBuf> {
        self.write_raw(&self.workspace.current_input_path(context), &snapshot_content(rows))
    }

    /// Write both inputs of a run
    pub fn prepare_run(
        &self,
        context: &RunContext,
        previous: &[CustomerRecord],
        current: &[CustomerRecord],
    ) -> Result<()> {
        self.write_previous_master(context, previous)?;
        self.write_current_input(context, current)?;
        Ok(())
    }

    /// Write a file with raw content, creating parent directories
    pub fn write_raw(&self, path: &Path, content: &str) -> Result<PathBuf> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(path.to_path_buf())
    }

    /// Write a snapshot file at a path relative to the fixture root
    pub fn create_snapshot(&self, name: &str, rows: &[CustomerRecord]) -> Result<PathBuf> {
        self.write_raw(&self.root().join(name), &snapshot_content(rows))
    }

    pub fn read(&self, path: &Path) -> String {
        fs::read_to_string(path).unwrap_or_else(|e| panic!("Cannot read {}: {}", path.display(), e))
    }
}

/// Serialize records as a snapshot file with header
pub fn snapshot_content(rows: &[CustomerRecord]) -> String {
    render_master(&MasterSnapshot {
        records: rows.to_vec(),
    })
}

pub fn customer(source_id: i64, customer_id: i64, name: &str, phone: &str) -> CustomerRecord {
    CustomerRecord::new(source_id, customer_id, name, phone)
}

pub fn run_date(stamp: &str) -> NaiveDate {
    NaiveDate::parse_from_str(stamp, "%Y%m%d").unwrap()
}

pub fn context_for(stamp: &str) -> RunContext {
    RunContext::new(run_date(stamp))
}

/// Helper for running CLI commands in tests
pub struct CliTestRunner {
    fixture: TestFixture,
}

impl CliTestRunner {
    pub fn new() -> Result<Self> {
        Ok(Self {
            fixture: TestFixture::new()?,
        })
    }

    pub fn fixture(&self) -> &TestFixture {
        &self.fixture
    }

    /// Run a custdelta command and return the result
    pub fn run_command(&self, args: &[&str]) -> Result<()> {
        use clap::Parser;
        use custdelta::cli::Cli;
        use custdelta::commands::{execute_command, GlobalOptions};

        let mut cmd_args = vec!["custdelta"];
        cmd_args.extend(args);

        let cli = Cli::try_parse_from(cmd_args)
            .map_err(|e| custdelta::DeltaError::invalid_input(e.to_string()))?;

        // Use the fixture config unless the command names another
        let options = GlobalOptions {
            config_path: cli.config.or_else(|| Some(self.fixture.config_path.clone())),
            data_dir: cli.data_dir,
            quiet: true,
        };
        execute_command(cli.command, &options)
    }

    /// Run a command and expect it to succeed
    pub fn expect_success(&self, args: &[&str]) {
        self.run_command(args).expect("Command should succeed");
    }

    /// Run a command and expect it to fail
    pub fn expect_failure(&self, args: &[&str]) -> custdelta::DeltaError {
        self.run_command(args).expect_err("Command should fail")
    }
}

/// Sample data generators for testing
pub mod sample_data {
    use super::customer;
    use custdelta::record::CustomerRecord;

    /// Previous day of the reference scenario
    pub fn reference_previous() -> Vec<CustomerRecord> {
        vec![customer(1, 100, "Alice", "555"), customer(2, 200, "Bob", "556")]
    }

    /// Current day of the reference scenario
    pub fn reference_current() -> Vec<CustomerRecord> {
        vec![
            customer(1, 100, "Alice", "555"),
            customer(2, 200, "Bob", "999"),
            customer(3, 300, "Cara", "557"),
        ]
    }

    /// Snapshot with online and offline customers
    pub fn mixed_sources(count: i64) -> Vec<CustomerRecord> {
        (0..count)
            .map(|i| customer(1 + i % 3, 1000 + i, &format!("Customer {}", i), &format!("0{}", 5550000 + i)))
            .collect()
    }
}

/// Assertion helpers for test validation
pub mod assertions {
    use std::path::Path;

    /// Assert that a file exists and is not empty
    pub fn assert_file_exists_and_not_empty(path: &Path) {
        assert!(path.exists(), "File should exist: {}", path.display());
        let metadata = std::fs::metadata(path).expect("Should be able to read file metadata");
        assert!(metadata.len() > 0, "File should not be empty: {}", path.display());
    }

    /// Assert that a directory exists
    pub fn assert_dir_exists(path: &Path) {
        assert!(path.exists(), "Directory should exist: {}", path.display());
        assert!(path.is_dir(), "Path should be a directory: {}", path.display());
    }

    /// Assert that a path does not exist
    pub fn assert_not_exists(path: &Path) {
        assert!(!path.exists(), "Path should not exist: {}", path.display());
    }

    /// Assert file lines after the header
    pub fn assert_data_lines(path: &Path, expected: &[&str]) {
        let content = std::fs::read_to_string(path).expect("Should be able to read file");
        let lines: Vec<&str> = content.lines().skip(1).collect();
        assert_eq!(lines, expected, "Unexpected rows in {}", path.display());
    }
}
