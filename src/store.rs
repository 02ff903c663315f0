//! Optional database copy of each run's master snapshot

use crate::error::{DeltaError, Result};
use crate::record::MasterSnapshot;
use chrono::NaiveDate;
use duckdb::{params, Connection};
use std::path::Path;

/// Persists master snapshots outside the data directory
pub trait MasterStore {
    /// Store the master for a run date, replacing rows stored earlier for that date.
    ///
    /// Returns the number of rows stored.
    fn persist_master(&mut self, run_date: NaiveDate, master: &MasterSnapshot) -> Result<usize>;
}

/// Master store backed by a DuckDB database file
pub struct DuckDbMasterStore {
    connection: Connection,
    table: String,
}

impl DuckDbMasterStore {
    pub fn open(database_path: &Path, table: &str) -> Result<Self> {
        validate_table_name(table)?;

        if let Some(parent) = database_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let connection = Connection::open(database_path).map_err(|e| {
            DeltaError::store(format!(
                "Cannot open database {}: {}",
                database_path.display(),
                e
            ))
        })?;
        log::debug!("Opened master store {}", database_path.display());

        Self::with_connection(connection, table)
    }

    pub fn open_in_memory(table: &str) -> Result<Self> {
        validate_table_name(table)?;
        Self::with_connection(Connection::open_in_memory()?, table)
    }

    fn with_connection(connection: Connection, table: &str) -> Result<Self> {
        connection.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                run_date DATE NOT NULL,
                sor_id BIGINT NOT NULL,
                sor_cust_id BIGINT NOT NULL,
                customer_name VARCHAR,
                phone_id VARCHAR
            )",
            table
        ))?;

        Ok(Self {
            connection,
            table: table.to_string(),
        })
    }

    /// Rows stored for a run date
    pub fn row_count(&self, run_date: NaiveDate) -> Result<u64> {
        let count: u64 = self
            .connection
            .prepare(&format!(
                "SELECT COUNT(*) FROM {} WHERE run_date = CAST(? AS DATE)",
                self.table
            ))?
            .query_row(params![sql_date(run_date)], |row| row.get(0))?;
        Ok(count)
    }
}

impl MasterStore for DuckDbMasterStore {
    fn persist_master(&mut self, run_date: NaiveDate, master: &MasterSnapshot) -> Result<usize> {
        let date = sql_date(run_date);
        let tx = self.connection.transaction()?;

        let replaced = tx.execute(
            &format!("DELETE FROM {} WHERE run_date = CAST(? AS DATE)", self.table),
            params![date],
        )?;
        if replaced > 0 {
            log::info!("Replacing {} stored master rows for {}", replaced, date);
        }

        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {} VALUES (CAST(? AS DATE), ?, ?, ?, ?)",
                self.table
            ))?;
            for record in &master.records {
                stmt.execute(params![
                    date,
                    record.source_id,
                    record.source_customer_id,
                    record.customer_name,
                    record.phone_id
                ])?;
            }
        }

        tx.commit()?;
        log::info!(
            "Stored {} master rows for {} in table {}",
            master.len(),
            date,
            self.table
        );
        Ok(master.len())
    }
}

/// Table names are interpolated into SQL, so only plain identifiers are accepted
pub fn validate_table_name(table: &str) -> Result<()> {
    let mut chars = table.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(DeltaError::config(format!(
            "Invalid store table name '{}'. Use letters, digits and underscores",
            table
        )))
    }
}

fn sql_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
