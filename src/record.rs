//! Customer records and the shapes produced by classification

use serde::{Deserialize, Serialize};
use std::fmt;

/// Column headers shared by snapshot, master and delta files
pub const SNAPSHOT_COLUMNS: [&str; 4] = ["sor_id", "sor_cust_id", "CustomerName", "PhoneId"];

/// Header of the change indicator column in delta files
pub const CHANGE_INDICATOR_COLUMN: &str = "CHANGE_INDICATOR";

/// One row of a snapshot file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub source_id: i64,
    pub source_customer_id: i64,
    pub customer_name: String,
    pub phone_id: String,
}

impl CustomerRecord {
    pub fn new(
        source_id: i64,
        source_customer_id: i64,
        customer_name: impl Into<String>,
        phone_id: impl Into<String>,
    ) -> Self {
        Self {
            source_id,
            source_customer_id,
            customer_name: customer_name.into(),
            phone_id: phone_id.into(),
        }
    }

    pub fn key(&self) -> CompositeKey {
        CompositeKey {
            source_id: self.source_id,
            source_customer_id: self.source_customer_id,
        }
    }

    /// Field values in file column order
    pub fn fields(&self) -> [String; 4] {
        [
            self.source_id.to_string(),
            self.source_customer_id.to_string(),
            self.customer_name.clone(),
            self.phone_id.clone(),
        ]
    }
}

/// Identity of a customer across snapshots.
///
/// Ordered numerically by source id, then by source customer id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompositeKey {
    pub source_id: i64,
    pub source_customer_id: i64,
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.source_id, self.source_customer_id)
    }
}

/// Change classification of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeIndicator {
    Insert,
    Update,
    Delete,
    NoChange,
}

impl ChangeIndicator {
    /// Single-letter code written to delta files
    pub fn code(self) -> &'static str {
        match self {
            Self::Insert => "I",
            Self::Update => "U",
            Self::Delete => "D",
            Self::NoChange => "N",
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim() {
            "I" => Ok(Self::Insert),
            "U" => Ok(Self::Update),
            "D" => Ok(Self::Delete),
            "N" => Ok(Self::NoChange),
            other => Err(format!("Invalid change indicator: '{}'. Use I, U, D or N", other)),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Insert => "Insert",
            Self::Update => "Update",
            Self::Delete => "Delete",
            Self::NoChange => "NoChange",
        }
    }
}

impl fmt::Display for ChangeIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A record tagged with its change indicator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedRecord {
    pub record: CustomerRecord,
    pub change: ChangeIndicator,
}

impl ClassifiedRecord {
    pub fn new(record: CustomerRecord, change: ChangeIndicator) -> Self {
        Self { record, change }
    }
}

/// Inserted, updated and deleted records of one run, in that order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaSet {
    pub records: Vec<ClassifiedRecord>,
}

impl DeltaSet {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn with_change(&self, change: ChangeIndicator) -> impl Iterator<Item = &CustomerRecord> {
        self.records
            .iter()
            .filter(move |r| r.change == change)
            .map(|r| &r.record)
    }
}

/// Current state of every customer after a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterSnapshot {
    pub records: Vec<CustomerRecord>,
}

impl MasterSnapshot {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Per-indicator totals of one classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeCounts {
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
    pub unchanged: usize,
}

impl ChangeCounts {
    pub fn get(&self, change: ChangeIndicator) -> usize {
        match change {
            ChangeIndicator::Insert => self.inserted,
            ChangeIndicator::Update => self.updated,
            ChangeIndicator::Delete => self.deleted,
            ChangeIndicator::NoChange => self.unchanged,
        }
    }

    pub fn delta_total(&self) -> usize {
        self.inserted + self.updated + self.deleted
    }

    pub fn master_total(&self) -> usize {
        self.inserted + self.updated + self.unchanged
    }
}
