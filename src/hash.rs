//! Content fingerprints for change detection

use crate::record::CustomerRecord;
use blake3::Hasher;
use serde::{Deserialize, Serialize};

/// A hash value represented as a hex string
pub type HashValue = String;

/// Digest of the mutable fields of a record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentFingerprint(pub HashValue);

/// Hash computer for records and whole snapshots
#[derive(Debug, Default, Clone, Copy)]
pub struct HashComputer;

impl HashComputer {
    pub fn new() -> Self {
        Self
    }

    /// Compute hash for multiple values (e.g., a row)
    pub fn hash_values<S: AsRef<str>>(&self, values: &[S]) -> HashValue {
        let mut hasher = Hasher::new();
        for value in values {
            hasher.update(value.as_ref().as_bytes());
            hasher.update(b"|"); // Separator to avoid hash collisions
        }
        hasher.finalize().to_hex().to_string()
    }

    /// Fingerprint of customer name and phone id
    pub fn fingerprint(&self, record: &CustomerRecord) -> ContentFingerprint {
        ContentFingerprint(self.hash_values(&[&record.customer_name, &record.phone_id]))
    }

    /// Order-sensitive digest of a whole snapshot, used in log output
    pub fn snapshot_digest(&self, records: &[CustomerRecord]) -> HashValue {
        let mut hasher = Hasher::new();
        for record in records {
            for field in record.fields() {
                hasher.update(field.as_bytes());
                hasher.update(b"|");
            }
            hasher.update(b"\n");
        }
        hasher.finalize().to_hex().to_string()
    }
}
