//! Delta classification between two daily snapshots

use crate::error::{DeltaError, Result};
use crate::hash::{ContentFingerprint, HashComputer};
use crate::record::{
    ChangeCounts, ChangeIndicator, ClassifiedRecord, CompositeKey, CustomerRecord, DeltaSet,
    MasterSnapshot,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Where a key was found after the outer join
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Membership {
    PreviousOnly,
    CurrentOnly,
    Both,
}

/// A record with its derived key and fingerprint
#[derive(Debug, Clone)]
pub struct KeyedRecord<'a> {
    pub key: CompositeKey,
    pub fingerprint: ContentFingerprint,
    pub record: &'a CustomerRecord,
}

/// One row of the outer join
#[derive(Debug, Clone)]
pub struct JoinedRow<'a> {
    pub key: CompositeKey,
    pub previous: Option<KeyedRecord<'a>>,
    pub current: Option<KeyedRecord<'a>>,
}

impl JoinedRow<'_> {
    pub fn membership(&self) -> Membership {
        match (&self.previous, &self.current) {
            (Some(_), None) => Membership::PreviousOnly,
            (None, Some(_)) => Membership::CurrentOnly,
            _ => Membership::Both,
        }
    }
}

/// Result of classifying one day's snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaOutcome {
    pub delta: DeltaSet,
    pub master: MasterSnapshot,
    pub counts: ChangeCounts,
}

/// Labels used in error messages for the two snapshots
#[derive(Debug, Clone)]
pub struct SnapshotSources {
    pub previous: PathBuf,
    pub current: PathBuf,
}

impl SnapshotSources {
    pub fn new(previous: impl Into<PathBuf>, current: impl Into<PathBuf>) -> Self {
        Self {
            previous: previous.into(),
            current: current.into(),
        }
    }
}

impl Default for SnapshotSources {
    fn default() -> Self {
        Self::new("previous", "current")
    }
}

/// Classifier for daily customer snapshots
pub struct DeltaClassifier {
    hash_computer: HashComputer,
}

impl Default for DeltaClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl DeltaClassifier {
    pub fn new() -> Self {
        Self {
            hash_computer: HashComputer::new(),
        }
    }

    /// Classify every record of both snapshots.
    ///
    /// Fails with `DuplicateSubmission` when the snapshots are identical and
    /// with `DuplicateKey` when a key repeats inside one snapshot.
    pub fn classify(
        &self,
        previous: &[CustomerRecord],
        current: &[CustomerRecord],
        sources: &SnapshotSources,
    ) -> Result<DeltaOutcome> {
        if previous == current {
            log::error!(
                "Duplicate file received for the day ({} records, digest {}); halting",
                current.len(),
                self.hash_computer.snapshot_digest(current)
            );
            return Err(DeltaError::DuplicateSubmission {
                previous: sources.previous.clone(),
                current: sources.current.clone(),
            });
        }
        log::info!("No duplicate file found, classifying records");

        let previous_keyed = self.index_by_key(previous, &sources.previous)?;
        let current_keyed = self.index_by_key(current, &sources.current)?;
        let joined = outer_join(previous_keyed, current_keyed);
        log::debug!("Outer join produced {} keys", joined.len());

        let mut inserts = Vec::new();
        let mut updates = Vec::new();
        let mut deletes = Vec::new();
        let mut unchanged = Vec::new();

        for row in joined {
            match (row.previous, row.current) {
                (Some(prev), None) => deletes.push(prev.record.clone()),
                (None, Some(curr)) => inserts.push(curr.record.clone()),
                (Some(prev), Some(curr)) => {
                    if prev.fingerprint == curr.fingerprint {
                        unchanged.push(curr.record.clone());
                    } else {
                        updates.push(curr.record.clone());
                    }
                }
                (None, None) => {}
            }
        }

        let counts = ChangeCounts {
            inserted: inserts.len(),
            updated: updates.len(),
            deleted: deletes.len(),
            unchanged: unchanged.len(),
        };
        log::info!("Total INSERT records for the day: {}", counts.inserted);
        log::info!("Total UPDATE records for the day: {}", counts.updated);
        log::info!("Total DELETE records for the day: {}", counts.deleted);
        log::info!("Total NO CHANGE records for the day: {}", counts.unchanged);

        let tag = |records: &[CustomerRecord], change: ChangeIndicator| {
            records
                .iter()
                .cloned()
                .map(move |r| ClassifiedRecord::new(r, change))
                .collect::<Vec<_>>()
        };

        let mut delta = tag(&inserts, ChangeIndicator::Insert);
        delta.extend(tag(&updates, ChangeIndicator::Update));
        delta.extend(tag(&deletes, ChangeIndicator::Delete));

        let mut master = inserts;
        master.extend(updates);
        master.extend(unchanged);

        Ok(DeltaOutcome {
            delta: DeltaSet { records: delta },
            master: MasterSnapshot { records: master },
            counts,
        })
    }

    /// Derive key and fingerprint for every record, rejecting repeated keys
    fn index_by_key<'a>(
        &self,
        records: &'a [CustomerRecord],
        source: &Path,
    ) -> Result<BTreeMap<CompositeKey, KeyedRecord<'a>>> {
        let mut index = BTreeMap::new();

        for record in records {
            let key = record.key();
            let keyed = KeyedRecord {
                key,
                fingerprint: self.hash_computer.fingerprint(record),
                record,
            };
            if index.insert(key, keyed).is_some() {
                log::error!("Duplicate key {} in {}", key, source.display());
                return Err(DeltaError::DuplicateKey {
                    path: source.to_path_buf(),
                    key: key.to_string(),
                });
            }
        }

        Ok(index)
    }
}

/// Full outer join of two keyed snapshots, in key order
pub fn outer_join<'a>(
    previous: BTreeMap<CompositeKey, KeyedRecord<'a>>,
    current: BTreeMap<CompositeKey, KeyedRecord<'a>>,
) -> Vec<JoinedRow<'a>> {
    let mut joined: BTreeMap<CompositeKey, JoinedRow<'a>> = BTreeMap::new();

    for (key, keyed) in previous {
        joined.insert(
            key,
            JoinedRow {
                key,
                previous: Some(keyed),
                current: None,
            },
        );
    }

    for (key, keyed) in current {
        joined
            .entry(key)
            .or_insert_with(|| JoinedRow {
                key,
                previous: None,
                current: None,
            })
            .current = Some(keyed);
    }

    joined.into_values().collect()
}
