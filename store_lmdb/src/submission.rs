//! LMDB implementation of EvidenceStore.
//!
//! Records use composite keys `len(submitter) ++ submitter ++ sequence`, with
//! the length as a big-endian u16 and the sequence as a big-endian u64. The
//! length prefix keeps `ab` and `abc` in disjoint key ranges; the sequence is
//! a global counter bumped in the same write transaction as the record, so
//! key order within a submitter is persistence order. Newest-first reads are
//! a reverse prefix range-scan.

use std::ops::Bound;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use worktrust_store::{EvidenceStore, StoreError, SubmissionRecord};
use worktrust_types::SubmitterId;

use crate::LmdbError;

const NEXT_SEQUENCE_KEY: &[u8] = b"next_sequence";

pub struct LmdbEvidenceStore {
    pub(crate) env: Arc<Env>,
    pub(crate) submissions_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

/// Build the key prefix shared by every record of `submitter`.
fn submitter_prefix(submitter: &SubmitterId) -> Result<Vec<u8>, LmdbError> {
    let raw = submitter.as_str().as_bytes();
    let len = u16::try_from(raw.len()).map_err(|_| {
        LmdbError::Serialization(format!("submitter id of {} bytes is too long", raw.len()))
    })?;
    let mut key = Vec::with_capacity(2 + raw.len() + 8);
    key.extend_from_slice(&len.to_be_bytes());
    key.extend_from_slice(raw);
    Ok(key)
}

/// Smallest byte string greater than every string starting with `prefix`.
///
/// Returns `false` when the prefix is all `0xFF` and has no upper bound.
fn increment_prefix(prefix: &mut Vec<u8>) -> bool {
    while let Some(last) = prefix.last_mut() {
        if *last == u8::MAX {
            prefix.pop();
        } else {
            *last += 1;
            return true;
        }
    }
    false
}

impl LmdbEvidenceStore {
    fn read_history(
        &self,
        submitter: &SubmitterId,
        limit: usize,
    ) -> Result<Vec<SubmissionRecord>, LmdbError> {
        let prefix = submitter_prefix(submitter)?;
        let mut upper = prefix.clone();
        let upper_bound = if increment_prefix(&mut upper) {
            Bound::Excluded(upper.as_slice())
        } else {
            Bound::Unbounded
        };
        let bounds = (Bound::Included(prefix.as_slice()), upper_bound);

        let rtxn = self.env.read_txn()?;
        let iter = self.submissions_db.rev_range(&rtxn, &bounds)?;
        let mut records = Vec::new();
        for result in iter.take(limit) {
            let (_key, val) = result?;
            records.push(bincode::deserialize::<SubmissionRecord>(val)?);
        }
        Ok(records)
    }

    fn write_record(&self, record: &SubmissionRecord) -> Result<u64, LmdbError> {
        let value = bincode::serialize(record)?;
        let mut key = submitter_prefix(&record.submitter)?;

        let mut wtxn = self.env.write_txn()?;
        let sequence = match self.meta_db.get(&wtxn, NEXT_SEQUENCE_KEY)? {
            Some(bytes) => {
                let arr: [u8; 8] = bytes.try_into().map_err(|_| {
                    LmdbError::Corruption("next_sequence has unexpected byte length".to_string())
                })?;
                u64::from_be_bytes(arr)
            }
            None => 0,
        };
        key.extend_from_slice(&sequence.to_be_bytes());

        self.submissions_db.put(&mut wtxn, &key, &value)?;
        self.meta_db
            .put(&mut wtxn, NEXT_SEQUENCE_KEY, &(sequence + 1).to_be_bytes())?;
        wtxn.commit()?;
        Ok(sequence)
    }
}

impl EvidenceStore for LmdbEvidenceStore {
    fn append(&self, record: &SubmissionRecord) -> Result<(), StoreError> {
        let sequence = self.write_record(record)?;
        tracing::debug!(
            submitter = %record.submitter,
            sequence,
            passed = record.passed,
            "appended submission record"
        );
        Ok(())
    }

    fn history(
        &self,
        submitter: &SubmitterId,
        limit: usize,
    ) -> Result<Vec<SubmissionRecord>, StoreError> {
        self.read_history(submitter, limit)
            .map_err(StoreError::from)
    }

    fn record_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let count = self
            .submissions_db
            .len(&rtxn)
            .map_err(LmdbError::from)?;
        Ok(count)
    }
}
