//! Nullable store: thread-safe in-memory evidence storage for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use worktrust_store::{EvidenceStore, StoreError, SubmissionRecord};
use worktrust_types::SubmitterId;

/// An in-memory [`EvidenceStore`] for testing.
///
/// Thread-safe for use with tokio's multi-threaded runtime. Reads and writes
/// can be made to fail, and reads can be slowed down, to exercise degraded
/// and fatal paths.
pub struct NullStore {
    records: Mutex<HashMap<SubmitterId, Vec<SubmissionRecord>>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    read_delay_ms: AtomicU64,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            read_delay_ms: AtomicU64::new(0),
        }
    }

    /// Make every subsequent read return [`StoreError::Unavailable`].
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent append return [`StoreError::Unavailable`].
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Block each read for `delay` before answering.
    pub fn set_read_delay(&self, delay: Duration) {
        self.read_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    /// Every record persisted for `submitter`, oldest first.
    pub fn records_for(&self, submitter: &SubmitterId) -> Vec<SubmissionRecord> {
        self.records
            .lock()
            .unwrap()
            .get(submitter)
            .cloned()
            .unwrap_or_default()
    }

    fn before_read(&self) -> Result<(), StoreError> {
        let delay = self.read_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            std::thread::sleep(Duration::from_millis(delay));
        }
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("null store reads disabled".into()));
        }
        Ok(())
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EvidenceStore for NullStore {
    fn append(&self, record: &SubmissionRecord) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("null store writes disabled".into()));
        }
        self.records
            .lock()
            .unwrap()
            .entry(record.submitter.clone())
            .or_default()
            .push(record.clone());
        Ok(())
    }

    fn history(
        &self,
        submitter: &SubmitterId,
        limit: usize,
    ) -> Result<Vec<SubmissionRecord>, StoreError> {
        self.before_read()?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .get(submitter)
            .map(|records| records.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    fn record_count(&self) -> Result<u64, StoreError> {
        self.before_read()?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .map(|v| v.len() as u64)
            .sum())
    }
}
