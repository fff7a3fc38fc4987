//! Evidence submission storage trait.
//!
//! The store is append-only. Each submission (accepted or rejected) produces
//! one record; a newer record supersedes an older one as the submitter's
//! baseline but never replaces it. Persistence order per submitter defines
//! what "most recent" means.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use worktrust_types::{GeoPoint, SubmitterId, TimestampMs};

/// Everything persisted about one evaluated submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub submitter: SubmitterId,
    pub latitude: f64,
    pub longitude: f64,
    /// Client-claimed capture instant of the evidence.
    pub captured_at: TimestampMs,
    /// Server time at which the record was persisted.
    pub recorded_at: TimestampMs,
    pub client_hash: String,
    pub photo_reference: String,
    pub trust_score: u8,
    pub passed: bool,
    pub warnings: Vec<String>,
}

/// The slice of a prior submission the velocity check compares against.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    pub latitude: f64,
    pub longitude: f64,
    /// Claimed capture instant of the prior evidence, so elapsed time
    /// measures travel between two observations rather than upload latency.
    pub verified_timestamp: TimestampMs,
}

impl SubmissionRecord {
    pub fn historical(&self) -> HistoricalRecord {
        HistoricalRecord {
            latitude: self.latitude,
            longitude: self.longitude,
            verified_timestamp: self.captured_at,
        }
    }
}

impl HistoricalRecord {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Trait for persisting and reading evidence submissions.
pub trait EvidenceStore: Send + Sync {
    /// Append a record to its submitter's stream.
    fn append(&self, record: &SubmissionRecord) -> Result<(), StoreError>;

    /// Up to `limit` records for `submitter`, newest first.
    fn history(
        &self,
        submitter: &SubmitterId,
        limit: usize,
    ) -> Result<Vec<SubmissionRecord>, StoreError>;

    /// Total number of records across all submitters.
    fn record_count(&self) -> Result<u64, StoreError>;

    /// The most recently persisted record for `submitter`, or `None` for a
    /// first-time submitter.
    fn last_location(
        &self,
        submitter: &SubmitterId,
    ) -> Result<Option<HistoricalRecord>, StoreError> {
        Ok(self
            .history(submitter, 1)?
            .first()
            .map(SubmissionRecord::historical))
    }
}
