//! Historical location lookup for the velocity check.
//!
//! Store reads are blocking, so they run on the blocking pool and are
//! bounded by a timeout. A slow or failing store never fails the
//! submission; the velocity check degrades instead.

use std::sync::Arc;
use std::time::Duration;

use tracing::Instrument;
use worktrust_store::{EvidenceStore, HistoricalRecord};
use worktrust_types::SubmitterId;

use crate::tracing_spans::history_span;

/// Default bound on a single history read.
pub const DEFAULT_HISTORY_TIMEOUT: Duration = Duration::from_secs(2);

/// Result of looking up a submitter's previous position.
#[derive(Clone, Debug, PartialEq)]
pub enum LastLocation {
    /// The most recently persisted record.
    Found(HistoricalRecord),
    /// No prior record; expected for first-time submitters.
    FirstSubmission,
    /// The store could not answer in time or returned an error.
    Unavailable(String),
}

pub struct HistoryLookup {
    store: Arc<dyn EvidenceStore>,
    timeout: Duration,
}

impl HistoryLookup {
    pub fn new(store: Arc<dyn EvidenceStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    pub(crate) fn store(&self) -> Arc<dyn EvidenceStore> {
        Arc::clone(&self.store)
    }

    /// Most recent persisted record for `submitter`.
    pub async fn last_location(&self, submitter: &SubmitterId) -> LastLocation {
        let store = Arc::clone(&self.store);
        let who = submitter.clone();
        let read = tokio::task::spawn_blocking(move || store.last_location(&who));

        let result = tokio::time::timeout(self.timeout, read)
            .instrument(history_span(submitter))
            .await;

        match result {
            Ok(Ok(Ok(Some(record)))) => LastLocation::Found(record),
            Ok(Ok(Ok(None))) => LastLocation::FirstSubmission,
            Ok(Ok(Err(e))) => {
                tracing::warn!(submitter = %submitter, error = %e, "history read failed");
                LastLocation::Unavailable(e.to_string())
            }
            Ok(Err(join_error)) => {
                tracing::warn!(submitter = %submitter, error = %join_error, "history read task failed");
                LastLocation::Unavailable(format!("history read task failed: {join_error}"))
            }
            Err(_) => {
                tracing::warn!(
                    submitter = %submitter,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "history read timed out"
                );
                LastLocation::Unavailable(format!(
                    "history read timed out after {}ms",
                    self.timeout.as_millis()
                ))
            }
        }
    }
}
