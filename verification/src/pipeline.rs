//! Submission pipeline: validate, verify, persist.
//!
//! Submissions from the same submitter are serialised by a per-submitter
//! lock held across verification and persistence, so each one's velocity
//! check sees every earlier submission from this process. Different
//! submitters proceed in parallel.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::Instrument;
use worktrust_store::{EvidenceStore, SubmissionRecord};
use worktrust_types::{Clock, EvidenceBundle, SubmitterId, VerificationVerdict};

use crate::tracing_spans::persist_span;
use crate::{Orchestrator, SubmissionPhase, SubmissionState, VerificationError};

pub struct EvidencePipeline {
    orchestrator: Orchestrator,
    store: Arc<dyn EvidenceStore>,
    clock: Arc<dyn Clock>,
    /// Per-submitter mutexes
    submitter_locks: Mutex<HashMap<SubmitterId, Arc<Mutex<()>>>>,
}

impl EvidencePipeline {
    /// `store` must be the same store the orchestrator reads history from.
    pub fn new(
        orchestrator: Orchestrator,
        store: Arc<dyn EvidenceStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            orchestrator,
            store,
            clock,
            submitter_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// Get or create the lock for a specific submitter.
    async fn submitter_lock(&self, submitter: &SubmitterId) -> Arc<Mutex<()>> {
        let mut locks = self.submitter_locks.lock().await;
        locks
            .entry(submitter.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop locks no submission is holding or waiting on.
    async fn cleanup_locks(&self) {
        let mut locks = self.submitter_locks.lock().await;
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    /// Number of submitters with a lock entry.
    pub async fn active_submitters(&self) -> usize {
        self.submitter_locks.lock().await.len()
    }

    /// Verify one submission and append it to the submitter's history.
    ///
    /// Accepted and rejected submissions are both persisted. Fails only on
    /// invalid evidence or when the record cannot be written.
    pub async fn submit(
        &self,
        submitter: &SubmitterId,
        evidence: &EvidenceBundle,
        origin: &str,
    ) -> Result<VerificationVerdict, VerificationError> {
        let mut state = SubmissionState::new();

        let lock = self.submitter_lock(submitter).await;
        let result = {
            let _guard = lock.lock().await;
            self.verify_and_persist(&mut state, submitter, evidence, origin)
                .await
        };
        drop(lock);
        self.cleanup_locks().await;

        result
    }

    async fn verify_and_persist(
        &self,
        state: &mut SubmissionState,
        submitter: &SubmitterId,
        evidence: &EvidenceBundle,
        origin: &str,
    ) -> Result<VerificationVerdict, VerificationError> {
        state.advance(SubmissionPhase::Checking)?;
        let verdict = self.orchestrator.verify(submitter, evidence, origin).await?;
        state.advance(SubmissionPhase::Scored)?;

        let record = SubmissionRecord {
            submitter: submitter.clone(),
            latitude: evidence.latitude,
            longitude: evidence.longitude,
            captured_at: evidence.timestamp,
            recorded_at: self.clock.now(),
            client_hash: evidence.client_hash.clone(),
            photo_reference: evidence.photo_reference.clone(),
            trust_score: verdict.trust_score,
            passed: verdict.passed,
            warnings: verdict.warnings.clone(),
        };
        self.persist(record)
            .instrument(persist_span(submitter, verdict.passed))
            .await?;

        state.advance(if verdict.passed {
            SubmissionPhase::Accepted
        } else {
            SubmissionPhase::Rejected
        })?;
        Ok(verdict)
    }

    async fn persist(&self, record: SubmissionRecord) -> Result<(), VerificationError> {
        let store = Arc::clone(&self.store);
        let submitter = record.submitter.clone();
        let written = tokio::task::spawn_blocking(move || store.append(&record))
            .await
            .map_err(|e| VerificationError::Internal(format!("persist task failed: {e}")))?;

        written.map_err(|e| {
            tracing::error!(submitter = %submitter, error = %e, "failed to persist submission");
            VerificationError::Persistence(e)
        })
    }

    /// Up to `limit` of the submitter's records, newest first.
    pub async fn history(
        &self,
        submitter: &SubmitterId,
        limit: usize,
    ) -> Result<Vec<SubmissionRecord>, VerificationError> {
        let store = Arc::clone(&self.store);
        let who = submitter.clone();
        tokio::task::spawn_blocking(move || store.history(&who, limit))
            .await
            .map_err(|e| VerificationError::Internal(format!("history task failed: {e}")))?
            .map_err(VerificationError::Persistence)
    }

    /// Total records across all submitters.
    pub async fn record_count(&self) -> Result<u64, VerificationError> {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.record_count())
            .await
            .map_err(|e| VerificationError::Internal(format!("count task failed: {e}")))?
            .map_err(VerificationError::Persistence)
    }
}
