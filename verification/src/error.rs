use thiserror::Error;
use worktrust_store::StoreError;
use worktrust_types::EvidenceError;

use crate::SubmissionPhase;

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("invalid evidence: {0}")]
    InvalidEvidence(#[from] EvidenceError),

    #[error("failed to persist submission: {0}")]
    Persistence(#[source] StoreError),

    #[error("invalid submission phase transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: SubmissionPhase,
        to: SubmissionPhase,
    },

    #[error("{0}")]
    Internal(String),
}
