//! Submission lifecycle tracking.

use serde::{Deserialize, Serialize};

use crate::VerificationError;

/// Where a single submission is in its lifecycle.
///
/// `Received -> Checking -> Scored -> {Accepted | Rejected}`. There is no
/// retry phase; a retry is a new submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionPhase {
    /// Evidence arrived and passed input validation.
    Received,
    /// The four checks are running.
    Checking,
    /// Checks are folded into a verdict.
    Scored,
    /// Verdict passed and the record is persisted.
    Accepted,
    /// Verdict failed and the record is persisted.
    Rejected,
}

impl SubmissionPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }

    pub fn can_transition_to(self, next: SubmissionPhase) -> bool {
        matches!(
            (self, next),
            (Self::Received, Self::Checking)
                | (Self::Checking, Self::Scored)
                | (Self::Scored, Self::Accepted)
                | (Self::Scored, Self::Rejected)
        )
    }
}

/// Forward-only phase tracker for one submission.
#[derive(Debug)]
pub struct SubmissionState {
    phase: SubmissionPhase,
}

impl SubmissionState {
    pub fn new() -> Self {
        Self {
            phase: SubmissionPhase::Received,
        }
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    pub fn advance(&mut self, next: SubmissionPhase) -> Result<(), VerificationError> {
        if !self.phase.can_transition_to(next) {
            return Err(VerificationError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::debug!(from = ?self.phase, to = ?next, "submission phase transition");
        self.phase = next;
        Ok(())
    }
}

impl Default for SubmissionState {
    fn default() -> Self {
        Self::new()
    }
}
