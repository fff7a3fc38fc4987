//! Pre-built [`tracing::Span`] constructors for verification operations.
//!
//! Consistent span names and field sets make it easy to filter and
//! correlate a submission's events across checks and persistence.

use tracing::{info_span, Span};
use worktrust_types::SubmitterId;

/// Span covering the full verification of one submission.
pub fn verify_span(submitter: &SubmitterId) -> Span {
    info_span!("verify", submitter = %submitter)
}

/// Span covering the write of one submission record.
pub fn persist_span(submitter: &SubmitterId, passed: bool) -> Span {
    info_span!("persist", submitter = %submitter, passed = passed)
}

/// Span covering the history read that feeds the velocity check.
pub fn history_span(submitter: &SubmitterId) -> Span {
    info_span!("history_lookup", submitter = %submitter)
}
