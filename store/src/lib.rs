//! Abstract storage traits for the worktrust pipeline.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The verification core depends only on the traits.

pub mod error;
pub mod submission;

pub use error::StoreError;
pub use submission::{EvidenceStore, HistoricalRecord, SubmissionRecord};
