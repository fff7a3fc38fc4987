//! LMDB storage backend for worktrust.
//!
//! Implements the storage traits from `worktrust-store` using the `heed` LMDB
//! bindings. All logical stores live as named databases in one environment.

pub mod environment;
pub mod error;
pub mod submission;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use submission::LmdbEvidenceStore;
