//! Shared utilities for the worktrust pipeline.

pub mod logging;

pub use logging::{init_logging, LogFormat, UnknownLogFormat};
