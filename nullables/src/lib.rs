//! Nullable infrastructure for deterministic testing.
//!
//! Every external dependency of the verification core (clock, evidence
//! store, IP geolocation) sits behind a trait. This crate provides
//! test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically, including injected failures and latency
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod resolver;
pub mod store;

pub use clock::NullClock;
pub use resolver::NullResolver;
pub use store::NullStore;
