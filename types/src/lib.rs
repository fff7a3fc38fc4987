//! Fundamental types for the worktrust verification pipeline.
//!
//! This crate defines the values shared across every other crate in the workspace:
//! the client-submitted evidence bundle, submitter identity, timestamps, geographic
//! points and distance math, per-check outcomes, verdicts, and tunable parameters.

pub mod error;
pub mod evidence;
pub mod geo;
pub mod params;
pub mod submitter;
pub mod time;
pub mod verdict;

pub use error::EvidenceError;
pub use evidence::{EvidenceBundle, NetworkLocation, SensorReadings};
pub use geo::{distance_km, GeoPoint, EARTH_RADIUS_KM};
pub use params::VerificationParams;
pub use submitter::SubmitterId;
pub use time::{Clock, SystemClock, TimestampMs};
pub use verdict::{CheckKind, CheckOutcome, CheckSet, VerificationVerdict};
