//! Input validation errors for evidence bundles and submitter identities.

use thiserror::Error;

/// Reasons an evidence bundle is rejected before any check runs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvidenceError {
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("accuracy {0} must be a finite, non-negative number of meters")]
    InvalidAccuracy(f64),

    #[error("timestamp {0} is not a positive epoch millisecond value")]
    InvalidTimestamp(i64),

    #[error("network location is invalid: {0}")]
    InvalidNetworkLocation(String),

    #[error("sensor reading '{0}' is not a finite number")]
    NonFiniteSensor(&'static str),

    #[error("required field '{0}' is empty")]
    MissingField(&'static str),

    #[error("submitter id must not be empty")]
    EmptySubmitterId,
}
