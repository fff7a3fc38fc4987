//! Stable identity of the worker submitting evidence.

use crate::EvidenceError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a submitter. History is keyed by this value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubmitterId(String);

impl SubmitterId {
    /// Create a submitter id, rejecting empty or whitespace-only input.
    pub fn new(raw: impl Into<String>) -> Result<Self, EvidenceError> {
        let s = raw.into();
        if s.trim().is_empty() {
            return Err(EvidenceError::EmptySubmitterId);
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubmitterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for SubmitterId {
    type Error = EvidenceError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<SubmitterId> for String {
    fn from(id: SubmitterId) -> Self {
        id.0
    }
}
