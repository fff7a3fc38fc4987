//! Check outcomes and the composed verification verdict.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of a single check. `message` is always populated, pass or fail,
/// so the audit trail shows what each check concluded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub passed: bool,
    pub message: String,
}

impl CheckOutcome {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }
}

/// The four independent checks, in scoring order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CheckKind {
    IpGeolocation,
    Velocity,
    NetworkGpsMatch,
    Sensors,
}

impl CheckKind {
    /// Fixed order in which checks are scored and warnings are emitted.
    pub const ALL: [CheckKind; 4] = [
        CheckKind::IpGeolocation,
        CheckKind::Velocity,
        CheckKind::NetworkGpsMatch,
        CheckKind::Sensors,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckKind::IpGeolocation => "ip_geolocation",
            CheckKind::Velocity => "velocity",
            CheckKind::NetworkGpsMatch => "network_gps_match",
            CheckKind::Sensors => "sensors",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outcome per check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckSet {
    pub ip_geolocation: CheckOutcome,
    pub velocity_check: CheckOutcome,
    pub network_gps_match: CheckOutcome,
    pub sensors: CheckOutcome,
}

impl CheckSet {
    pub fn get(&self, kind: CheckKind) -> &CheckOutcome {
        match kind {
            CheckKind::IpGeolocation => &self.ip_geolocation,
            CheckKind::Velocity => &self.velocity_check,
            CheckKind::NetworkGpsMatch => &self.network_gps_match,
            CheckKind::Sensors => &self.sensors,
        }
    }

    /// Outcomes in [`CheckKind::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (CheckKind, &CheckOutcome)> {
        CheckKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }

    pub fn failed(&self) -> impl Iterator<Item = CheckKind> + '_ {
        self.iter()
            .filter(|(_, outcome)| !outcome.passed)
            .map(|(kind, _)| kind)
    }
}

/// The composed decision for one submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationVerdict {
    pub passed: bool,
    /// Always within `0..=100`.
    pub trust_score: u8,
    pub checks: CheckSet,
    pub warnings: Vec<String>,
}
