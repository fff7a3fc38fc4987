//! Evidence verification: decides whether a submitted GPS fix is genuine.
//!
//! The pipeline runs four independent checks against a submission:
//!
//! 1. **IP geolocation**: is the network origin near the claimed position?
//! 2. **Velocity**: could the submitter have travelled here from their last
//!    recorded position in the elapsed time?
//! 3. **Network vs GPS**: does cell/Wi-Fi positioning agree with GPS?
//! 4. **Sensors**: are altitude and speed physically plausible?
//!
//! Each check is a free function returning a [`CheckOutcome`]. The
//! [`Orchestrator`] fans them out concurrently, [`score`] folds them into a
//! [`VerificationVerdict`], and the [`EvidencePipeline`] persists every
//! evaluated submission so it becomes the velocity baseline for the next one.
//!
//! Third-party lookups (IP geolocation, history reads) degrade to passing
//! outcomes when unavailable; only a failed write of the current submission
//! is an error.
//!
//! [`CheckOutcome`]: worktrust_types::CheckOutcome
//! [`VerificationVerdict`]: worktrust_types::VerificationVerdict

pub mod error;
pub mod history;
pub mod ip_geolocation;
pub mod metrics;
pub mod network_match;
pub mod orchestrator;
pub mod pipeline;
pub mod scoring;
pub mod sensors;
pub mod state;
pub mod tracing_spans;
pub mod velocity;

pub use error::VerificationError;
pub use history::{HistoryLookup, LastLocation, DEFAULT_HISTORY_TIMEOUT};
pub use ip_geolocation::{check_ip_geolocation, DEFAULT_GEOIP_TIMEOUT};
pub use metrics::VerificationMetrics;
pub use network_match::check_network_gps_match;
pub use orchestrator::Orchestrator;
pub use pipeline::EvidencePipeline;
pub use scoring::{score, MOCK_PROVIDER_WARNING};
pub use sensors::check_sensors;
pub use state::{SubmissionPhase, SubmissionState};
pub use velocity::{assess_velocity, check_velocity};

use worktrust_types::CheckOutcome;

/// Outcome of a check that depends on an external collaborator.
///
/// `degraded` is set when the collaborator was unavailable and the outcome
/// is a pass by default rather than a real assessment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assessment {
    pub outcome: CheckOutcome,
    pub degraded: bool,
}

impl Assessment {
    pub fn assessed(outcome: CheckOutcome) -> Self {
        Self {
            outcome,
            degraded: false,
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            outcome: CheckOutcome::pass(message),
            degraded: true,
        }
    }
}
