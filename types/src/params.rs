//! Verification parameters: every threshold and deduction the checks and
//! the scoring engine use.
//!
//! The defaults are the production policy. Deployments may tune them through
//! the `[params]` table of the service config.

use crate::CheckKind;
use serde::{Deserialize, Serialize};

/// All tunable verification thresholds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationParams {
    // ── IP geolocation ───────────────────────────────────────────────────
    /// GPS-to-IP distance above which the check fails (km).
    pub ip_fail_distance_km: f64,
    /// GPS-to-IP distance above which a passing result carries a caution (km).
    pub ip_warn_distance_km: f64,

    // ── Velocity ─────────────────────────────────────────────────────────
    /// Implied speed above which travel is physically impossible (km/h).
    pub velocity_fail_kmh: f64,
    /// Implied speed above which a passing result notes air travel (km/h).
    pub velocity_warn_kmh: f64,
    /// Below this many elapsed seconds a submission counts as a retry.
    pub min_elapsed_secs: f64,

    // ── Network vs GPS ───────────────────────────────────────────────────
    /// GPS-to-network distance above which the check fails (km).
    pub network_fail_distance_km: f64,
    /// GPS-to-network distance above which a passing result is cautionary (km).
    pub network_warn_distance_km: f64,

    // ── Sensors ──────────────────────────────────────────────────────────
    /// Lowest plausible altitude (m); below the Dead Sea shore with margin.
    pub min_altitude_m: f64,
    /// Highest plausible altitude (m); above Everest with margin.
    pub max_altitude_m: f64,

    // ── Scoring ──────────────────────────────────────────────────────────
    pub ip_deduction: u32,
    pub velocity_deduction: u32,
    pub network_deduction: u32,
    pub sensors_deduction: u32,
    /// Scores strictly below this reject the submission.
    pub pass_threshold: u32,
}

impl VerificationParams {
    /// Points subtracted from the trust score when `kind` fails.
    pub fn deduction(&self, kind: CheckKind) -> u32 {
        match kind {
            CheckKind::IpGeolocation => self.ip_deduction,
            CheckKind::Velocity => self.velocity_deduction,
            CheckKind::NetworkGpsMatch => self.network_deduction,
            CheckKind::Sensors => self.sensors_deduction,
        }
    }
}

impl Default for VerificationParams {
    fn default() -> Self {
        Self {
            ip_fail_distance_km: 500.0,
            ip_warn_distance_km: 100.0,
            velocity_fail_kmh: 1000.0,
            velocity_warn_kmh: 500.0,
            min_elapsed_secs: 1.0,
            network_fail_distance_km: 10.0,
            network_warn_distance_km: 5.0,
            min_altitude_m: -500.0,
            max_altitude_m: 8900.0,
            ip_deduction: 30,
            velocity_deduction: 40,
            network_deduction: 25,
            sensors_deduction: 15,
            pass_threshold: 50,
        }
    }
}
