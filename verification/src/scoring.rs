//! Trust scoring and the accept/reject decision.
//!
//! Start at 100 and subtract a fixed deduction for every failed check, in
//! [`CheckKind::ALL`] order. Two independent rules reject a submission:
//! a failed velocity check, and a final score below the pass threshold.
//! Passing outcomes with cautionary messages cost nothing.

use worktrust_types::{CheckKind, CheckSet, VerificationParams, VerificationVerdict};

/// Warning appended when the platform flagged the location provider as a mock.
pub const MOCK_PROVIDER_WARNING: &str = "location provider flagged as mock";

const BASELINE_SCORE: i64 = 100;

/// Fold four check outcomes into a verdict.
pub fn score(checks: CheckSet, params: &VerificationParams) -> VerificationVerdict {
    let mut trust_score = BASELINE_SCORE;
    let mut passed = true;
    let mut warnings = Vec::new();

    for (kind, outcome) in checks.iter() {
        if outcome.passed {
            continue;
        }
        trust_score -= i64::from(params.deduction(kind));
        warnings.push(outcome.message.clone());
        if kind == CheckKind::Velocity {
            passed = false;
        }
    }

    if trust_score < i64::from(params.pass_threshold) {
        passed = false;
    }

    VerificationVerdict {
        passed,
        trust_score: trust_score.clamp(0, BASELINE_SCORE) as u8,
        checks,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use worktrust_types::CheckOutcome;

    fn checks(ip: bool, velocity: bool, network: bool, sensors: bool) -> CheckSet {
        let outcome = |passed: bool, name: &str| CheckOutcome {
            passed,
            message: format!("{name} {}", if passed { "ok" } else { "failed" }),
        };
        CheckSet {
            ip_geolocation: outcome(ip, "ip"),
            velocity_check: outcome(velocity, "velocity"),
            network_gps_match: outcome(network, "network"),
            sensors: outcome(sensors, "sensors"),
        }
    }

    fn run(ip: bool, velocity: bool, network: bool, sensors: bool) -> VerificationVerdict {
        score(checks(ip, velocity, network, sensors), &VerificationParams::default())
    }

    #[test]
    fn all_pass_is_full_score() {
        let v = run(true, true, true, true);
        assert!(v.passed);
        assert_eq!(v.trust_score, 100);
        assert!(v.warnings.is_empty());
    }

    #[test]
    fn velocity_failure_rejects_despite_score() {
        let v = run(true, false, true, true);
        assert_eq!(v.trust_score, 60);
        assert!(!v.passed);
        assert_eq!(v.warnings, vec!["velocity failed"]);
    }

    #[test]
    fn single_ip_failure_is_advisory() {
        let v = run(false, true, true, true);
        assert_eq!(v.trust_score, 70);
        assert!(v.passed);
    }

    #[test]
    fn threshold_rejects_combined_failures() {
        // 100 - 30 - 25 = 45 < 50
        let v = run(false, true, false, true);
        assert_eq!(v.trust_score, 45);
        assert!(!v.passed);
    }

    #[test]
    fn exactly_threshold_passes() {
        let params = VerificationParams {
            ip_deduction: 50,
            ..VerificationParams::default()
        };
        let v = score(checks(false, true, true, true), &params);
        assert_eq!(v.trust_score, 50);
        assert!(v.passed);
    }

    #[test]
    fn worst_case_clamps_to_zero() {
        let v = run(false, false, false, false);
        assert_eq!(v.trust_score, 0);
        assert!(!v.passed);
        assert_eq!(
            v.warnings,
            vec!["ip failed", "velocity failed", "network failed", "sensors failed"]
        );
    }
}
