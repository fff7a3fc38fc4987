//! Network-vs-GPS consistency check.

use worktrust_types::{CheckOutcome, EvidenceBundle, VerificationParams};

/// Compare the GPS fix against the cell/Wi-Fi derived position.
pub fn check_network_gps_match(
    evidence: &EvidenceBundle,
    params: &VerificationParams,
) -> CheckOutcome {
    let Some(network) = &evidence.network_location else {
        return CheckOutcome::pass("Network location unavailable");
    };

    let d = evidence.point().distance_km(&network.point());
    if d > params.network_fail_distance_km {
        tracing::info!(distance_km = d, "GPS and network location disagree");
        CheckOutcome::fail(format!(
            "GPS and network location differ by {d:.1} km; possible GPS spoofing"
        ))
    } else if d > params.network_warn_distance_km {
        CheckOutcome::pass(format!(
            "Moderate mismatch between GPS and network location ({d:.1} km)"
        ))
    } else {
        CheckOutcome::pass(format!("GPS matches network location ({d:.2} km)"))
    }
}
