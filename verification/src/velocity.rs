//! Velocity plausibility check.
//!
//! Elapsed time is measured between two *claimed* capture instants, never
//! server receipt times, so it reflects travel time rather than latency.

use worktrust_store::HistoricalRecord;
use worktrust_types::{CheckOutcome, GeoPoint, SubmitterId, TimestampMs, VerificationParams};

use crate::{Assessment, HistoryLookup, LastLocation};

/// Look up the submitter's last position and assess the implied speed.
pub async fn check_velocity(
    history: &HistoryLookup,
    submitter: &SubmitterId,
    point: GeoPoint,
    timestamp: TimestampMs,
    params: &VerificationParams,
) -> Assessment {
    match history.last_location(submitter).await {
        LastLocation::Found(last) => {
            Assessment::assessed(assess_velocity(Some(&last), point, timestamp, params))
        }
        LastLocation::FirstSubmission => {
            Assessment::assessed(assess_velocity(None, point, timestamp, params))
        }
        LastLocation::Unavailable(reason) => {
            Assessment::unavailable(format!("Velocity check unavailable: {reason}"))
        }
    }
}

/// Assess travel from `last` to `point` at `timestamp`.
pub fn assess_velocity(
    last: Option<&HistoricalRecord>,
    point: GeoPoint,
    timestamp: TimestampMs,
    params: &VerificationParams,
) -> CheckOutcome {
    let Some(last) = last else {
        return CheckOutcome::pass("First location recorded");
    };

    let distance = last.point().distance_km(&point);
    let elapsed_secs = timestamp.seconds_since(last.verified_timestamp);

    // Covers duplicates, quick retries and clock skew (negative elapsed).
    if elapsed_secs < params.min_elapsed_secs {
        return CheckOutcome::pass(format!(
            "Resubmission {elapsed_secs:.1}s after previous record; treated as retry"
        ));
    }

    let speed_kmh = distance / (elapsed_secs / 3600.0);
    tracing::debug!(distance_km = distance, elapsed_secs, speed_kmh, "implied travel speed");

    if speed_kmh > params.velocity_fail_kmh {
        tracing::info!(speed_kmh, distance_km = distance, "impossible travel speed");
        CheckOutcome::fail(format!(
            "Impossible travel speed: {speed_kmh:.0} km/h ({distance:.1} km in {elapsed_secs:.0}s); teleportation detected"
        ))
    } else if speed_kmh > params.velocity_warn_kmh {
        CheckOutcome::pass(format!(
            "High travel speed: {speed_kmh:.0} km/h; consistent with air travel"
        ))
    } else {
        CheckOutcome::pass(format!("Realistic travel speed: {speed_kmh:.1} km/h"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn last_at(lat: f64, lon: f64, millis: i64) -> HistoricalRecord {
        HistoricalRecord {
            latitude: lat,
            longitude: lon,
            verified_timestamp: TimestampMs::new(millis),
        }
    }

    fn assess(last: Option<&HistoricalRecord>, point: GeoPoint, millis: i64) -> CheckOutcome {
        assess_velocity(last, point, TimestampMs::new(millis), &VerificationParams::default())
    }

    #[test]
    fn first_submission_passes() {
        let outcome = assess(None, GeoPoint::new(12.97, 77.59), 1_000);
        assert!(outcome.passed);
        assert_eq!(outcome.message, "First location recorded");
    }

    #[test]
    fn walking_pace_is_realistic() {
        let last = last_at(12.9716, 77.5946, 0);
        // ~1.1 km in 15 minutes.
        let outcome = assess(Some(&last), GeoPoint::new(12.9816, 77.5946), 15 * 60 * 1000);
        assert!(outcome.passed);
        assert!(outcome.message.starts_with("Realistic"));
    }

    #[test]
    fn airliner_speed_is_cautionary() {
        // One degree of latitude (~111 km) in 10 minutes is ~667 km/h.
        let last = last_at(10.0, 77.0, 0);
        let outcome = assess(Some(&last), GeoPoint::new(11.0, 77.0), 10 * 60 * 1000);
        assert!(outcome.passed);
        assert!(outcome.message.contains("air travel"));
    }

    #[test]
    fn teleportation_fails() {
        let last = last_at(10.0, 77.0, 0);
        let outcome = assess(Some(&last), GeoPoint::new(11.0, 77.0), 60 * 1000);
        assert!(!outcome.passed);
        assert!(outcome.message.contains("teleportation"));
        assert!(outcome.message.contains("6672 km/h"), "{}", outcome.message);
    }

    #[test]
    fn sub_second_retry_passes_without_speed() {
        let last = last_at(10.0, 77.0, 5_000);
        let outcome = assess(Some(&last), GeoPoint::new(40.0, -3.0), 5_400);
        assert!(outcome.passed);
        assert!(outcome.message.contains("retry"));
    }

    #[test]
    fn timestamp_before_last_record_counts_as_retry() {
        let last = last_at(10.0, 77.0, 60_000);
        let outcome = assess(Some(&last), GeoPoint::new(40.0, -3.0), 1_000);
        assert!(outcome.passed);
    }

    #[test]
    fn exactly_one_second_computes_a_speed() {
        let last = last_at(10.0, 77.0, 5_000);
        // ~11 m in one second.
        let outcome = assess(Some(&last), GeoPoint::new(10.0001, 77.0), 6_000);
        assert!(outcome.passed);
        assert!(outcome.message.starts_with("Realistic"), "{}", outcome.message);
    }

    /// One hour of travel, so the implied km/h equals the distance in km.
    fn one_hour_hop() -> (HistoricalRecord, GeoPoint, f64) {
        let last = last_at(10.0, 77.0, 0);
        let point = GeoPoint::new(14.5, 77.0);
        let speed_kmh = last.point().distance_km(&point) / (3_600.0 / 3600.0);
        (last, point, speed_kmh)
    }

    #[test]
    fn speed_at_fail_threshold_passes() {
        let (last, point, speed_kmh) = one_hour_hop();
        let params = VerificationParams {
            velocity_fail_kmh: speed_kmh,
            velocity_warn_kmh: 1.0,
            ..VerificationParams::default()
        };
        let outcome = assess_velocity(Some(&last), point, TimestampMs::new(3_600_000), &params);
        assert!(outcome.passed);
        assert!(outcome.message.contains("air travel"));
    }

    #[test]
    fn speed_just_above_fail_threshold_fails() {
        let (last, point, speed_kmh) = one_hour_hop();
        let params = VerificationParams {
            velocity_fail_kmh: speed_kmh - 1e-6,
            ..VerificationParams::default()
        };
        let outcome = assess_velocity(Some(&last), point, TimestampMs::new(3_600_000), &params);
        assert!(!outcome.passed);
        assert!(outcome.message.contains("teleportation"));
    }

    #[test]
    fn speed_at_warn_threshold_is_realistic() {
        let (last, point, speed_kmh) = one_hour_hop();
        let params = VerificationParams {
            velocity_warn_kmh: speed_kmh,
            ..VerificationParams::default()
        };
        let outcome = assess_velocity(Some(&last), point, TimestampMs::new(3_600_000), &params);
        assert!(outcome.passed);
        assert!(outcome.message.starts_with("Realistic"), "{}", outcome.message);
    }
}
