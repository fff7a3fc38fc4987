//! Sensor plausibility check.

use worktrust_types::{CheckOutcome, SensorReadings, VerificationParams};

/// Flag physically impossible altitude or speed readings.
///
/// Every violated field is listed in the failure message.
pub fn check_sensors(
    sensors: Option<&SensorReadings>,
    params: &VerificationParams,
) -> CheckOutcome {
    let Some(sensors) = sensors.filter(|s| !s.is_empty()) else {
        return CheckOutcome::pass("Sensor data unavailable");
    };

    let mut violations = Vec::new();
    if let Some(altitude) = sensors.altitude {
        if altitude < params.min_altitude_m || altitude > params.max_altitude_m {
            violations.push(format!(
                "altitude {altitude} m outside [{}, {}] m",
                params.min_altitude_m, params.max_altitude_m
            ));
        }
    }
    if let Some(speed) = sensors.speed {
        if speed < 0.0 {
            violations.push(format!("negative speed {speed} m/s"));
        }
    }

    if violations.is_empty() {
        CheckOutcome::pass("Sensor readings plausible")
    } else {
        tracing::info!(violations = violations.len(), "implausible sensor readings");
        CheckOutcome::fail(format!(
            "Implausible sensor readings: {}",
            violations.join("; ")
        ))
    }
}
