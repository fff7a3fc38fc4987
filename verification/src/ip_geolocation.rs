//! IP geolocation cross-check.
//!
//! Compares the claimed GPS position against the approximate location of the
//! submitter's network origin. Local and private origins cannot be
//! geolocated and are skipped. An unreachable resolver never fails a
//! submission.

use std::time::Duration;

use worktrust_geoip::{classify_origin, OriginAddress, OriginResolver};
use worktrust_types::{distance_km, CheckOutcome, GeoPoint, VerificationParams};

use crate::Assessment;

/// Default bound on a single geolocation lookup.
pub const DEFAULT_GEOIP_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn check_ip_geolocation(
    resolver: &dyn OriginResolver,
    point: GeoPoint,
    origin: &str,
    timeout: Duration,
    params: &VerificationParams,
) -> Assessment {
    let ip = match classify_origin(origin) {
        OriginAddress::Missing => {
            return Assessment::assessed(CheckOutcome::pass(
                "IP geolocation skipped: no origin address",
            ));
        }
        OriginAddress::NonPublic(ip) => {
            return Assessment::assessed(CheckOutcome::pass(format!(
                "IP geolocation skipped: {ip} is a local or private address"
            )));
        }
        OriginAddress::Unparseable(raw) => {
            tracing::warn!(origin = %raw, "origin address is not an IP address");
            return Assessment::unavailable(format!(
                "IP geolocation unavailable: '{raw}' is not an IP address"
            ));
        }
        OriginAddress::Public(ip) => ip,
    };

    let location = match tokio::time::timeout(timeout, resolver.resolve(ip)).await {
        Ok(Ok(location)) => location,
        Ok(Err(e)) => {
            tracing::warn!(%ip, resolver = resolver.name(), error = %e, "IP geolocation lookup failed");
            return Assessment::unavailable(format!("IP geolocation unavailable: {e}"));
        }
        Err(_) => {
            tracing::warn!(
                %ip,
                resolver = resolver.name(),
                timeout_ms = timeout.as_millis() as u64,
                "IP geolocation lookup timed out"
            );
            return Assessment::unavailable(format!(
                "IP geolocation unavailable: lookup timed out after {}ms",
                timeout.as_millis()
            ));
        }
    };

    let d = distance_km(
        point.latitude,
        point.longitude,
        location.latitude,
        location.longitude,
    );
    let place = format!("{}, {}", location.city, location.country);
    tracing::debug!(%ip, distance_km = d, place = %place, "IP geolocation resolved");

    let outcome = if d > params.ip_fail_distance_km {
        tracing::info!(%ip, distance_km = d, "IP location far from GPS");
        CheckOutcome::fail(format!(
            "IP location ({place}) is {d:.0} km from GPS position; possible VPN or location spoofing"
        ))
    } else if d > params.ip_warn_distance_km {
        CheckOutcome::pass(format!(
            "IP location ({place}) is {d:.0} km from GPS position; within mobile network routing range"
        ))
    } else {
        CheckOutcome::pass(format!("IP location matches GPS position ({place}, {d:.1} km)"))
    };
    Assessment::assessed(outcome)
}
