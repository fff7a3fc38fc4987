//! The client-submitted evidence bundle.
//!
//! A bundle is immutable once received. The verification core never trusts
//! it: every field is treated as a claim to be cross-checked server-side.

use crate::{EvidenceError, GeoPoint, TimestampMs};
use serde::{Deserialize, Serialize};

/// Proof-of-work evidence: a photo reference, a GPS fix, optional device
/// readings, and a client-computed integrity digest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceBundle {
    pub latitude: f64,
    pub longitude: f64,
    /// Claimed capture instant.
    pub timestamp: TimestampMs,
    /// GPS-reported horizontal accuracy in meters.
    pub accuracy: f64,
    /// The platform flagged the location provider as mock/developer-injected.
    #[serde(default)]
    pub is_mocked: bool,
    /// Cell/Wi-Fi derived position, independent of GPS.
    #[serde(default)]
    pub network_location: Option<NetworkLocation>,
    #[serde(default)]
    pub sensors: Option<SensorReadings>,
    /// Client digest over the photo bytes and the fields above. Opaque here.
    pub client_hash: String,
    /// Handle to the captured image. Never interpreted by the verification core.
    pub photo_reference: String,
}

/// Coarse position from cellular or Wi-Fi infrastructure.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: f64,
}

/// Device sensor readings captured alongside the GPS fix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorReadings {
    /// Meters above sea level.
    #[serde(default)]
    pub altitude: Option<f64>,
    /// Degrees from true north.
    #[serde(default)]
    pub heading: Option<f64>,
    /// Ground speed in m/s.
    #[serde(default)]
    pub speed: Option<f64>,
}

impl NetworkLocation {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

impl EvidenceBundle {
    /// The claimed GPS position.
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// Reject malformed bundles before any check runs.
    pub fn validate(&self) -> Result<(), EvidenceError> {
        validate_point(self.latitude, self.longitude)?;

        if !self.accuracy.is_finite() || self.accuracy < 0.0 {
            return Err(EvidenceError::InvalidAccuracy(self.accuracy));
        }
        if self.timestamp.as_millis() <= 0 {
            return Err(EvidenceError::InvalidTimestamp(self.timestamp.as_millis()));
        }
        if self.client_hash.trim().is_empty() {
            return Err(EvidenceError::MissingField("clientHash"));
        }
        if self.photo_reference.trim().is_empty() {
            return Err(EvidenceError::MissingField("photoReference"));
        }

        if let Some(network) = &self.network_location {
            validate_point(network.latitude, network.longitude)
                .map_err(|e| EvidenceError::InvalidNetworkLocation(e.to_string()))?;
            if !network.accuracy.is_finite() || network.accuracy < 0.0 {
                return Err(EvidenceError::InvalidNetworkLocation(format!(
                    "accuracy {} must be finite and non-negative",
                    network.accuracy
                )));
            }
        }

        if let Some(sensors) = &self.sensors {
            sensors.validate()?;
        }

        Ok(())
    }
}

impl SensorReadings {
    /// Whether no reading at all was captured.
    pub fn is_empty(&self) -> bool {
        self.altitude.is_none() && self.heading.is_none() && self.speed.is_none()
    }

    fn validate(&self) -> Result<(), EvidenceError> {
        let fields = [
            ("altitude", self.altitude),
            ("heading", self.heading),
            ("speed", self.speed),
        ];
        for (name, value) in fields {
            if value.is_some_and(|v| !v.is_finite()) {
                return Err(EvidenceError::NonFiniteSensor(name));
            }
        }
        Ok(())
    }
}

fn validate_point(latitude: f64, longitude: f64) -> Result<(), EvidenceError> {
    if !GeoPoint::is_valid_latitude(latitude) {
        return Err(EvidenceError::LatitudeOutOfRange(latitude));
    }
    if !GeoPoint::is_valid_longitude(longitude) {
        return Err(EvidenceError::LongitudeOutOfRange(longitude));
    }
    Ok(())
}
