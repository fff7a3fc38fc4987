use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeoIpError {
    #[error("geolocation service unreachable: {0}")]
    Unreachable(String),

    #[error("geolocation request failed: {0}")]
    RequestFailed(String),

    #[error("invalid response from geolocation service: {0}")]
    InvalidResponse(String),

    #[error("geolocation lookup failed for {address}: {reason}")]
    LookupFailed { address: String, reason: String },
}
