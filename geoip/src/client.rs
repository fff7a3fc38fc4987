//! HTTP resolver for ip-api.com–compatible JSON geolocation services.

use crate::{GeoIpError, OriginLocation, OriginResolver};

use async_trait::async_trait;
use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;

/// Default public endpoint (free tier, HTTP only).
pub const DEFAULT_ENDPOINT: &str = "http://ip-api.com/json";

/// Default timeout for a whole lookup.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Fields requested from the service; keeps responses small.
const FIELDS: &str = "status,message,lat,lon,city,country";

/// Resolves addresses via `GET {endpoint}/{ip}?fields=...`.
///
/// The API contract: `{"status": "success", "lat": f64, "lon": f64,
/// "city": str, "country": str}` on success, `{"status": "fail",
/// "message": str}` otherwise.
pub struct IpApiResolver {
    endpoint: String,
    http_client: reqwest::Client,
}

/// Raw JSON response from the geolocation endpoint.
#[derive(Debug, Deserialize)]
struct LookupResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

impl IpApiResolver {
    /// Resolver for the public ip-api.com endpoint with default timeouts.
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT, DEFAULT_TIMEOUT)
    }

    /// Resolver for a custom endpoint and overall request timeout.
    pub fn with_endpoint(endpoint: &str, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT.min(timeout))
            .build()
            .unwrap_or_default();
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            http_client,
        }
    }

    fn lookup_url(&self, ip: IpAddr) -> String {
        format!("{}/{}?fields={}", self.endpoint, ip, FIELDS)
    }
}

impl Default for IpApiResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OriginResolver for IpApiResolver {
    async fn resolve(&self, ip: IpAddr) -> Result<OriginLocation, GeoIpError> {
        let url = self.lookup_url(ip);

        let response = self.http_client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                GeoIpError::Unreachable(format!("request timed out: {e}"))
            } else if e.is_connect() {
                GeoIpError::Unreachable(format!("connection failed: {e}"))
            } else {
                GeoIpError::RequestFailed(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(GeoIpError::RequestFailed(format!(
                "HTTP status {}",
                response.status()
            )));
        }

        let body: LookupResponse = response.json().await.map_err(|e| {
            GeoIpError::InvalidResponse(format!("failed to parse lookup response: {e}"))
        })?;

        tracing::debug!(%ip, status = %body.status, "geolocation lookup answered");
        into_location(ip, body)
    }

    fn name(&self) -> &str {
        "ip-api"
    }
}

fn into_location(ip: IpAddr, body: LookupResponse) -> Result<OriginLocation, GeoIpError> {
    if body.status != "success" {
        return Err(GeoIpError::LookupFailed {
            address: ip.to_string(),
            reason: body.message.unwrap_or_else(|| body.status.clone()),
        });
    }

    match (body.lat, body.lon) {
        (Some(latitude), Some(longitude)) if latitude.is_finite() && longitude.is_finite() => {
            Ok(OriginLocation {
                latitude,
                longitude,
                city: body.city.unwrap_or_else(|| "unknown city".to_string()),
                country: body.country.unwrap_or_else(|| "unknown country".to_string()),
            })
        }
        _ => Err(GeoIpError::InvalidResponse(
            "successful lookup without coordinates".to_string(),
        )),
    }
}
