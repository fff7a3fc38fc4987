//! The narrow resolution interface the verification core depends on.

use crate::GeoIpError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Approximate location of a network address.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OriginLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub country: String,
}

/// Resolves a public IP address to an approximate location.
///
/// Implementations are best-effort and may be slow or unreachable; callers
/// bound every call with their own timeout.
#[async_trait]
pub trait OriginResolver: Send + Sync {
    async fn resolve(&self, ip: IpAddr) -> Result<OriginLocation, GeoIpError>;

    /// Human-readable name of this resolver, for logs.
    fn name(&self) -> &str;
}
