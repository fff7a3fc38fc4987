//! Nullable origin resolver: scripted geolocation answers for testing.

use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use worktrust_geoip::{GeoIpError, OriginLocation, OriginResolver};

#[derive(Clone)]
enum Behaviour {
    Located(OriginLocation),
    Unavailable,
    Hang,
}

/// A scripted [`OriginResolver`].
///
/// Answers every lookup with the configured behaviour and counts calls so
/// tests can assert that non-public origins never reach the resolver.
pub struct NullResolver {
    behaviour: Mutex<Behaviour>,
    calls: AtomicUsize,
}

impl NullResolver {
    /// Every lookup resolves to the given coordinates.
    pub fn located(latitude: f64, longitude: f64, city: &str, country: &str) -> Self {
        Self::with(Behaviour::Located(OriginLocation {
            latitude,
            longitude,
            city: city.to_string(),
            country: country.to_string(),
        }))
    }

    /// Every lookup fails as if the service were down.
    pub fn unavailable() -> Self {
        Self::with(Behaviour::Unavailable)
    }

    /// Every lookup hangs until the caller's timeout fires.
    pub fn hanging() -> Self {
        Self::with(Behaviour::Hang)
    }

    fn with(behaviour: Behaviour) -> Self {
        Self {
            behaviour: Mutex::new(behaviour),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of lookups attempted so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OriginResolver for NullResolver {
    async fn resolve(&self, ip: IpAddr) -> Result<OriginLocation, GeoIpError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let behaviour = self.behaviour.lock().unwrap().clone();
        match behaviour {
            Behaviour::Located(location) => Ok(location),
            Behaviour::Unavailable => Err(GeoIpError::Unreachable(format!(
                "null resolver offline for {ip}"
            ))),
            Behaviour::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(GeoIpError::Unreachable("null resolver hung".into()))
            }
        }
    }

    fn name(&self) -> &str {
        "null"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    const IP: IpAddr = IpAddr::V4(Ipv4Addr::new(1, 1, 1, 1));

    #[tokio::test]
    async fn located_answers_and_counts() {
        let resolver = NullResolver::located(12.97, 77.59, "Bengaluru", "India");
        let loc = resolver.resolve(IP).await.unwrap();
        assert_eq!(loc.city, "Bengaluru");
        assert_eq!(resolver.calls(), 1);
    }

    #[tokio::test]
    async fn unavailable_fails() {
        let resolver = NullResolver::unavailable();
        assert!(resolver.resolve(IP).await.is_err());
        assert_eq!(resolver.calls(), 1);
    }
}
