//! IP-geolocation for submission origins.
//!
//! The verification core cross-checks a claimed GPS fix against where the
//! submitting connection appears to come from. This crate owns both halves
//! of that outbound boundary:
//! - classifying the raw origin address (missing, local/private, public), and
//! - resolving a public address to an approximate location through a
//!   pluggable [`OriginResolver`].
//!
//! Resolution is best-effort. Callers must treat every error as "unavailable",
//! never as evidence against the submission.

pub mod client;
pub mod error;
pub mod origin;
pub mod resolver;

pub use client::IpApiResolver;
pub use error::GeoIpError;
pub use origin::{classify_origin, is_public_ip, OriginAddress};
pub use resolver::{OriginLocation, OriginResolver};
