//! Origin address normalisation and classification.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

/// What the network-layer origin of a submission looks like.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OriginAddress {
    /// No address was supplied.
    Missing,
    /// Loopback, private, link-local or otherwise not geolocatable.
    NonPublic(IpAddr),
    /// A publicly routable address worth resolving.
    Public(IpAddr),
    /// Something that is not an IP address at all.
    Unparseable(String),
}

/// Normalise and classify a raw origin string.
///
/// Accepts bare IPv4/IPv6, `ip:port`, `[ipv6]:port`, `[ipv6]`, and
/// IPv4-mapped IPv6 (`::ffff:a.b.c.d`), which is unwrapped to IPv4.
pub fn classify_origin(raw: &str) -> OriginAddress {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return OriginAddress::Missing;
    }

    let Some(ip) = parse_ip(trimmed) else {
        return OriginAddress::Unparseable(trimmed.to_string());
    };
    let ip = unwrap_mapped(ip);

    if is_public_ip(ip) {
        OriginAddress::Public(ip)
    } else {
        OriginAddress::NonPublic(ip)
    }
}

fn parse_ip(s: &str) -> Option<IpAddr> {
    if let Ok(ip) = s.parse::<IpAddr>() {
        return Some(ip);
    }
    if let Ok(sock) = s.parse::<SocketAddr>() {
        return Some(sock.ip());
    }
    s.strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .and_then(|inner| inner.parse::<IpAddr>().ok())
}

fn unwrap_mapped(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V6(v6) => v6
            .to_ipv4_mapped()
            .map(IpAddr::V4)
            .unwrap_or(IpAddr::V6(v6)),
        v4 => v4,
    }
}

/// Check if an address is publicly routable and therefore geolocatable.
pub fn is_public_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_public_ipv4(v4),
        IpAddr::V6(v6) => is_public_ipv6(v6),
    }
}

fn is_public_ipv4(ip: Ipv4Addr) -> bool {
    let octets = ip.octets();
    !ip.is_private()
        && !ip.is_loopback()
        && !ip.is_link_local()
        && !ip.is_broadcast()
        && !ip.is_unspecified()
        && !ip.is_documentation()
        && !ip.is_multicast()
        // 0.0.0.0/8 ("this network")
        && octets[0] != 0
        // 100.64.0.0/10 (Carrier-Grade NAT)
        && !(octets[0] == 100 && (octets[1] & 0xC0) == 64)
}

fn is_public_ipv6(ip: Ipv6Addr) -> bool {
    let segments = ip.segments();
    !ip.is_loopback()
        && !ip.is_unspecified()
        && !ip.is_multicast()
        // fc00::/7 (unique local)
        && (segments[0] & 0xfe00) != 0xfc00
        // fe80::/10 (link-local)
        && (segments[0] & 0xffc0) != 0xfe80
        // 2001:db8::/32 (documentation)
        && !(segments[0] == 0x2001 && segments[1] == 0x0db8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v4(a: u8, b: u8, c: u8, d: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(a, b, c, d))
    }

    #[test]
    fn empty_and_blank_are_missing() {
        assert_eq!(classify_origin(""), OriginAddress::Missing);
        assert_eq!(classify_origin("   "), OriginAddress::Missing);
    }

    #[test]
    fn loopback_and_private_are_non_public() {
        for raw in ["127.0.0.1", "::1", "10.1.2.3", "172.16.0.9", "192.168.1.20"] {
            assert!(
                matches!(classify_origin(raw), OriginAddress::NonPublic(_)),
                "{raw} should be non-public"
            );
        }
    }

    #[test]
    fn cgnat_link_local_and_unique_local_are_non_public() {
        for raw in ["100.64.0.1", "169.254.10.10", "fd12:3456::1", "fe80::1", "0.0.0.0"] {
            assert!(
                matches!(classify_origin(raw), OriginAddress::NonPublic(_)),
                "{raw} should be non-public"
            );
        }
    }

    #[test]
    fn public_addresses_are_public() {
        assert_eq!(classify_origin("8.8.8.8"), OriginAddress::Public(v4(8, 8, 8, 8)));
        assert!(matches!(
            classify_origin("2606:4700:4700::1111"),
            OriginAddress::Public(IpAddr::V6(_))
        ));
    }

    #[test]
    fn mapped_ipv6_is_unwrapped() {
        assert_eq!(
            classify_origin("::ffff:127.0.0.1"),
            OriginAddress::NonPublic(v4(127, 0, 0, 1))
        );
        assert_eq!(
            classify_origin("::ffff:1.1.1.1"),
            OriginAddress::Public(v4(1, 1, 1, 1))
        );
    }

    #[test]
    fn ports_and_brackets_are_stripped() {
        assert_eq!(
            classify_origin("1.1.1.1:443"),
            OriginAddress::Public(v4(1, 1, 1, 1))
        );
        assert!(matches!(
            classify_origin("[::1]:8080"),
            OriginAddress::NonPublic(_)
        ));
        assert!(matches!(classify_origin("[::1]"), OriginAddress::NonPublic(_)));
    }

    #[test]
    fn garbage_is_unparseable() {
        assert_eq!(
            classify_origin(" not-an-ip "),
            OriginAddress::Unparseable("not-an-ip".to_string())
        );
    }
}
