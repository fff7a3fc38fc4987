use proptest::prelude::*;

use worktrust_types::{distance_km, GeoPoint, TimestampMs};

fn latitude() -> impl Strategy<Value = f64> {
    -90.0f64..=90.0
}

fn longitude() -> impl Strategy<Value = f64> {
    -180.0f64..=180.0
}

proptest! {
    /// distance_km(a, b) == distance_km(b, a) within floating-point tolerance.
    #[test]
    fn distance_is_symmetric(
        lat1 in latitude(), lon1 in longitude(),
        lat2 in latitude(), lon2 in longitude(),
    ) {
        let ab = distance_km(lat1, lon1, lat2, lon2);
        let ba = distance_km(lat2, lon2, lat1, lon1);
        prop_assert!((ab - ba).abs() < 1e-6, "ab={} ba={}", ab, ba);
    }

    /// Distance is never negative and never exceeds half the circumference.
    #[test]
    fn distance_is_bounded(
        lat1 in latitude(), lon1 in longitude(),
        lat2 in latitude(), lon2 in longitude(),
    ) {
        let d = distance_km(lat1, lon1, lat2, lon2);
        prop_assert!(d >= 0.0);
        prop_assert!(d <= std::f64::consts::PI * worktrust_types::EARTH_RADIUS_KM + 1e-6);
    }

    /// A point is zero kilometers from itself.
    #[test]
    fn distance_to_self_is_zero(lat in latitude(), lon in longitude()) {
        prop_assert_eq!(distance_km(lat, lon, lat, lon), 0.0);
    }

    /// Every in-range coordinate is a valid GeoPoint.
    #[test]
    fn in_range_points_are_valid(lat in latitude(), lon in longitude()) {
        prop_assert!(GeoPoint::new(lat, lon).is_valid());
    }

    /// seconds_since is the signed millisecond difference scaled to seconds.
    #[test]
    fn timestamp_seconds_since(base in 0i64..1_000_000_000_000, offset in -1_000_000i64..1_000_000) {
        let earlier = TimestampMs::new(base);
        let later = TimestampMs::new(base + offset);
        let expected = offset as f64 / 1000.0;
        prop_assert!((later.seconds_since(earlier) - expected).abs() < 1e-9);
    }
}
