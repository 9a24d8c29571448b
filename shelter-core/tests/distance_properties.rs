//! Property-based tests for the haversine distance engine.

use proptest::prelude::*;
use shelter_core::{EARTH_RADIUS_KM, distance_km};

fn latitude() -> impl Strategy<Value = f64> {
    -90.0f64..=90.0
}

fn longitude() -> impl Strategy<Value = f64> {
    -180.0f64..=180.0
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// A point is zero kilometres from itself.
    #[test]
    fn distance_to_self_is_zero(lat in latitude(), lon in longitude()) {
        prop_assert_eq!(distance_km(lat, lon, lat, lon), 0.0);
    }

    /// Swapping the endpoints does not change the distance.
    #[test]
    fn distance_is_symmetric(
        lat1 in latitude(),
        lon1 in longitude(),
        lat2 in latitude(),
        lon2 in longitude(),
    ) {
        let there = distance_km(lat1, lon1, lat2, lon2);
        let back = distance_km(lat2, lon2, lat1, lon1);
        prop_assert!((there - back).abs() < 1e-6, "{there} != {back}");
    }

    /// Distances are non-negative and never exceed half the circumference.
    #[test]
    fn distance_is_bounded(
        lat1 in latitude(),
        lon1 in longitude(),
        lat2 in latitude(),
        lon2 in longitude(),
    ) {
        let d = distance_km(lat1, lon1, lat2, lon2);
        prop_assert!(d >= 0.0);
        prop_assert!(d <= EARTH_RADIUS_KM * std::f64::consts::PI + 1e-6);
    }
}
