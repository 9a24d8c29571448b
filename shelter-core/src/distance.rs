//! Great-circle distances on a spherical Earth.

use geo::Coord;

/// Mean Earth radius used by the haversine formula, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres between two latitude/longitude pairs.
///
/// The intermediate `a` term is clamped to `[0, 1]` so rounding overshoot on
/// near-antipodal or coincident points cannot produce `NaN`.
///
/// # Examples
///
/// ```
/// use shelter_core::distance_km;
///
/// let d = distance_km(33.7701, -118.1937, 34.0522, -118.2437);
/// assert!((d - 31.71).abs() < 0.1);
/// assert_eq!(distance_km(34.0, -118.0, 34.0, -118.0), 0.0);
/// ```
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = (lat2 - lat1).to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Whether `location` is a finite WGS84 position.
///
/// Latitude (`y`) must lie in `[-90, 90]` and longitude (`x`) in
/// `[-180, 180]`.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use shelter_core::is_valid_location;
///
/// assert!(is_valid_location(Coord { x: -118.1937, y: 33.7701 }));
/// assert!(!is_valid_location(Coord { x: -118.0, y: 95.0 }));
/// assert!(!is_valid_location(Coord { x: f64::NAN, y: 34.0 }));
/// ```
pub fn is_valid_location(location: Coord<f64>) -> bool {
    let Coord { x: lon, y: lat } = location;
    lat.is_finite()
        && lon.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lon)
}

/// Haversine distance in kilometres between two coordinates.
///
/// Coordinates follow the `x = longitude`, `y = latitude` convention.
pub fn distance_between(from: Coord<f64>, to: Coord<f64>) -> f64 {
    distance_km(from.y, from.x, to.y, to.x)
}
