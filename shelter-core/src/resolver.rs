//! Nearest-shelter lookup.
//!
//! The resolver geocodes the address, scores every registry entry with the
//! haversine distance and returns the closest one. The registry is small, so
//! the scan is linear.

use geo::Coord;
use log::debug;
use thiserror::Error;

use crate::{
    AddressResolver, GeocodeOutcome, Geocoder, ShelterRecord, ShelterRegistry, distance_between,
};

/// Hint returned when an address could not be located.
pub const ADDRESS_NOT_FOUND_HINT: &str =
    "Indirizzo non trovato. Prova ad inserire anche la Città o il CAP.";

/// Errors raised before any lookup is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NearestError {
    /// The address was empty or only whitespace.
    #[error("address must not be blank")]
    BlankAddress,
}

/// The closest shelter to a user location.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestShelter {
    /// Shelter name.
    pub name: String,
    /// `"address, city"`.
    pub address: String,
    /// Great-circle distance in kilometres, rounded to two decimals.
    pub distance_km: f64,
    /// Shelter position.
    pub shelter_location: Coord<f64>,
    /// Geocoded user position.
    pub user_location: Coord<f64>,
}

/// Result of a nearest-shelter lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum NearestOutcome {
    /// A shelter was found.
    Found(NearestShelter),
    /// The address could not be geocoded.
    AddressNotFound {
        /// Message suggesting how to refine the address.
        hint: &'static str,
    },
}

/// Closest registry entry to `user` and its unrounded distance.
///
/// Records at a non-finite distance are skipped, so `None` is returned when
/// no record has a finite distance to `user`. Ties keep the earliest record.
pub fn nearest_to(registry: &ShelterRegistry, user: Coord<f64>) -> Option<(&ShelterRecord, f64)> {
    registry
        .records()
        .iter()
        .filter_map(|record| {
            let d = distance_between(user, record.location);
            d.is_finite().then_some((record, d))
        })
        .fold(None, |best, (record, d)| match best {
            Some((_, best_d)) if best_d <= d => best,
            _ => Some((record, d)),
        })
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Find the shelter closest to `address`.
///
/// # Errors
///
/// Returns [`NearestError::BlankAddress`] when `address` is blank; the
/// geocoder is not called in that case. Geocoding failures are not errors:
/// they produce [`NearestOutcome::AddressNotFound`].
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use shelter_core::{
///     AddressResolver, GeocodeError, GeocodeQuery, GeocodedPlace, Geocoder, NearestOutcome,
///     ShelterRecord, ShelterRegistry, find_nearest,
/// };
///
/// struct CityHall;
///
/// impl Geocoder for CityHall {
///     fn geocode(&self, _: &GeocodeQuery) -> Result<Option<GeocodedPlace>, GeocodeError> {
///         Ok(Some(GeocodedPlace {
///             location: Coord { x: -118.2437, y: 34.0522 },
///             display_name: "City Hall".into(),
///             postcode: None,
///         }))
///     }
/// }
///
/// let registry = ShelterRegistry::new(vec![ShelterRecord::new(
///     "Long Beach Animal Care",
///     "7700 E Spring St",
///     "Long Beach",
///     Coord { x: -118.1937, y: 33.7701 },
/// )])?;
/// let outcome = find_nearest(&AddressResolver::new(CityHall), &registry, "200 N Spring St")?;
/// let NearestOutcome::Found(shelter) = outcome else { panic!("expected a shelter") };
/// assert_eq!(shelter.distance_km, 31.71);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn find_nearest<G: Geocoder>(
    addresses: &AddressResolver<G>,
    registry: &ShelterRegistry,
    address: &str,
) -> Result<NearestOutcome, NearestError> {
    if address.trim().is_empty() {
        return Err(NearestError::BlankAddress);
    }
    let user = match addresses.resolve(address) {
        GeocodeOutcome::Found(location) => location,
        GeocodeOutcome::NotFound | GeocodeOutcome::ServiceError(_) => {
            debug!("no location for address {:?}", address.trim());
            return Ok(NearestOutcome::AddressNotFound {
                hint: ADDRESS_NOT_FOUND_HINT,
            });
        }
    };
    let Some((record, distance)) = nearest_to(registry, user) else {
        return Ok(NearestOutcome::AddressNotFound {
            hint: ADDRESS_NOT_FOUND_HINT,
        });
    };
    debug!("nearest shelter to {:?} is {} at {distance:.3} km", address.trim(), record.name);
    Ok(NearestOutcome::Found(NearestShelter {
        name: record.name.clone(),
        address: record.display_address(),
        distance_km: round_to_hundredths(distance),
        shelter_location: record.location,
        user_location: user,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeocodeError;
    use crate::test_support::{StubGeocoder, shelter_north_of};
    use rstest::{fixture, rstest};

    const USER: Coord<f64> = Coord {
        x: -118.1937,
        y: 33.7701,
    };

    #[fixture]
    fn registry() -> ShelterRegistry {
        ShelterRegistry::new(vec![
            shelter_north_of(USER, 5.0, "five"),
            shelter_north_of(USER, 1.0, "one"),
            shelter_north_of(USER, 10.0, "ten"),
        ])
        .expect("registry should build")
    }

    #[rstest]
    fn picks_the_closest_shelter(registry: ShelterRegistry) {
        let resolver = AddressResolver::new(StubGeocoder::found(USER));

        let outcome = find_nearest(&resolver, &registry, "4000 E Anaheim St").expect("lookup");

        let NearestOutcome::Found(found) = outcome else {
            panic!("expected a shelter, got {outcome:?}");
        };
        assert_eq!(found.name, "one");
        assert_eq!(found.address, "one Street, Long Beach");
        assert_eq!(found.distance_km, 1.0);
        assert_eq!(found.user_location, USER);
    }

    #[rstest]
    fn ties_keep_registry_order() {
        let registry = ShelterRegistry::new(vec![
            shelter_north_of(USER, 2.0, "first"),
            shelter_north_of(USER, 2.0, "second"),
        ])
        .expect("registry should build");

        let (record, _) = nearest_to(&registry, USER).expect("non-empty registry");
        assert_eq!(record.name, "first");
    }

    #[rstest]
    fn nan_user_location_matches_nothing(registry: ShelterRegistry) {
        let user = Coord {
            x: f64::NAN,
            y: f64::NAN,
        };
        assert_eq!(nearest_to(&registry, user), None);
    }

    #[rstest]
    #[case::nan(f64::NAN, f64::NAN)]
    #[case::latitude_out_of_range(95.0, -118.0)]
    fn unusable_geocoded_location_yields_hint(
        registry: ShelterRegistry,
        #[case] lat: f64,
        #[case] lon: f64,
    ) {
        let resolver = AddressResolver::new(StubGeocoder::found(Coord { x: lon, y: lat }));

        let outcome = find_nearest(&resolver, &registry, "4000 E Anaheim St").expect("lookup");

        assert_eq!(
            outcome,
            NearestOutcome::AddressNotFound {
                hint: ADDRESS_NOT_FOUND_HINT
            }
        );
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_address_is_rejected_before_geocoding(
        registry: ShelterRegistry,
        #[case] address: &str,
    ) {
        let resolver = AddressResolver::new(StubGeocoder::found(USER));

        let err = find_nearest(&resolver, &registry, address).expect_err("blank address");

        assert_eq!(err, NearestError::BlankAddress);
        assert!(resolver.geocoder().queries().is_empty());
    }

    #[rstest]
    #[case::missing(StubGeocoder::not_found())]
    #[case::failing(StubGeocoder::failing(GeocodeError::NetworkError {
        url: "http://geocoder.test/search".to_owned(),
        message: "connection refused".to_owned(),
    }))]
    fn unresolved_address_yields_hint(registry: ShelterRegistry, #[case] stub: StubGeocoder) {
        let resolver = AddressResolver::new(stub);

        let outcome = find_nearest(&resolver, &registry, "Nowhere Rd").expect("lookup");

        assert_eq!(
            outcome,
            NearestOutcome::AddressNotFound {
                hint: ADDRESS_NOT_FOUND_HINT
            }
        );
    }

    #[rstest]
    #[case(31.705_620_794, 31.71)]
    #[case(0.004, 0.0)]
    #[case(12.345_1, 12.35)]
    fn distances_round_to_hundredths(#[case] raw: f64, #[case] expected: f64) {
        assert!((round_to_hundredths(raw) - expected).abs() < 1e-12);
    }
}
