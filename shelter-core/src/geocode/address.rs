//! Address heuristics layered over a [`Geocoder`].

use geo::Coord;
use log::{debug, warn};

use super::{GeocodeError, GeocodeQuery, Geocoder};
use crate::is_valid_location;

/// Suffix appended to addresses that name neither the state nor the country.
pub const DEFAULT_REGION_SUFFIX: &str = ", Los Angeles County, CA, USA";

/// Country the user-facing lookups are restricted to.
pub const DEFAULT_COUNTRY_CODE: &str = "us";

/// Result of resolving a user-supplied address.
#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeOutcome {
    /// The address resolved to a location.
    Found(Coord<f64>),
    /// The service answered but had no match, or the input was blank.
    NotFound,
    /// The service failed or timed out.
    ServiceError(GeocodeError),
}

impl GeocodeOutcome {
    /// The resolved location, if any.
    pub fn location(&self) -> Option<Coord<f64>> {
        match self {
            Self::Found(location) => Some(*location),
            Self::NotFound | Self::ServiceError(_) => None,
        }
    }
}

/// Resolves user addresses through a [`Geocoder`].
///
/// Addresses that mention neither `"CA"` nor `"USA"` (case-insensitive) get
/// [`DEFAULT_REGION_SUFFIX`] appended before the lookup, and every lookup is
/// restricted to [`DEFAULT_COUNTRY_CODE`]. A failed call is never retried.
///
/// # Examples
///
/// ```
/// use shelter_core::{AddressResolver, GeocodeError, GeocodeQuery, GeocodedPlace, Geocoder};
///
/// struct NoMatch;
///
/// impl Geocoder for NoMatch {
///     fn geocode(&self, _: &GeocodeQuery) -> Result<Option<GeocodedPlace>, GeocodeError> {
///         Ok(None)
///     }
/// }
///
/// let resolver = AddressResolver::new(NoMatch);
/// assert_eq!(
///     resolver.disambiguate("4000 E Anaheim St"),
///     "4000 E Anaheim St, Los Angeles County, CA, USA",
/// );
/// assert!(resolver.resolve("4000 E Anaheim St").location().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct AddressResolver<G> {
    geocoder: G,
    region_suffix: String,
    country_code: String,
}

impl<G: Geocoder> AddressResolver<G> {
    /// Wrap `geocoder` with the default region suffix and country.
    pub fn new(geocoder: G) -> Self {
        Self {
            geocoder,
            region_suffix: DEFAULT_REGION_SUFFIX.to_owned(),
            country_code: DEFAULT_COUNTRY_CODE.to_owned(),
        }
    }

    /// Override the suffix appended to under-specified addresses.
    #[must_use]
    pub fn with_region_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.region_suffix = suffix.into();
        self
    }

    /// Override the country restriction.
    #[must_use]
    pub fn with_country_code(mut self, code: impl Into<String>) -> Self {
        self.country_code = code.into();
        self
    }

    /// The wrapped geocoder.
    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    /// Return the text actually sent to the geocoder for `address`.
    pub fn disambiguate(&self, address: &str) -> String {
        let trimmed = address.trim();
        let upper = trimmed.to_uppercase();
        if upper.contains("CA") || upper.contains("USA") {
            trimmed.to_owned()
        } else {
            format!("{trimmed}{}", self.region_suffix)
        }
    }

    /// Resolve `address` to a location.
    ///
    /// Blank input yields [`GeocodeOutcome::NotFound`] without calling the
    /// geocoder. A match outside the WGS84 ranges also counts as not found.
    pub fn resolve(&self, address: &str) -> GeocodeOutcome {
        if address.trim().is_empty() {
            return GeocodeOutcome::NotFound;
        }
        let query = GeocodeQuery::new(self.disambiguate(address))
            .with_country_codes(self.country_code.clone());
        match self.geocoder.geocode(&query) {
            Ok(Some(place)) if is_valid_location(place.location) => {
                debug!(
                    "resolved {:?} to ({}, {})",
                    query.text, place.location.y, place.location.x
                );
                GeocodeOutcome::Found(place.location)
            }
            Ok(Some(place)) => {
                warn!(
                    "discarding unusable geocoded location ({}, {})",
                    place.location.y, place.location.x
                );
                GeocodeOutcome::NotFound
            }
            Ok(None) => GeocodeOutcome::NotFound,
            Err(err) => {
                warn!("address geocoding failed");
                debug!("geocoding {:?} failed: {err}", query.text);
                GeocodeOutcome::ServiceError(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubGeocoder;
    use rstest::rstest;

    const USER: Coord<f64> = Coord {
        x: -118.1937,
        y: 33.7701,
    };

    #[rstest]
    #[case("4000 E Anaheim St", "4000 E Anaheim St, Los Angeles County, CA, USA")]
    #[case("  4000 E Anaheim St  ", "4000 E Anaheim St, Los Angeles County, CA, USA")]
    #[case("4000 E Anaheim St, Long Beach, CA", "4000 E Anaheim St, Long Beach, CA")]
    #[case("123 Main St, usa", "123 Main St, usa")]
    #[case("100 Carson St", "100 Carson St")]
    fn disambiguate_appends_suffix_only_when_needed(#[case] input: &str, #[case] expected: &str) {
        let resolver = AddressResolver::new(StubGeocoder::not_found());
        assert_eq!(resolver.disambiguate(input), expected);
    }

    #[rstest]
    fn resolve_sends_disambiguated_us_query() {
        let resolver = AddressResolver::new(StubGeocoder::found(USER));

        let outcome = resolver.resolve("4000 E Anaheim St");

        assert_eq!(outcome, GeocodeOutcome::Found(USER));
        let queries = resolver.geocoder().queries();
        assert_eq!(queries.len(), 1);
        assert_eq!(
            queries[0].text,
            "4000 E Anaheim St, Los Angeles County, CA, USA"
        );
        assert_eq!(queries[0].country_codes.as_deref(), Some("us"));
    }

    #[rstest]
    fn resolve_maps_service_failure() {
        let error = GeocodeError::Timeout {
            url: "http://geocoder.test/search".to_owned(),
            timeout_secs: 10,
        };
        let resolver = AddressResolver::new(StubGeocoder::failing(error.clone()));

        assert_eq!(
            resolver.resolve("Main St"),
            GeocodeOutcome::ServiceError(error)
        );
        assert_eq!(resolver.geocoder().queries().len(), 1, "no retries");
    }

    #[rstest]
    #[case::nan(f64::NAN, f64::NAN)]
    #[case::infinite(34.0, f64::INFINITY)]
    #[case::latitude_out_of_range(95.0, -118.0)]
    #[case::longitude_out_of_range(34.0, -190.0)]
    fn resolve_rejects_unusable_locations(#[case] lat: f64, #[case] lon: f64) {
        let resolver = AddressResolver::new(StubGeocoder::found(Coord { x: lon, y: lat }));

        assert_eq!(resolver.resolve("4000 E Anaheim St"), GeocodeOutcome::NotFound);
    }

    #[rstest]
    fn resolve_skips_geocoder_for_blank_input() {
        let resolver = AddressResolver::new(StubGeocoder::found(USER));

        assert_eq!(resolver.resolve("   "), GeocodeOutcome::NotFound);
        assert!(resolver.geocoder().queries().is_empty());
    }

    #[rstest]
    fn overrides_apply() {
        let resolver = AddressResolver::new(StubGeocoder::found(USER))
            .with_region_suffix(", Orange County, CA")
            .with_country_code("us,mx");

        let _outcome = resolver.resolve("1 Main St");

        let queries = resolver.geocoder().queries();
        assert_eq!(queries[0].text, "1 Main St, Orange County, CA");
        assert_eq!(queries[0].country_codes.as_deref(), Some("us,mx"));
    }
}
