//! Geocoder trait and the query/result types it exchanges.

use geo::Coord;

use super::error::GeocodeError;

/// A single geocoding request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeQuery {
    /// Free-text address to look up.
    pub text: String,
    /// Comma-separated ISO 3166-1 alpha-2 codes restricting the search.
    pub country_codes: Option<String>,
    /// Ask the service for structured address details such as the postcode.
    pub address_details: bool,
}

impl GeocodeQuery {
    /// Create an unrestricted query without address details.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            country_codes: None,
            address_details: false,
        }
    }

    /// Restrict results to the given country codes.
    #[must_use]
    pub fn with_country_codes(mut self, codes: impl Into<String>) -> Self {
        self.country_codes = Some(codes.into());
        self
    }

    /// Request structured address details.
    #[must_use]
    pub fn with_address_details(mut self) -> Self {
        self.address_details = true;
        self
    }
}

/// Best match returned by a geocoder.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedPlace {
    /// Position of the match (`x = longitude`, `y = latitude`).
    pub location: Coord<f64>,
    /// Human-readable description supplied by the service.
    pub display_name: String,
    /// Postal code, when address details were requested and available.
    pub postcode: Option<String>,
}

/// Resolve free text to a location.
///
/// Implementations return `Ok(None)` when the service answered but found no
/// match, and `Err` when the service could not produce an answer at all.
/// Blank queries must be rejected with [`GeocodeError::EmptyQuery`].
///
/// # Examples
///
/// ```rust
/// use geo::Coord;
/// use shelter_core::{GeocodeError, GeocodeQuery, GeocodedPlace, Geocoder};
///
/// struct FixedGeocoder;
///
/// impl Geocoder for FixedGeocoder {
///     fn geocode(&self, query: &GeocodeQuery) -> Result<Option<GeocodedPlace>, GeocodeError> {
///         if query.text.trim().is_empty() {
///             return Err(GeocodeError::EmptyQuery);
///         }
///         Ok(Some(GeocodedPlace {
///             location: Coord { x: -118.2437, y: 34.0522 },
///             display_name: query.text.clone(),
///             postcode: None,
///         }))
///     }
/// }
///
/// let place = FixedGeocoder.geocode(&GeocodeQuery::new("City Hall"))?;
/// assert!(place.is_some());
/// # Ok::<(), GeocodeError>(())
/// ```
pub trait Geocoder {
    /// Look up `query` and return the best match, if any.
    fn geocode(&self, query: &GeocodeQuery) -> Result<Option<GeocodedPlace>, GeocodeError>;
}

impl<G: Geocoder + ?Sized> Geocoder for &G {
    fn geocode(&self, query: &GeocodeQuery) -> Result<Option<GeocodedPlace>, GeocodeError> {
        (**self).geocode(query)
    }
}

impl<G: Geocoder + ?Sized> Geocoder for Box<G> {
    fn geocode(&self, query: &GeocodeQuery) -> Result<Option<GeocodedPlace>, GeocodeError> {
        (**self).geocode(query)
    }
}
