//! Process-wide lookup context.
//!
//! [`ShelterContext`] bundles the shelter registry, the street index, the
//! geocode cache and the address resolver. It is built once at start-up and
//! shared (usually behind an `Arc`) by every request.

use log::{debug, warn};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    AddressResolver, CachedGeocode, GeocodeCache, GeocodeError, GeocodeOutcome, GeocodeQuery,
    Geocoder, NearestError, NearestOutcome, ShelterRegistry, StreetEntry, StreetIndex,
    is_valid_location,
};

/// Street-geocoding request.
///
/// Either `q` holds free text, or `name` is combined with the optional city
/// and state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StreetQuery {
    /// Free-text query.
    pub q: Option<String>,
    /// Street name.
    pub name: Option<String>,
    /// City.
    pub city: Option<String>,
    /// State.
    pub state: Option<String>,
}

impl StreetQuery {
    /// Free-text query.
    #[must_use]
    pub fn text(q: impl Into<String>) -> Self {
        Self {
            q: Some(q.into()),
            ..Self::default()
        }
    }

    /// Structured query from its parts.
    #[must_use]
    pub fn parts(name: &str, city: Option<&str>, state: Option<&str>) -> Self {
        Self {
            q: None,
            name: Some(name.to_owned()),
            city: city.map(str::to_owned),
            state: state.map(str::to_owned),
        }
    }

    /// Text sent to the geocoder, or `None` when the request names nothing.
    pub fn query_text(&self) -> Option<String> {
        fn non_blank(value: Option<&String>) -> Option<&str> {
            value.map(|v| v.trim()).filter(|v| !v.is_empty())
        }

        if let Some(q) = non_blank(self.q.as_ref()) {
            return Some(q.to_owned());
        }
        let name = non_blank(self.name.as_ref())?;
        let parts: Vec<&str> = [
            Some(name),
            non_blank(self.city.as_ref()),
            non_blank(self.state.as_ref()),
        ]
        .into_iter()
        .flatten()
        .collect();
        Some(parts.join(", "))
    }
}

/// Errors returned by [`ShelterContext::geocode_street`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreetGeocodeError {
    /// Neither `q` nor `name` was supplied.
    #[error("missing query: provide 'q' or 'name'")]
    MissingQuery,
    /// Both the direct lookup and the fallback failed.
    #[error("Geocoding failed: {0}")]
    Geocoding(#[source] GeocodeError),
}

/// Shared state for every lookup.
#[derive(Debug)]
pub struct ShelterContext<G> {
    registry: ShelterRegistry,
    streets: StreetIndex,
    cache: GeocodeCache,
    addresses: AddressResolver<G>,
}

/// Postcode of [`ShelterContext::sample_street`]'s fixed fallback.
const SAMPLE_POSTCODE: &str = "90802";

impl<G: Geocoder> ShelterContext<G> {
    /// Assemble a context with an empty geocode cache.
    pub fn new(registry: ShelterRegistry, streets: StreetIndex, geocoder: G) -> Self {
        Self::with_resolver(registry, streets, AddressResolver::new(geocoder))
    }

    /// Assemble a context around a configured [`AddressResolver`].
    pub fn with_resolver(
        registry: ShelterRegistry,
        streets: StreetIndex,
        addresses: AddressResolver<G>,
    ) -> Self {
        Self {
            registry,
            streets,
            cache: GeocodeCache::new(),
            addresses,
        }
    }

    /// Shelter registry.
    pub fn registry(&self) -> &ShelterRegistry {
        &self.registry
    }

    /// Street index.
    pub fn streets(&self) -> &StreetIndex {
        &self.streets
    }

    /// Geocode cache.
    pub fn cache(&self) -> &GeocodeCache {
        &self.cache
    }

    /// Address resolver.
    pub fn addresses(&self) -> &AddressResolver<G> {
        &self.addresses
    }

    /// Find the shelter closest to `address`.
    ///
    /// # Errors
    ///
    /// See [`crate::find_nearest`].
    pub fn find_nearest(&self, address: &str) -> Result<NearestOutcome, NearestError> {
        crate::find_nearest(&self.addresses, &self.registry, address)
    }

    /// Street suggestions for `query`, enriched from the geocode cache.
    pub fn suggest_streets(&self, query: &str) -> Vec<StreetEntry> {
        self.streets.suggest_enriched(query, &self.cache)
    }

    /// Geocode a street, consulting and filling the cache.
    ///
    /// The geocoder is first queried directly with address details. If that
    /// call fails, the address resolver is tried instead. Results, including
    /// misses, are cached; a failure of both lookups is not. A match outside
    /// the WGS84 ranges is cached as a miss.
    ///
    /// # Errors
    ///
    /// [`StreetGeocodeError::MissingQuery`] when `query` names nothing and
    /// [`StreetGeocodeError::Geocoding`] when both lookups fail.
    pub fn geocode_street(&self, query: &StreetQuery) -> Result<CachedGeocode, StreetGeocodeError> {
        let text = query.query_text().ok_or(StreetGeocodeError::MissingQuery)?;
        if let Some(hit) = self.cache.get(&text) {
            debug!("geocode cache hit for {text:?}");
            return Ok(hit);
        }

        let direct = GeocodeQuery::new(text.clone()).with_address_details();
        let entry = match self.addresses.geocoder().geocode(&direct) {
            Ok(Some(place)) if is_valid_location(place.location) => CachedGeocode {
                lat: Some(place.location.y),
                lon: Some(place.location.x),
                postcode: place.postcode,
                display: text.clone(),
            },
            Ok(Some(_) | None) => CachedGeocode::miss(text.clone()),
            Err(err) => {
                warn!("street geocoding for {text:?} failed, retrying via address resolver: {err}");
                match self.addresses.resolve(&text) {
                    GeocodeOutcome::Found(location) => CachedGeocode {
                        lat: Some(location.y),
                        lon: Some(location.x),
                        postcode: None,
                        display: text.clone(),
                    },
                    GeocodeOutcome::NotFound => CachedGeocode::miss(text.clone()),
                    GeocodeOutcome::ServiceError(err) => {
                        return Err(StreetGeocodeError::Geocoding(err));
                    }
                }
            }
        };
        self.cache.insert(&text, entry.clone());
        Ok(entry)
    }

    /// A street with known coordinates for front-end smoke tests.
    ///
    /// Returns the first located street, or a fixed Long Beach sample when the
    /// index has none.
    pub fn sample_street(&self) -> StreetEntry {
        self.streets.first_located().cloned().unwrap_or_else(|| {
            StreetEntry::new("Pacific Avenue", "Long Beach", "CA")
                .with_location(33.7701, -118.1937)
                .with_postcode(SAMPLE_POSTCODE)
        })
    }
}
