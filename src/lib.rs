//! Facade crate for the shelter finder.
//!
//! This crate re-exports the core lookup types and, behind the `data`
//! feature, the CSV loaders and the HTTP geocoder.

#![forbid(unsafe_code)]

pub use shelter_core::{
    AddressResolver, CachedGeocode, GeocodeCache, GeocodeError, GeocodeOutcome, GeocodeQuery,
    GeocodedPlace, Geocoder, NearestError, NearestOutcome, NearestShelter, RegistryError,
    ShelterContext, ShelterRecord, ShelterRegistry, StreetEntry, StreetGeocodeError,
    StreetIndex, StreetQuery, distance_between, distance_km, find_nearest, is_valid_location,
};

#[cfg(feature = "data")]
pub use shelter_data::geocoding::{NominatimConfig, NominatimGeocoder, ProviderBuildError};

#[cfg(feature = "data")]
pub use shelter_data::{ShelterLoadError, StreetLoadError, load_shelter_registry, load_street_index};
