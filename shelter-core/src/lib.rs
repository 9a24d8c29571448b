//! Core domain types for the shelter finder.
//!
//! The crate holds everything needed to answer "which shelter is closest to
//! this address" without touching the network or the filesystem: the
//! in-memory registry, the haversine distance engine, the geocoder seam and
//! its address heuristics, the shared geocode cache, street autocomplete and
//! the context object tying them together.
//!
//! Coordinates are WGS84 degrees held in [`geo::Coord`] with
//! `x = longitude` and `y = latitude`.

#![forbid(unsafe_code)]

pub mod cache;
pub mod context;
pub mod distance;
pub mod geocode;
pub mod registry;
pub mod resolver;
pub mod streets;

mod shelter;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use cache::{CachedGeocode, GeocodeCache};
pub use context::{ShelterContext, StreetGeocodeError, StreetQuery};
pub use distance::{EARTH_RADIUS_KM, distance_between, distance_km, is_valid_location};
pub use geocode::{
    AddressResolver, GeocodeError, GeocodeOutcome, GeocodeQuery, GeocodedPlace, Geocoder,
};
pub use registry::{RegistryError, ShelterRegistry};
pub use resolver::{
    ADDRESS_NOT_FOUND_HINT, NearestError, NearestOutcome, NearestShelter, find_nearest, nearest_to,
};
pub use shelter::ShelterRecord;
pub use streets::{MAX_SUGGESTIONS, StreetEntry, StreetIndex};
