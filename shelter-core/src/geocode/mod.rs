//! Turn free-text addresses into coordinates.
//!
//! The [`Geocoder`] trait abstracts a remote text-to-coordinate lookup. Callers
//! hand it a [`GeocodeQuery`] and get back the best [`GeocodedPlace`], `None`
//! when nothing matched, or a [`GeocodeError`] when the service could not be
//! reached.
//!
//! [`AddressResolver`] sits on top of a geocoder and applies the address
//! heuristics used for user input: biasing under-specified addresses towards
//! the service area and restricting results to one country. It folds service
//! failures into [`GeocodeOutcome::ServiceError`] so they never surface as
//! faults.

mod address;
mod error;
mod provider;

pub use address::{AddressResolver, DEFAULT_COUNTRY_CODE, DEFAULT_REGION_SUFFIX, GeocodeOutcome};
pub use error::GeocodeError;
pub use provider::{GeocodeQuery, GeocodedPlace, Geocoder};
