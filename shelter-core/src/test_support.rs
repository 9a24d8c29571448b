//! Test doubles shared by unit, behaviour and router tests.
//!
//! [`StubGeocoder`] returns pre-configured answers and records every query it
//! receives, so tests can assert on the exact text sent to the service.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use geo::Coord;

use crate::{GeocodeError, GeocodeQuery, GeocodedPlace, Geocoder, ShelterRecord};

/// Canned answer for a single [`StubGeocoder`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum StubResponse {
    /// Return the given place.
    Place(GeocodedPlace),
    /// Return `Ok(None)`.
    Missing,
    /// Return the given error.
    Error(GeocodeError),
}

/// Deterministic [`Geocoder`] for tests.
///
/// Responses are consumed in order; the last one repeats once the others are
/// used up. Blank queries still fail with [`GeocodeError::EmptyQuery`].
#[derive(Debug)]
pub struct StubGeocoder {
    responses: Mutex<VecDeque<StubResponse>>,
    queries: Mutex<Vec<GeocodeQuery>>,
}

impl StubGeocoder {
    /// Answer every call with the given responses, in order.
    #[must_use]
    pub fn with_responses(responses: impl IntoIterator<Item = StubResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Resolve every query to `location`.
    #[must_use]
    pub fn found(location: Coord<f64>) -> Self {
        Self::with_responses([StubResponse::Place(place_at(location))])
    }

    /// Resolve every query to `location` with the given postcode.
    #[must_use]
    pub fn found_with_postcode(location: Coord<f64>, postcode: &str) -> Self {
        let mut place = place_at(location);
        place.postcode = Some(postcode.to_owned());
        Self::with_responses([StubResponse::Place(place)])
    }

    /// Report no match for every query.
    #[must_use]
    pub fn not_found() -> Self {
        Self::with_responses([StubResponse::Missing])
    }

    /// Fail every query with `error`.
    #[must_use]
    pub fn failing(error: GeocodeError) -> Self {
        Self::with_responses([StubResponse::Error(error)])
    }

    /// Queries received so far, oldest first.
    pub fn queries(&self) -> Vec<GeocodeQuery> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn next_response(&self) -> StubResponse {
        let mut responses = self
            .responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if responses.len() > 1 {
            responses.pop_front().unwrap_or(StubResponse::Missing)
        } else {
            responses.front().cloned().unwrap_or(StubResponse::Missing)
        }
    }
}

impl Geocoder for StubGeocoder {
    fn geocode(&self, query: &GeocodeQuery) -> Result<Option<GeocodedPlace>, GeocodeError> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.clone());
        if query.text.trim().is_empty() {
            return Err(GeocodeError::EmptyQuery);
        }
        match self.next_response() {
            StubResponse::Place(place) => Ok(Some(place)),
            StubResponse::Missing => Ok(None),
            StubResponse::Error(error) => Err(error),
        }
    }
}

/// A geocoded place at `location` with no postcode.
pub fn place_at(location: Coord<f64>) -> GeocodedPlace {
    GeocodedPlace {
        location,
        display_name: format!("{}, {}", location.y, location.x),
        postcode: None,
    }
}

/// Kilometres per degree of latitude on the haversine sphere.
pub const KM_PER_DEGREE_LATITUDE: f64 = crate::EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;

/// A shelter `km` kilometres due north of `origin`.
pub fn shelter_north_of(origin: Coord<f64>, km: f64, name: &str) -> ShelterRecord {
    ShelterRecord::new(
        name,
        format!("{name} Street"),
        "Long Beach",
        Coord {
            x: origin.x,
            y: origin.y + km / KM_PER_DEGREE_LATITUDE,
        },
    )
}
