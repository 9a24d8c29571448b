//! JSON bodies exchanged by the HTTP API.
//!
//! Nearest-shelter keys keep the names the front-end already consumes.
//! Coordinate pairs are `[latitude, longitude]`.

use geo::Coord;
use serde::Serialize;
use shelter_core::{CachedGeocode, NearestOutcome, NearestShelter, StreetEntry};

/// Reply to `POST /api/nearest` and the `nearest` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearestResponse {
    /// Whether a shelter was found.
    pub successo: bool,
    /// The closest shelter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dati_rifugio: Option<ShelterPayload>,
    /// Geocoded user position.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinate_utente: Option<[f64; 2]>,
    /// Failure message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messaggio: Option<String>,
}

/// Shelter details inside a [`NearestResponse`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShelterPayload {
    /// Shelter name.
    pub nome: String,
    /// `"address, city"`.
    pub indirizzo: String,
    /// Distance in kilometres, two decimals.
    pub distanza_km: f64,
    /// Shelter position.
    pub posizione_rifugio: [f64; 2],
}

fn lat_lon(coord: Coord<f64>) -> [f64; 2] {
    [coord.y, coord.x]
}

impl NearestResponse {
    /// A failed lookup carrying `message`.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            successo: false,
            dati_rifugio: None,
            coordinate_utente: None,
            messaggio: Some(message.into()),
        }
    }
}

impl From<NearestShelter> for NearestResponse {
    fn from(shelter: NearestShelter) -> Self {
        Self {
            successo: true,
            coordinate_utente: Some(lat_lon(shelter.user_location)),
            dati_rifugio: Some(ShelterPayload {
                nome: shelter.name,
                indirizzo: shelter.address,
                distanza_km: shelter.distance_km,
                posizione_rifugio: lat_lon(shelter.shelter_location),
            }),
            messaggio: None,
        }
    }
}

impl From<NearestOutcome> for NearestResponse {
    fn from(outcome: NearestOutcome) -> Self {
        match outcome {
            NearestOutcome::Found(shelter) => shelter.into(),
            NearestOutcome::AddressNotFound { hint } => Self::failure(hint),
        }
    }
}

/// Reply to `GET /api/suggest-street`.
#[derive(Debug, Clone, Serialize)]
pub struct SuggestResponse {
    /// Matching streets, best first.
    pub suggestions: Vec<StreetEntry>,
}

/// Reply to `GET /api/debug-sample`.
#[derive(Debug, Clone, Serialize)]
pub struct SampleResponse {
    /// A street with known coordinates.
    pub sample: StreetEntry,
}

/// Reply to `POST /api/geocode-street`.
pub type GeocodeStreetResponse = CachedGeocode;

/// Error body of the street endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Human-readable reason.
    pub error: String,
}

impl ErrorResponse {
    /// Wrap a displayable error.
    pub fn new(error: impl ToString) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}
