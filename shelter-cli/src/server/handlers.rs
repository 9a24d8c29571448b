//! Request handlers for the JSON API.
//!
//! Lookups that may reach the geocoder run on the blocking pool.

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::Value;
use shelter_core::{Geocoder, ShelterContext, StreetGeocodeError, StreetQuery};
use tokio::task::{JoinError, spawn_blocking};
use tracing::{debug, error, info};

use super::payload::{
    ErrorResponse, GeocodeStreetResponse, NearestResponse, SampleResponse, SuggestResponse,
};

/// Body key holding the address.
pub const ADDRESS_KEY: &str = "indirizzo";

/// Message for a body that is not a JSON object with an address.
pub const MISSING_ADDRESS_MESSAGE: &str = "Parametro 'indirizzo' mancante.";

/// Message for an address that is not a non-blank string.
pub const INVALID_ADDRESS_MESSAGE: &str = "Indirizzo non valido.";

const INTERNAL_ERROR_MESSAGE: &str = "internal error";

const INVALID_JSON_MESSAGE: &str = "request body must be a JSON object";

type SharedContext<G> = State<Arc<ShelterContext<G>>>;

fn address_from_body(body: &[u8]) -> Result<String, &'static str> {
    let value: Value = serde_json::from_slice(body).map_err(|_| MISSING_ADDRESS_MESSAGE)?;
    match value.get(ADDRESS_KEY) {
        None => Err(MISSING_ADDRESS_MESSAGE),
        Some(Value::String(address)) if !address.trim().is_empty() => Ok(address.clone()),
        Some(_) => Err(INVALID_ADDRESS_MESSAGE),
    }
}

fn join_failure(err: &JoinError) -> StatusCode {
    error!(error = %err, "lookup task failed");
    StatusCode::INTERNAL_SERVER_ERROR
}

/// `POST /api/nearest`
pub async fn nearest<G>(State(context): SharedContext<G>, body: Bytes) -> Response
where
    G: Geocoder + Send + Sync + 'static,
{
    let address = match address_from_body(&body) {
        Ok(address) => address,
        Err(message) => {
            return (StatusCode::BAD_REQUEST, Json(NearestResponse::failure(message)))
                .into_response();
        }
    };
    info!(address_chars = address.chars().count(), "nearest shelter lookup");
    debug!(address = %address, "nearest shelter address");
    match spawn_blocking(move || context.find_nearest(&address)).await {
        Ok(Ok(outcome)) => Json(NearestResponse::from(outcome)).into_response(),
        Ok(Err(err)) => (
            StatusCode::BAD_REQUEST,
            Json(NearestResponse::failure(err.to_string())),
        )
            .into_response(),
        Err(err) => (
            join_failure(&err),
            Json(NearestResponse::failure(INTERNAL_ERROR_MESSAGE)),
        )
            .into_response(),
    }
}

/// Query string of `GET /api/suggest-street`.
#[derive(Debug, Default, Deserialize)]
pub struct SuggestParams {
    /// Partial street name.
    #[serde(default)]
    pub q: String,
}

/// `GET /api/suggest-street`
pub async fn suggest_street<G>(
    State(context): SharedContext<G>,
    Query(params): Query<SuggestParams>,
) -> Json<SuggestResponse>
where
    G: Geocoder + Send + Sync + 'static,
{
    Json(SuggestResponse {
        suggestions: context.suggest_streets(&params.q),
    })
}

/// `POST /api/geocode-street`
pub async fn geocode_street<G>(State(context): SharedContext<G>, body: Bytes) -> Response
where
    G: Geocoder + Send + Sync + 'static,
{
    // An empty or `null` body names nothing and is reported as a missing query.
    let query = if body.is_empty() {
        StreetQuery::default()
    } else {
        match serde_json::from_slice::<Option<StreetQuery>>(&body) {
            Ok(query) => query.unwrap_or_default(),
            Err(_) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::new(INVALID_JSON_MESSAGE)),
                )
                    .into_response();
            }
        }
    };
    match spawn_blocking(move || context.geocode_street(&query)).await {
        Ok(Ok(entry)) => Json::<GeocodeStreetResponse>(entry).into_response(),
        Ok(Err(err @ StreetGeocodeError::MissingQuery)) => {
            (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(err))).into_response()
        }
        Ok(Err(err @ StreetGeocodeError::Geocoding(_))) => {
            error!(error = %err, "street geocoding failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::new(err))).into_response()
        }
        Err(err) => (
            join_failure(&err),
            Json(ErrorResponse::new(INTERNAL_ERROR_MESSAGE)),
        )
            .into_response(),
    }
}

/// `GET /api/debug-sample`
pub async fn debug_sample<G>(State(context): SharedContext<G>) -> Json<SampleResponse>
where
    G: Geocoder + Send + Sync + 'static,
{
    Json(SampleResponse {
        sample: context.sample_street(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(br#"{"indirizzo": "4000 E Anaheim St"}"#.as_slice(), Ok("4000 E Anaheim St"))]
    #[case(b"not json".as_slice(), Err(MISSING_ADDRESS_MESSAGE))]
    #[case(br#"{"address": "x"}"#.as_slice(), Err(MISSING_ADDRESS_MESSAGE))]
    #[case(br#"["4000 E Anaheim St"]"#.as_slice(), Err(MISSING_ADDRESS_MESSAGE))]
    #[case(br#"{"indirizzo": "   "}"#.as_slice(), Err(INVALID_ADDRESS_MESSAGE))]
    #[case(br#"{"indirizzo": 42}"#.as_slice(), Err(INVALID_ADDRESS_MESSAGE))]
    #[case(br#"{"indirizzo": null}"#.as_slice(), Err(INVALID_ADDRESS_MESSAGE))]
    #[case(b"null".as_slice(), Err(MISSING_ADDRESS_MESSAGE))]
    fn address_is_extracted_from_body(
        #[case] body: &[u8],
        #[case] expected: Result<&str, &'static str>,
    ) {
        let actual = address_from_body(body);
        assert_eq!(actual.as_deref().map_err(|message| *message), expected);
    }
}
