//! HTTP geocoding through a Nominatim-compatible search API.
//!
//! This module provides [`NominatimGeocoder`], an implementation of
//! [`shelter_core::Geocoder`] that resolves free text with the `/search`
//! endpoint.
//!
//! # Architecture
//!
//! The [`shelter_core::Geocoder`] trait is synchronous so the core lookup
//! logic stays free of async plumbing. The geocoder bridges to async
//! `reqwest` calls by blocking on a Tokio runtime internally.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use shelter_core::{GeocodeQuery, Geocoder};
//! use shelter_data::geocoding::{NominatimConfig, NominatimGeocoder};
//!
//! let config = NominatimConfig::new("https://nominatim.openstreetmap.org")
//!     .with_timeout(Duration::from_secs(5))
//!     .with_user_agent("my-app/1.0");
//! let geocoder = NominatimGeocoder::with_config(config)?;
//!
//! let query = GeocodeQuery::new("200 N Spring St, Los Angeles, CA").with_country_codes("us");
//! if let Some(place) = geocoder.geocode(&query)? {
//!     println!("{} at ({}, {})", place.display_name, place.location.y, place.location.x);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod nominatim;
mod provider;

pub use provider::{
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, NominatimConfig,
    NominatimGeocoder, ProviderBuildError,
};
