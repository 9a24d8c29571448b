//! HTTP-based `Geocoder` using Nominatim's search API.
//!
//! # Runtime behaviour
//!
//! When called from outside any Tokio runtime, or from a `current_thread`
//! runtime, the geocoder blocks on its own internal runtime. When called
//! from within a multi-threaded Tokio runtime it uses that runtime's handle
//! with [`tokio::task::block_in_place`] to avoid nested runtime panics.

use std::time::Duration;

use geo::Coord;
use log::debug;
use reqwest::Client;
use shelter_core::{GeocodeError, GeocodeQuery, GeocodedPlace, Geocoder};
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;

use super::nominatim::SearchResult;

/// Public Nominatim instance.
pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Default user agent for geocoding requests.
pub const DEFAULT_USER_AGENT: &str = "shelter-finder/0.1";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Errors raised while constructing a [`NominatimGeocoder`].
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// The base URL does not parse.
    #[error("invalid geocoder base URL {base_url:?}: {source}")]
    InvalidBaseUrl {
        /// Configured base URL.
        base_url: String,
        /// Parse failure.
        #[source]
        source: url::ParseError,
    },
    /// The base URL is not an HTTP(S) URL.
    #[error("geocoder base URL {base_url:?} uses unsupported scheme {scheme:?}")]
    UnsupportedScheme {
        /// Configured base URL.
        base_url: String,
        /// Scheme found in the URL.
        scheme: String,
    },
    /// The contact email was blank.
    #[error("geocoder contact email must not be blank")]
    BlankEmail,
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Settings for a [`NominatimGeocoder`].
///
/// The public instance asks clients to identify themselves with a
/// descriptive `User-Agent` and, for heavier use, a contact `email`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NominatimConfig {
    /// Service root; `/search` is appended to it.
    pub base_url: String,
    /// Connect and whole-request timeout.
    pub timeout: Duration,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Contact address sent as the `email` query parameter.
    pub email: Option<String>,
}

impl NominatimConfig {
    /// Settings for the service rooted at `base_url`, with default timeout
    /// and user agent and no contact email.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            email: None,
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Send `email` with every search.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// The `/search` endpoint under [`Self::base_url`].
    ///
    /// # Errors
    ///
    /// Fails when the base URL does not parse as an `http` or `https` URL.
    pub fn search_endpoint(&self) -> Result<Url, ProviderBuildError> {
        let root = self.base_url.trim().trim_end_matches('/');
        let endpoint = Url::parse(&format!("{root}/search")).map_err(|source| {
            ProviderBuildError::InvalidBaseUrl {
                base_url: self.base_url.clone(),
                source,
            }
        })?;
        match endpoint.scheme() {
            "http" | "https" => Ok(endpoint),
            scheme => Err(ProviderBuildError::UnsupportedScheme {
                base_url: self.base_url.clone(),
                scheme: scheme.to_owned(),
            }),
        }
    }
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Geocoder backed by a Nominatim-compatible `/search` endpoint.
///
/// Only the best match is requested (`limit=1`). The request timeout covers
/// the whole call; no retries are attempted.
pub struct NominatimGeocoder {
    client: Client,
    config: NominatimConfig,
    search_endpoint: Url,
    runtime: Runtime,
}

impl std::fmt::Debug for NominatimGeocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NominatimGeocoder")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("search_endpoint", &self.search_endpoint.as_str())
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl NominatimGeocoder {
    /// Create a geocoder with default settings for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is unusable or the HTTP client or
    /// Tokio runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(NominatimConfig::new(base_url))
    }

    /// Create a geocoder with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL or contact email is unusable, or if
    /// the HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: NominatimConfig) -> Result<Self, ProviderBuildError> {
        let search_endpoint = config.search_endpoint()?;
        if config.email.as_deref().is_some_and(|email| email.trim().is_empty()) {
            return Err(ProviderBuildError::BlankEmail);
        }
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            search_endpoint,
            runtime,
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &NominatimConfig {
        &self.config
    }

    /// Build the search URL for `query`.
    ///
    /// The URL format is
    /// `{base_url}/search?q=..&format=jsonv2&limit=1&addressdetails=0|1[&countrycodes=..][&email=..]`.
    fn build_search_url(&self, query: &GeocodeQuery) -> Url {
        let mut url = self.search_endpoint.clone();
        {
            let mut params = url.query_pairs_mut();
            params
                .append_pair("q", query.text.trim())
                .append_pair("format", "jsonv2")
                .append_pair("limit", "1")
                .append_pair(
                    "addressdetails",
                    if query.address_details { "1" } else { "0" },
                );
            if let Some(codes) = query.country_codes.as_deref() {
                params.append_pair("countrycodes", codes);
            }
            if let Some(email) = self.config.email.as_deref() {
                params.append_pair("email", email.trim());
            }
        }
        url
    }

    /// Run the search request asynchronously.
    async fn search_async(&self, url: Url) -> Result<Vec<SearchResult>, GeocodeError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;

        response
            .json()
            .await
            .map_err(|err| GeocodeError::ParseError {
                message: err.to_string(),
            })
    }

    /// Convert a reqwest error to a `GeocodeError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &Url) -> GeocodeError {
        if error.is_timeout() {
            return GeocodeError::Timeout {
                url: url.to_string(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return GeocodeError::HttpError {
                url: url.to_string(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        GeocodeError::NetworkError {
            url: url.to_string(),
            message: error.to_string(),
        }
    }

    /// Convert a search response to the best match, if any.
    fn convert_response(results: Vec<SearchResult>) -> Result<Option<GeocodedPlace>, GeocodeError> {
        let Some(best) = results.into_iter().next() else {
            return Ok(None);
        };
        let lat = parse_degrees(&best.lat, "lat", 90.0)?;
        let lon = parse_degrees(&best.lon, "lon", 180.0)?;
        let postcode = best.postcode().map(str::to_owned);
        Ok(Some(GeocodedPlace {
            location: Coord { x: lon, y: lat },
            display_name: best.display_name,
            postcode,
        }))
    }
}

/// Parse a coordinate and check it lies within `[-limit, limit]`.
fn parse_degrees(raw: &str, field: &str, limit: f64) -> Result<f64, GeocodeError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && (-limit..=limit).contains(value))
        .ok_or_else(|| GeocodeError::ParseError {
            message: format!("invalid {field} value {raw:?} in search result"),
        })
}

impl Geocoder for NominatimGeocoder {
    /// Look up `query` against the search endpoint.
    ///
    /// # Runtime requirements
    ///
    /// When called from within an existing Tokio runtime, the runtime must be
    /// multi-threaded. From a `current_thread` runtime the geocoder falls back
    /// to its own internal runtime, which blocks the caller's runtime for the
    /// duration of the request.
    fn geocode(&self, query: &GeocodeQuery) -> Result<Option<GeocodedPlace>, GeocodeError> {
        if query.text.trim().is_empty() {
            return Err(GeocodeError::EmptyQuery);
        }
        let url = self.build_search_url(query);
        debug!("geocoding {:?} via {url}", query.text);

        let future = self.search_async(url);
        let results = match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }?;
        Self::convert_response(results)
    }
}
