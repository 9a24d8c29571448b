use thiserror::Error;

/// Errors from [`crate::geocode::Geocoder::geocode`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    /// The query text was blank.
    ///
    /// Callers should reject blank input before reaching the geocoder.
    #[error("geocoding query must not be blank")]
    EmptyQuery,

    /// The request URL could not be built from the configured base URL.
    #[error("invalid geocoding request URL: {message}")]
    InvalidUrl {
        /// Description of the parse failure.
        message: String,
    },

    /// The request did not complete within the configured timeout.
    #[error("geocoding request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },

    /// The service answered with a non-success status code.
    #[error("geocoding service at {url} returned HTTP {status}: {message}")]
    HttpError {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description from the HTTP client.
        message: String,
    },

    /// The service could not be reached.
    #[error("failed to reach geocoding service at {url}: {message}")]
    NetworkError {
        /// Requested URL.
        url: String,
        /// Error description from the HTTP client.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("failed to parse geocoding response: {message}")]
    ParseError {
        /// Description of the decoding failure.
        message: String,
    },
}
