//! Geocoder settings shared by the `serve` and `nearest` commands.

use std::time::Duration;

use shelter_data::geocoding::{
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, NominatimConfig, NominatimGeocoder,
};

use crate::CliError;

/// Resolved geocoding client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GeocoderSettings {
    /// Base URL of the Nominatim-compatible service.
    pub(crate) base_url: String,
    /// Per-request timeout in seconds.
    pub(crate) timeout_secs: u64,
    /// `User-Agent` header sent with every request.
    pub(crate) user_agent: String,
    /// Contact address sent with every search.
    pub(crate) email: Option<String>,
}

impl Default for GeocoderSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            email: None,
        }
    }
}

impl GeocoderSettings {
    /// Fill unset options from the defaults.
    pub(crate) fn from_options(
        base_url: Option<String>,
        timeout_secs: Option<u64>,
        user_agent: Option<String>,
        email: Option<String>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            base_url: base_url.unwrap_or(defaults.base_url),
            timeout_secs: timeout_secs.unwrap_or(defaults.timeout_secs),
            user_agent: user_agent.unwrap_or(defaults.user_agent),
            email,
        }
    }

    fn client_config(&self) -> NominatimConfig {
        let config = NominatimConfig::new(self.base_url.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_user_agent(self.user_agent.clone());
        match &self.email {
            Some(email) => config.with_email(email.clone()),
            None => config,
        }
    }

    /// Build the HTTP geocoder.
    pub(crate) fn build(&self) -> Result<NominatimGeocoder, CliError> {
        NominatimGeocoder::with_config(self.client_config()).map_err(|source| {
            CliError::BuildGeocoder {
                base_url: self.base_url.clone(),
                source,
            }
        })
    }
}
