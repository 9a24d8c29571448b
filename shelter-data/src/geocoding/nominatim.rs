//! Nominatim search API response types.
//!
//! See: <https://nominatim.org/release-docs/latest/api/Search/>

use serde::Deserialize;

/// One element of the `/search?format=jsonv2` response array.
///
/// Nominatim encodes coordinates as strings.
#[derive(Debug, Deserialize)]
pub struct SearchResult {
    /// Latitude in decimal degrees.
    pub lat: String,
    /// Longitude in decimal degrees.
    pub lon: String,
    /// Full human-readable address.
    #[serde(default)]
    pub display_name: String,
    /// Structured address, present when `addressdetails=1`.
    #[serde(default)]
    pub address: Option<AddressDetails>,
}

/// Subset of the structured address used by the shelter finder.
#[derive(Debug, Default, Deserialize)]
pub struct AddressDetails {
    /// Postal code.
    pub postcode: Option<String>,
}

impl SearchResult {
    /// Postal code, if the address details carry a non-blank one.
    pub fn postcode(&self) -> Option<&str> {
        self.address
            .as_ref()
            .and_then(|address| address.postcode.as_deref())
            .map(str::trim)
            .filter(|postcode| !postcode.is_empty())
    }
}
