//! Street-name autocomplete.
//!
//! The index keeps streets in load order. Matching is case-insensitive and
//! two-tiered: entries whose display string or bare name starts with the
//! query come first, then entries that merely contain it. Order within each
//! tier is the load order.

use serde::{Deserialize, Serialize};

use crate::{CachedGeocode, GeocodeCache};

/// Upper bound on the number of suggestions returned.
pub const MAX_SUGGESTIONS: usize = 20;

/// A named street with optional pre-computed geocoding data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreetEntry {
    /// Street name.
    pub name: String,
    /// City, possibly empty.
    pub city: String,
    /// State, possibly empty.
    pub state: String,
    /// `"name, city, state"` with empty parts omitted.
    pub display: String,
    /// Latitude, when known.
    pub lat: Option<f64>,
    /// Longitude, when known.
    pub lon: Option<f64>,
    /// Postal code, when known.
    pub postcode: Option<String>,
}

impl StreetEntry {
    /// Build an entry, trimming each part and composing the display string.
    ///
    /// # Examples
    ///
    /// ```
    /// use shelter_core::StreetEntry;
    ///
    /// let entry = StreetEntry::new(" Cherry Ave ", "Long Beach", "CA");
    /// assert_eq!(entry.display, "Cherry Ave, Long Beach, CA");
    /// assert_eq!(StreetEntry::new("Cherry Ave", "", "CA").display, "Cherry Ave, CA");
    /// ```
    pub fn new(name: &str, city: &str, state: &str) -> Self {
        let name = name.trim();
        let city = city.trim();
        let state = state.trim();
        let display = [name, city, state]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            name: name.to_owned(),
            city: city.to_owned(),
            state: state.to_owned(),
            display,
            lat: None,
            lon: None,
            postcode: None,
        }
    }

    /// Attach coordinates.
    #[must_use]
    pub fn with_location(mut self, lat: f64, lon: f64) -> Self {
        self.lat = Some(lat);
        self.lon = Some(lon);
        self
    }

    /// Attach a postal code.
    #[must_use]
    pub fn with_postcode(mut self, postcode: impl Into<String>) -> Self {
        self.postcode = Some(postcode.into());
        self
    }

    /// Whether both coordinates are known.
    pub fn is_located(&self) -> bool {
        self.lat.is_some() && self.lon.is_some()
    }

    /// Cache keys this entry may have been geocoded under, most specific
    /// spelling first.
    pub fn cache_keys(&self) -> Vec<String> {
        let mut keys = Vec::with_capacity(4);
        if !self.display.is_empty() {
            keys.push(GeocodeCache::normalise_key(&self.display));
        }
        if !self.name.is_empty() {
            keys.push(GeocodeCache::normalise_key(&self.name));
            if !self.city.is_empty() {
                keys.push(GeocodeCache::normalise_key(&format!(
                    "{}, {}",
                    self.name, self.city
                )));
                if !self.state.is_empty() {
                    keys.push(GeocodeCache::normalise_key(&format!(
                        "{}, {}, {}",
                        self.name, self.city, self.state
                    )));
                }
            }
        }
        keys
    }

    /// Copy whatever `cached` knows onto this entry.
    ///
    /// The postcode is taken when present; coordinates only when both are.
    pub fn apply_cached(&mut self, cached: &CachedGeocode) {
        if let Some(postcode) = &cached.postcode {
            self.postcode = Some(postcode.clone());
        }
        if let Some((lat, lon)) = cached.lat_lon() {
            self.lat = Some(lat);
            self.lon = Some(lon);
        }
    }

    fn starts_with(&self, needle: &str) -> bool {
        self.display.to_lowercase().starts_with(needle)
            || self.name.to_lowercase().starts_with(needle)
    }

    fn contains(&self, needle: &str) -> bool {
        self.display.to_lowercase().contains(needle) || self.name.to_lowercase().contains(needle)
    }
}

/// Ordered collection of streets used for autocomplete.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreetIndex {
    entries: Vec<StreetEntry>,
}

impl StreetIndex {
    /// Build an index preserving the given order.
    pub fn new(entries: Vec<StreetEntry>) -> Self {
        Self { entries }
    }

    /// Entries in load order.
    pub fn entries(&self) -> &[StreetEntry] {
        &self.entries
    }

    /// Number of streets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no streets.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Up to [`MAX_SUGGESTIONS`] entries matching `query`.
    ///
    /// Blank queries match nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use shelter_core::{StreetEntry, StreetIndex};
    ///
    /// let index = StreetIndex::new(vec![
    ///     StreetEntry::new("Wild Cherry Ln", "Long Beach", "CA"),
    ///     StreetEntry::new("Cherry Ave", "Long Beach", "CA"),
    /// ]);
    /// let names: Vec<_> = index.suggest("cherry").iter().map(|s| s.name.as_str()).collect();
    /// assert_eq!(names, ["Cherry Ave", "Wild Cherry Ln"]);
    /// ```
    pub fn suggest(&self, query: &str) -> Vec<&StreetEntry> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        let (prefix, rest): (Vec<&StreetEntry>, Vec<&StreetEntry>) = self
            .entries
            .iter()
            .partition(|entry| entry.starts_with(&needle));
        prefix
            .into_iter()
            .chain(rest.into_iter().filter(|entry| entry.contains(&needle)))
            .take(MAX_SUGGESTIONS)
            .collect()
    }

    /// Like [`StreetIndex::suggest`], with each result enriched from `cache`.
    ///
    /// For every suggestion the keys from [`StreetEntry::cache_keys`] are tried
    /// in order and the first cached entry found is applied.
    pub fn suggest_enriched(&self, query: &str, cache: &GeocodeCache) -> Vec<StreetEntry> {
        self.suggest(query)
            .into_iter()
            .map(|entry| {
                let mut item = entry.clone();
                if let Some(cached) = cache.first_match(entry.cache_keys()) {
                    item.apply_cached(&cached);
                }
                item
            })
            .collect()
    }

    /// First entry with both coordinates known.
    pub fn first_located(&self) -> Option<&StreetEntry> {
        self.entries.iter().find(|entry| entry.is_located())
    }
}
