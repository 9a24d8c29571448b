//! Process-wide cache of street geocoding results.
//!
//! Entries are keyed by the trimmed, lowercased query text and are never
//! evicted or expired. The map is safe to share across threads: concurrent
//! writers to the same key resolve as last-write-wins, and entries are always
//! replaced whole.

use moka::sync::Cache;
use serde::{Deserialize, Serialize};

/// A cached geocoding answer.
///
/// `lat`/`lon` are `None` when the lookup found nothing; misses are cached
/// too so repeated queries do not hit the service again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedGeocode {
    /// Latitude of the match.
    pub lat: Option<f64>,
    /// Longitude of the match.
    pub lon: Option<f64>,
    /// Postal code of the match.
    pub postcode: Option<String>,
    /// Query text the entry was produced for.
    pub display: String,
}

impl CachedGeocode {
    /// An entry recording that `display` did not resolve.
    pub fn miss(display: impl Into<String>) -> Self {
        Self {
            lat: None,
            lon: None,
            postcode: None,
            display: display.into(),
        }
    }

    /// Both coordinates, when present.
    pub fn lat_lon(&self) -> Option<(f64, f64)> {
        self.lat.zip(self.lon)
    }
}

/// Unbounded concurrent map from normalised query text to [`CachedGeocode`].
///
/// # Examples
///
/// ```
/// use shelter_core::{CachedGeocode, GeocodeCache};
///
/// let cache = GeocodeCache::new();
/// cache.insert("  Pine Ave, Long Beach ", CachedGeocode::miss("Pine Ave, Long Beach"));
/// assert!(cache.get("pine ave, long beach").is_some());
/// ```
#[derive(Clone)]
pub struct GeocodeCache {
    entries: Cache<String, CachedGeocode>,
}

impl std::fmt::Debug for GeocodeCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodeCache")
            .field("entries", &"<moka::sync::Cache>")
            .finish()
    }
}

impl Default for GeocodeCache {
    fn default() -> Self {
        Self::new()
    }
}

impl GeocodeCache {
    /// Create an empty cache with no capacity bound and no expiry.
    pub fn new() -> Self {
        Self {
            entries: Cache::builder().build(),
        }
    }

    /// Normalise query text into a cache key.
    pub fn normalise_key(query: &str) -> String {
        query.trim().to_lowercase()
    }

    /// Look up the entry for `query`.
    pub fn get(&self, query: &str) -> Option<CachedGeocode> {
        self.entries.get(&Self::normalise_key(query))
    }

    /// Whether an entry exists for `query`.
    pub fn contains(&self, query: &str) -> bool {
        self.entries.contains_key(&Self::normalise_key(query))
    }

    /// Store `entry` under `query`, replacing any previous entry.
    pub fn insert(&self, query: &str, entry: CachedGeocode) {
        self.entries.insert(Self::normalise_key(query), entry);
    }

    /// Return the entry for the first of `keys` present in the cache.
    pub fn first_match<I, S>(&self, keys: I) -> Option<CachedGeocode>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        keys.into_iter().find_map(|key| self.get(key.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn cache() -> GeocodeCache {
        GeocodeCache::new()
    }

    fn located(display: &str, lat: f64, lon: f64) -> CachedGeocode {
        CachedGeocode {
            lat: Some(lat),
            lon: Some(lon),
            postcode: Some("90802".to_owned()),
            display: display.to_owned(),
        }
    }

    #[rstest]
    #[case("Pine Ave", "pine ave")]
    #[case("  PINE AVE\t", "pine ave")]
    #[case("Pine Ave, Long Beach, CA", "pine ave, long beach, ca")]
    fn keys_are_trimmed_and_lowercased(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(GeocodeCache::normalise_key(raw), expected);
    }

    #[rstest]
    fn lookups_ignore_case_and_whitespace(cache: GeocodeCache) {
        cache.insert("Pine Ave", located("Pine Ave", 33.77, -118.19));
        assert!(cache.contains(" pine ave "));
        assert_eq!(cache.get("PINE AVE"), Some(located("Pine Ave", 33.77, -118.19)));
    }

    #[rstest]
    fn later_writes_replace_earlier_ones(cache: GeocodeCache) {
        cache.insert("Pine Ave", CachedGeocode::miss("Pine Ave"));
        cache.insert("pine ave", located("Pine Ave", 33.77, -118.19));
        assert_eq!(
            cache.get("Pine Ave").and_then(|entry| entry.lat_lon()),
            Some((33.77, -118.19))
        );
    }

    #[rstest]
    fn first_match_respects_key_order(cache: GeocodeCache) {
        cache.insert("pine ave, long beach", located("second", 2.0, 2.0));
        cache.insert("pine ave", located("third", 3.0, 3.0));

        let found = cache
            .first_match(["pine ave, long beach, ca", "pine ave, long beach", "pine ave"])
            .expect("a key should match");
        assert_eq!(found.display, "second");
    }

    #[rstest]
    fn clones_share_entries(cache: GeocodeCache) {
        let other = cache.clone();
        other.insert("Pine Ave", CachedGeocode::miss("Pine Ave"));
        assert!(cache.contains("pine ave"));
    }

    #[rstest]
    fn miss_has_no_coordinates() {
        let entry = CachedGeocode::miss("Nowhere");
        assert_eq!(entry.lat_lon(), None);
        assert_eq!(entry.display, "Nowhere");
    }
}
