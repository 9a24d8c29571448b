use geo::Coord;

use crate::is_valid_location;

/// A single animal shelter.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use shelter_core::ShelterRecord;
///
/// let shelter = ShelterRecord::new(
///     "Long Beach Animal Care",
///     "7700 E Spring St",
///     "Long Beach",
///     Coord { x: -118.1386, y: 33.8117 },
/// );
///
/// assert_eq!(shelter.display_address(), "7700 E Spring St, Long Beach");
/// assert!(shelter.has_usable_location());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ShelterRecord {
    /// Shelter name as published.
    pub name: String,
    /// Street address without the city.
    pub address: String,
    /// City the shelter sits in.
    pub city: String,
    /// Geospatial position.
    pub location: Coord<f64>,
}

impl ShelterRecord {
    /// Construct a `ShelterRecord`.
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        city: impl Into<String>,
        location: Coord<f64>,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            city: city.into(),
            location,
        }
    }

    /// Address shown to users: `"address, city"`.
    pub fn display_address(&self) -> String {
        format!("{}, {}", self.address, self.city)
    }

    /// Whether the location can take part in a distance comparison.
    ///
    /// Non-finite values, values outside the WGS84 ranges and the exact
    /// origin `(0, 0)` are rejected; the origin is what blank cells turn
    /// into in the upstream datasets.
    pub fn has_usable_location(&self) -> bool {
        let Coord { x: lon, y: lat } = self.location;
        is_valid_location(self.location) && !(lat == 0.0 && lon == 0.0)
    }
}
