//! In-memory shelter registry.
//!
//! The registry is built once at process start and never mutated, so it can
//! be shared between request handlers without synchronisation. Records keep
//! the order they were supplied in; the resolver relies on that order to break
//! distance ties.

use log::warn;
use thiserror::Error;

use crate::ShelterRecord;

/// Errors returned by [`ShelterRegistry::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No usable shelter records remained.
    ///
    /// Either the input was empty or every record was excluded for having an
    /// unusable location.
    #[error("shelter registry is empty ({excluded} records excluded for invalid coordinates)")]
    Empty {
        /// Number of records dropped for unusable coordinates.
        excluded: usize,
    },
}

/// Ordered, immutable collection of shelters with usable coordinates.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use shelter_core::{ShelterRecord, ShelterRegistry};
///
/// # fn main() -> Result<(), shelter_core::RegistryError> {
/// let registry = ShelterRegistry::new(vec![
///     ShelterRecord::new("A", "1 Main St", "Carson", Coord { x: -118.28, y: 33.83 }),
///     ShelterRecord::new("Nowhere", "", "", Coord { x: 0.0, y: 0.0 }),
/// ])?;
/// assert_eq!(registry.len(), 1);
/// assert_eq!(registry.excluded(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ShelterRegistry {
    records: Vec<ShelterRecord>,
    excluded: usize,
}

impl ShelterRegistry {
    /// Build a registry, dropping records whose location is unusable.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Empty`] when no record survives the filter.
    pub fn new(records: Vec<ShelterRecord>) -> Result<Self, RegistryError> {
        let total = records.len();
        let kept: Vec<ShelterRecord> = records
            .into_iter()
            .filter(|record| {
                let usable = record.has_usable_location();
                if !usable {
                    warn!(
                        "excluding shelter {:?}: unusable coordinates ({}, {})",
                        record.name, record.location.y, record.location.x
                    );
                }
                usable
            })
            .collect();
        let excluded = total - kept.len();
        if kept.is_empty() {
            return Err(RegistryError::Empty { excluded });
        }
        Ok(Self {
            records: kept,
            excluded,
        })
    }

    /// Records in load order.
    pub fn records(&self) -> &[ShelterRecord] {
        &self.records
    }

    /// Number of usable records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always `false`; an empty registry cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records dropped during construction.
    pub fn excluded(&self) -> usize {
        self.excluded
    }
}
