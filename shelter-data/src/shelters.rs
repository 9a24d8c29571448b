//! Shelter dataset loader.
//!
//! The dataset is a CSV file with at least the columns listed in
//! [`REQUIRED_SHELTER_COLUMNS`]; any other columns are ignored. Rows whose
//! coordinates are empty or unparseable are skipped, and rows with unusable
//! coordinates are dropped by [`ShelterRegistry::new`].

use std::io::Read;

use camino::{Utf8Path, Utf8PathBuf};
use geo::Coord;
use log::{info, warn};
use serde::Deserialize;
use shelter_core::{RegistryError, ShelterRecord, ShelterRegistry};
use thiserror::Error;

use crate::fs::open_utf8_file;

/// Header names every shelter dataset must provide.
pub const REQUIRED_SHELTER_COLUMNS: [&str; 5] =
    ["Latitude", "Longitude", "Shelter_Name", "Address", "City"];

/// Errors raised while loading the shelter dataset.
#[derive(Debug, Error)]
pub enum ShelterLoadError {
    /// The file could not be opened.
    #[error("failed to open shelter dataset {path}: {source}")]
    Open {
        /// Dataset path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The header row could not be read.
    #[error("failed to read headers of shelter dataset {path}: {source}")]
    ReadHeaders {
        /// Dataset path.
        path: Utf8PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },
    /// Required columns are absent.
    #[error("shelter dataset {path} is missing required columns: {}", .missing.join(", "))]
    MissingColumns {
        /// Dataset path.
        path: Utf8PathBuf,
        /// Names of the absent columns.
        missing: Vec<&'static str>,
    },
    /// A data row could not be decoded.
    #[error("failed to read row {line} of shelter dataset {path}: {source}")]
    ReadRow {
        /// Dataset path.
        path: Utf8PathBuf,
        /// One-based line number, when known.
        line: u64,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },
    /// No usable shelters remained.
    #[error("shelter dataset {path} has no usable shelters: {source}")]
    Registry {
        /// Dataset path.
        path: Utf8PathBuf,
        /// Underlying registry error.
        #[source]
        source: RegistryError,
    },
}

#[derive(Debug, Deserialize)]
struct ShelterRow {
    #[serde(rename = "Shelter_Name")]
    name: String,
    #[serde(rename = "Address")]
    address: String,
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "Latitude", deserialize_with = "csv::invalid_option")]
    latitude: Option<f64>,
    #[serde(rename = "Longitude", deserialize_with = "csv::invalid_option")]
    longitude: Option<f64>,
}

impl ShelterRow {
    fn into_record(self) -> Option<ShelterRecord> {
        let (Some(lat), Some(lon)) = (self.latitude, self.longitude) else {
            warn!("skipping shelter {:?}: missing coordinates", self.name);
            return None;
        };
        Some(ShelterRecord::new(
            self.name.trim(),
            self.address.trim(),
            self.city.trim(),
            Coord { x: lon, y: lat },
        ))
    }
}

/// Load the shelter registry from the CSV file at `path`.
///
/// # Errors
///
/// Returns [`ShelterLoadError`] when the file cannot be read, lacks a
/// required column, contains a malformed row, or has no usable shelters.
pub fn load_shelter_registry(path: &Utf8Path) -> Result<ShelterRegistry, ShelterLoadError> {
    let file = open_utf8_file(path).map_err(|source| ShelterLoadError::Open {
        path: path.to_owned(),
        source,
    })?;
    parse_shelter_registry(file, path)
}

/// Parse a shelter registry from CSV read from `reader`.
///
/// `source` names the input in errors and logs.
///
/// # Errors
///
/// See [`load_shelter_registry`]; [`ShelterLoadError::Open`] is never
/// returned.
pub fn parse_shelter_registry<R: Read>(
    reader: R,
    source: &Utf8Path,
) -> Result<ShelterRegistry, ShelterLoadError> {
    let mut table = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = table
        .headers()
        .map_err(|err| ShelterLoadError::ReadHeaders {
            path: source.to_owned(),
            source: err,
        })?
        .clone();
    let missing: Vec<&'static str> = REQUIRED_SHELTER_COLUMNS
        .into_iter()
        .filter(|column| !headers.iter().any(|header| header == *column))
        .collect();
    if !missing.is_empty() {
        return Err(ShelterLoadError::MissingColumns {
            path: source.to_owned(),
            missing,
        });
    }

    let mut records = Vec::new();
    let mut skipped = 0_usize;
    for row in table.deserialize::<ShelterRow>() {
        let row = row.map_err(|err| ShelterLoadError::ReadRow {
            path: source.to_owned(),
            line: err.position().map_or(0, csv::Position::line),
            source: err,
        })?;
        match row.into_record() {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }

    let registry = ShelterRegistry::new(records).map_err(|err| ShelterLoadError::Registry {
        path: source.to_owned(),
        source: err,
    })?;
    info!(
        "loaded {} shelters from {source} ({skipped} rows without coordinates, {} with unusable coordinates)",
        registry.len(),
        registry.excluded()
    );
    Ok(registry)
}
