//! Street dataset loader for autocomplete.
//!
//! The enriched dataset (with coordinates and postcodes) is preferred over the
//! plain list of unique street names. Only the `name` column is required.

use std::io::Read;

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};
use serde::Deserialize;
use shelter_core::{StreetEntry, StreetIndex};
use thiserror::Error;

use crate::fs::{file_is_file, open_utf8_file};

/// Street dataset with coordinates and postcodes.
pub const ENRICHED_STREETS_FILE: &str = "strade_all_enriched.csv";

/// Street dataset with names, cities and states only.
pub const UNIQUE_STREETS_FILE: &str = "strade_all_unique.csv";

/// Errors raised while loading the street dataset.
#[derive(Debug, Error)]
pub enum StreetLoadError {
    /// Neither street dataset exists in the data directory.
    #[error("no street dataset ({ENRICHED_STREETS_FILE} or {UNIQUE_STREETS_FILE}) in {data_dir}")]
    NotFound {
        /// Directory that was searched.
        data_dir: Utf8PathBuf,
    },
    /// The file could not be opened.
    #[error("failed to open street dataset {path}: {source}")]
    Open {
        /// Dataset path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The header row could not be read.
    #[error("failed to read headers of street dataset {path}: {source}")]
    ReadHeaders {
        /// Dataset path.
        path: Utf8PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },
    /// The `name` column is absent.
    #[error("street dataset {path} has no 'name' column")]
    MissingNameColumn {
        /// Dataset path.
        path: Utf8PathBuf,
    },
    /// A data row could not be decoded.
    #[error("failed to read street dataset {path}: {source}")]
    ReadRow {
        /// Dataset path.
        path: Utf8PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },
}

#[derive(Debug, Deserialize)]
struct StreetRow {
    name: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    state: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    lat: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    lon: Option<f64>,
    #[serde(default)]
    postcode: Option<String>,
}

impl StreetRow {
    fn into_entry(self) -> Option<StreetEntry> {
        if self.name.trim().is_empty() {
            return None;
        }
        let mut entry = StreetEntry::new(&self.name, &self.city, &self.state);
        entry.lat = self.lat.filter(|v| v.is_finite());
        entry.lon = self.lon.filter(|v| v.is_finite());
        entry.postcode = self
            .postcode
            .map(|p| p.trim().to_owned())
            .filter(|p| !p.is_empty());
        Some(entry)
    }
}

/// Find the street dataset in `data_dir`, preferring the enriched file.
pub fn locate_street_csv(data_dir: &Utf8Path) -> Option<Utf8PathBuf> {
    [ENRICHED_STREETS_FILE, UNIQUE_STREETS_FILE]
        .into_iter()
        .map(|name| data_dir.join(name))
        .find(|path| file_is_file(path).unwrap_or(false))
}

/// Load the street index from the CSV file at `path`.
///
/// # Errors
///
/// Returns [`StreetLoadError`] when the file cannot be read, lacks a `name`
/// column or contains a malformed row.
pub fn load_street_index(path: &Utf8Path) -> Result<StreetIndex, StreetLoadError> {
    let file = open_utf8_file(path).map_err(|source| StreetLoadError::Open {
        path: path.to_owned(),
        source,
    })?;
    parse_street_index(file, path)
}

/// Load the preferred street dataset found in `data_dir`.
///
/// # Errors
///
/// Returns [`StreetLoadError::NotFound`] when neither dataset exists, or any
/// error from [`load_street_index`].
pub fn load_street_index_from_dir(data_dir: &Utf8Path) -> Result<StreetIndex, StreetLoadError> {
    let path = locate_street_csv(data_dir).ok_or_else(|| StreetLoadError::NotFound {
        data_dir: data_dir.to_owned(),
    })?;
    load_street_index(&path)
}

/// Parse a street index from CSV read from `reader`.
///
/// `source` names the input in errors and logs.
///
/// # Errors
///
/// See [`load_street_index`].
pub fn parse_street_index<R: Read>(
    reader: R,
    source: &Utf8Path,
) -> Result<StreetIndex, StreetLoadError> {
    let mut table = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let has_name = table
        .headers()
        .map_err(|err| StreetLoadError::ReadHeaders {
            path: source.to_owned(),
            source: err,
        })?
        .iter()
        .any(|header| header == "name");
    if !has_name {
        return Err(StreetLoadError::MissingNameColumn {
            path: source.to_owned(),
        });
    }

    let mut entries = Vec::new();
    let mut skipped = 0_usize;
    for row in table.deserialize::<StreetRow>() {
        let row = row.map_err(|err| StreetLoadError::ReadRow {
            path: source.to_owned(),
            source: err,
        })?;
        match row.into_entry() {
            Some(entry) => entries.push(entry),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        debug!("skipped {skipped} unnamed streets in {source}");
    }
    let index = StreetIndex::new(entries);
    info!("loaded {} streets from {source}", index.len());
    Ok(index)
}
