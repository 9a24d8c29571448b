//! Dataset validation and loading shared by the commands.

use camino::Utf8Path;
use shelter_core::{ShelterRegistry, StreetIndex};
use shelter_data::{load_shelter_registry, load_street_index, load_street_index_from_dir};
use tracing::warn;

use crate::CliError;

/// Fail unless `path` is an existing regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match shelter_data::fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Load the shelter registry; any failure is fatal.
pub(crate) fn load_shelters(path: &Utf8Path) -> Result<ShelterRegistry, CliError> {
    Ok(load_shelter_registry(path)?)
}

/// Load the street index, falling back to an empty index.
///
/// `explicit` wins over the datasets found in `data_dir`. Load failures are
/// logged, not returned.
pub(crate) fn load_streets(explicit: Option<&Utf8Path>, data_dir: &Utf8Path) -> StreetIndex {
    let loaded = match explicit {
        Some(path) => load_street_index(path),
        None => load_street_index_from_dir(data_dir),
    };
    loaded.unwrap_or_else(|err| {
        warn!(error = %err, "street suggestions disabled");
        StreetIndex::default()
    })
}
