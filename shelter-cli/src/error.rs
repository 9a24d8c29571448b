//! Error types emitted by the shelter finder CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use shelter_core::NearestError;
use shelter_data::geocoding::ProviderBuildError;
use shelter_data::ShelterLoadError;
use thiserror::Error;

/// Errors emitted by the shelter finder CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Loading the shelter dataset failed.
    #[error(transparent)]
    LoadShelters(#[from] Box<ShelterLoadError>),
    /// Constructing the geocoding client failed.
    #[error("failed to build geocoder for {base_url:?}: {source}")]
    BuildGeocoder {
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// The lookup rejected its input.
    #[error("lookup failed: {0}")]
    Nearest(#[from] NearestError),
    /// The async runtime could not be started.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// The listener could not bind its address.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    /// The HTTP server stopped with an error.
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
    /// Serializing the lookup result failed.
    #[error("failed to serialize lookup result: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing the lookup result failed.
    #[error("failed to write lookup result: {0}")]
    WriteOutput(#[source] std::io::Error),
}

impl From<ShelterLoadError> for CliError {
    fn from(err: ShelterLoadError) -> Self {
        Self::LoadShelters(Box::new(err))
    }
}
