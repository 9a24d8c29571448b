//! `serve` command: run the HTTP API and static front-end.

use std::sync::Arc;

use axum::Router;
use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use shelter_core::ShelterContext;
use shelter_data::geocoding::NominatimGeocoder;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::datasets::{load_shelters, load_streets, require_existing};
use crate::geocoder::GeocoderSettings;
use crate::server::{StaticFiles, router};
use crate::{
    ARG_DATA_DIR, ARG_GEOCODE_TIMEOUT, ARG_GEOCODER_EMAIL, ARG_HOST, ARG_NOMINATIM_URL, ARG_PORT,
    ARG_SHELTERS_CSV, ARG_STATIC_BASE, ARG_STREETS_CSV, ARG_USER_AGENT, CliError,
    DEFAULT_DATA_DIR, DEFAULT_HOST, DEFAULT_PORT, SHELTERS_FILE,
};

const ENV_SERVE_HOST: &str = "SHELTER_CMDS_SERVE_HOST";

/// CLI arguments for the `serve` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Load the shelter and street datasets, then serve the JSON \
                 API and the static front-end. Options can come from CLI \
                 flags, configuration files, or environment variables.",
    about = "Serve the shelter finder API"
)]
#[ortho_config(prefix = "SHELTER")]
pub(crate) struct ServeArgs {
    /// Interface to listen on.
    #[arg(long = ARG_HOST, value_name = "host")]
    #[serde(default)]
    pub(crate) host: Option<String>,
    /// TCP port to listen on.
    #[arg(long = ARG_PORT, value_name = "port")]
    #[serde(default)]
    pub(crate) port: Option<u16>,
    /// Directory holding the default dataset filenames.
    #[arg(long = ARG_DATA_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) data_dir: Option<Utf8PathBuf>,
    /// Override the path to the shelter dataset (`rifugi_locations.csv`).
    #[arg(long = ARG_SHELTERS_CSV, value_name = "path")]
    #[serde(default)]
    pub(crate) shelters_csv: Option<Utf8PathBuf>,
    /// Override the path to the street dataset.
    #[arg(long = ARG_STREETS_CSV, value_name = "path")]
    #[serde(default)]
    pub(crate) streets_csv: Option<Utf8PathBuf>,
    /// Directory searched for the front-end folder.
    #[arg(long = ARG_STATIC_BASE, value_name = "dir")]
    #[serde(default)]
    pub(crate) static_base: Option<Utf8PathBuf>,
    /// Base URL of the Nominatim-compatible geocoder.
    #[arg(long = ARG_NOMINATIM_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) nominatim_url: Option<String>,
    /// Geocoder request timeout in seconds.
    #[arg(long = ARG_GEOCODE_TIMEOUT, value_name = "secs")]
    #[serde(default)]
    pub(crate) geocode_timeout_secs: Option<u64>,
    /// `User-Agent` sent to the geocoder.
    #[arg(long = ARG_USER_AGENT, value_name = "agent")]
    #[serde(default)]
    pub(crate) user_agent: Option<String>,
    /// Contact email sent to the geocoder.
    #[arg(long = ARG_GEOCODER_EMAIL, value_name = "email")]
    #[serde(default)]
    pub(crate) geocoder_email: Option<String>,
}

impl ServeArgs {
    pub(crate) fn into_config(self) -> Result<ServeConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ServeConfig::try_from(merged)
    }
}

/// Resolved `serve` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ServeConfig {
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) data_dir: Utf8PathBuf,
    pub(crate) shelters_csv: Utf8PathBuf,
    pub(crate) streets_csv: Option<Utf8PathBuf>,
    pub(crate) static_base: Utf8PathBuf,
    pub(crate) geocoder: GeocoderSettings,
}

impl ServeConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.shelters_csv, ARG_SHELTERS_CSV)?;
        if let Some(streets) = &self.streets_csv {
            require_existing(streets, ARG_STREETS_CSV)?;
        }
        Ok(())
    }

    /// `host:port` as shown in logs and errors.
    pub(crate) fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl TryFrom<ServeArgs> for ServeConfig {
    type Error = CliError;

    fn try_from(args: ServeArgs) -> Result<Self, Self::Error> {
        let host = args
            .host
            .map(|host| host.trim().to_owned())
            .unwrap_or_else(|| DEFAULT_HOST.to_owned());
        if host.is_empty() {
            return Err(CliError::MissingArgument {
                field: ARG_HOST,
                env: ENV_SERVE_HOST,
            });
        }
        let data_dir = args
            .data_dir
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATA_DIR));
        let shelters_csv = args
            .shelters_csv
            .unwrap_or_else(|| data_dir.join(SHELTERS_FILE));
        Ok(Self {
            host,
            port: args.port.unwrap_or(DEFAULT_PORT),
            shelters_csv,
            streets_csv: args.streets_csv,
            static_base: args.static_base.unwrap_or_else(|| Utf8PathBuf::from(".")),
            geocoder: GeocoderSettings::from_options(
                args.nominatim_url,
                args.geocode_timeout_secs,
                args.user_agent,
                args.geocoder_email,
            ),
            data_dir,
        })
    }
}

fn build_context(config: &ServeConfig) -> Result<ShelterContext<NominatimGeocoder>, CliError> {
    let registry = load_shelters(&config.shelters_csv)?;
    let streets = load_streets(config.streets_csv.as_deref(), &config.data_dir);
    let geocoder = config.geocoder.build()?;
    Ok(ShelterContext::new(registry, streets, geocoder))
}

pub(super) fn run_serve(args: ServeArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let context = Arc::new(build_context(&config)?);
    let static_files = StaticFiles::discover(&config.static_base);
    if static_files.is_none() {
        warn!(base = %config.static_base, "no front-end directory found; serving the API only");
    }
    let app = router(Arc::clone(&context), static_files.as_ref());

    // Dropped before `context`: the geocoder's own runtime must not be
    // dropped inside this one.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    runtime.block_on(serve_http(&config, app))
}

async fn serve_http(config: &ServeConfig, app: Router) -> Result<(), CliError> {
    let addr = config.listen_addr();
    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .map_err(|source| CliError::Bind {
            addr: addr.clone(),
            source,
        })?;
    info!("listening on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(CliError::Serve)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutting down"),
        Err(err) => {
            warn!(error = %err, "failed to listen for ctrl-c; running until killed");
            std::future::pending::<()>().await;
        }
    }
}
