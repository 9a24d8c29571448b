//! `nearest` command: one lookup printed as JSON.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use shelter_core::{AddressResolver, Geocoder, find_nearest};

use crate::datasets::{load_shelters, require_existing};
use crate::geocoder::GeocoderSettings;
use crate::server::payload::NearestResponse;
use crate::{
    ARG_ADDRESS, ARG_DATA_DIR, ARG_GEOCODE_TIMEOUT, ARG_GEOCODER_EMAIL, ARG_NOMINATIM_URL,
    ARG_SHELTERS_CSV, ARG_USER_AGENT, CliError, DEFAULT_DATA_DIR, ENV_NEAREST_ADDRESS,
    SHELTERS_FILE,
};

/// CLI arguments for the `nearest` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Geocode an address and print the closest shelter as the \
                 same JSON document the HTTP API returns.",
    about = "Find the shelter closest to an address"
)]
#[ortho_config(prefix = "SHELTER")]
pub(crate) struct NearestArgs {
    /// Street address to search from.
    #[arg(value_name = "address")]
    #[serde(default)]
    pub(crate) address: Option<String>,
    /// Directory holding the default dataset filenames.
    #[arg(long = ARG_DATA_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) data_dir: Option<Utf8PathBuf>,
    /// Override the path to the shelter dataset (`rifugi_locations.csv`).
    #[arg(long = ARG_SHELTERS_CSV, value_name = "path")]
    #[serde(default)]
    pub(crate) shelters_csv: Option<Utf8PathBuf>,
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

impl NearestArgs {
    pub(crate) fn into_config(self) -> Result<NearestConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        NearestConfig::try_from(merged)
    }
}

/// Resolved `nearest` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NearestConfig {
    pub(crate) address: String,
    pub(crate) shelters_csv: Utf8PathBuf,
    pub(crate) geocoder: GeocoderSettings,
}

impl NearestConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.shelters_csv, ARG_SHELTERS_CSV)
    }
}

impl TryFrom<NearestArgs> for NearestConfig {
    type Error = CliError;

    fn try_from(args: NearestArgs) -> Result<Self, Self::Error> {
        let address = args
            .address
            .filter(|address| !address.trim().is_empty())
            .ok_or(CliError::MissingArgument {
                field: ARG_ADDRESS,
                env: ENV_NEAREST_ADDRESS,
            })?;
        let shelters_csv = args.shelters_csv.unwrap_or_else(|| {
            args.data_dir
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATA_DIR))
                .join(SHELTERS_FILE)
        });
        Ok(Self {
            address,
            shelters_csv,
            geocoder: GeocoderSettings::from_options(
                args.nominatim_url,
                args.geocode_timeout_secs,
                args.user_agent,
                args.geocoder_email,
            ),
        })
    }
}

/// Builds the geocoder for a `nearest` invocation.
pub(super) trait NearestGeocoderBuilder {
    fn build(&self, settings: &GeocoderSettings) -> Result<Box<dyn Geocoder>, CliError>;
}

pub(super) struct DefaultNearestGeocoderBuilder;

impl NearestGeocoderBuilder for DefaultNearestGeocoderBuilder {
    fn build(&self, settings: &GeocoderSettings) -> Result<Box<dyn Geocoder>, CliError> {
        Ok(Box::new(settings.build()?))
    }
}

pub(super) fn run_nearest(args: NearestArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    let mut stdout = std::io::stdout().lock();
    run_nearest_with(&config, &DefaultNearestGeocoderBuilder, &mut stdout)
}

pub(super) fn run_nearest_with(
    config: &NearestConfig,
    builder: &dyn NearestGeocoderBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let response = execute_nearest(config, builder)?;
    write_nearest_response(writer, &response)
}

fn execute_nearest(
    config: &NearestConfig,
    builder: &dyn NearestGeocoderBuilder,
) -> Result<NearestResponse, CliError> {
    config.validate_sources()?;
    let registry = load_shelters(&config.shelters_csv)?;
    let resolver = AddressResolver::new(builder.build(&config.geocoder)?);
    let outcome = find_nearest(&resolver, &registry, &config.address)?;
    Ok(outcome.into())
}

fn write_nearest_response(
    writer: &mut dyn Write,
    response: &NearestResponse,
) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(response).map_err(CliError::SerializeOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
