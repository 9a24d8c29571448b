//! Command-line interface for the shelter finder.
//!
//! `serve` runs the HTTP API and front-end; `nearest` answers a single lookup
//! on standard output.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod datasets;
mod error;
mod geocoder;
mod nearest;
mod serve;
pub mod server;

pub use error::CliError;

pub(crate) const ARG_HOST: &str = "host";
pub(crate) const ARG_PORT: &str = "port";
pub(crate) const ARG_DATA_DIR: &str = "data-dir";
pub(crate) const ARG_SHELTERS_CSV: &str = "shelters-csv";
pub(crate) const ARG_STREETS_CSV: &str = "streets-csv";
pub(crate) const ARG_STATIC_BASE: &str = "static-base";
pub(crate) const ARG_NOMINATIM_URL: &str = "nominatim-url";
pub(crate) const ARG_GEOCODE_TIMEOUT: &str = "geocode-timeout-secs";
pub(crate) const ARG_USER_AGENT: &str = "user-agent";
pub(crate) const ARG_GEOCODER_EMAIL: &str = "geocoder-email";
pub(crate) const ARG_ADDRESS: &str = "address";
pub(crate) const ENV_NEAREST_ADDRESS: &str = "SHELTER_CMDS_NEAREST_ADDRESS";

pub(crate) const DEFAULT_HOST: &str = "127.0.0.1";
pub(crate) const DEFAULT_PORT: u16 = 5000;
pub(crate) const DEFAULT_DATA_DIR: &str = "dataset";
pub(crate) const SHELTERS_FILE: &str = "rifugi_locations.csv";

const DEFAULT_LOG_FILTER: &str = "info";

/// Run the shelter finder CLI with the current process arguments and
/// environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    init_logging();
    match cli.command {
        Command::Serve(args) => serve::run_serve(args),
        Command::Nearest(args) => nearest::run_nearest(args),
    }
}

/// Install the `tracing` subscriber.
///
/// `RUST_LOG` overrides the default `info` filter. `log` records from the
/// library crates are forwarded to the same subscriber.
fn init_logging() {
    let installed = tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
    if installed.is_err() {
        tracing::debug!("logging already initialised");
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "shelter-finder",
    about = "Find the animal shelter closest to an address",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the JSON API and the static front-end.
    Serve(serve::ServeArgs),
    /// Print the shelter closest to one address as JSON.
    Nearest(nearest::NearestArgs),
}

#[cfg(test)]
mod tests;
