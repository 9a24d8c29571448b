//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use shelter_cli::CliError;

fn main() {
    match shelter_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("shelter-finder: {err}");
            std::process::exit(1);
        }
    }
}
