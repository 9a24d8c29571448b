//! Data access for the shelter finder.
//!
//! Responsibilities:
//! - Load the shelter and street CSV datasets into `shelter-core` types.
//! - Provide the HTTP geocoder used in production.
//!
//! Boundaries:
//! - Do not encode lookup rules (live in `shelter-core`).
//! - Keep blocking I/O off async executors; the geocoder bridges to its own
//!   runtime when no multi-threaded runtime is available.
//!
//! Invariants:
//! - Loaders never panic on malformed input; they report structured errors.
//! - No global mutable state.

#![forbid(unsafe_code)]

pub mod fs;
pub mod geocoding;
pub mod shelters;
pub mod streets;

pub use shelters::{
    REQUIRED_SHELTER_COLUMNS, ShelterLoadError, load_shelter_registry, parse_shelter_registry,
};
pub use streets::{
    ENRICHED_STREETS_FILE, StreetLoadError, UNIQUE_STREETS_FILE, load_street_index,
    load_street_index_from_dir, locate_street_csv, parse_street_index,
};
