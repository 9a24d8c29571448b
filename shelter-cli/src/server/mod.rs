//! HTTP API and static front-end.
//!
//! | Route                     | Method | Handler                        |
//! |---------------------------|--------|--------------------------------|
//! | `/api/nearest`            | POST   | [`handlers::nearest`]          |
//! | `/api/suggest-street`     | GET    | [`handlers::suggest_street`]   |
//! | `/api/geocode-street`     | POST   | [`handlers::geocode_street`]   |
//! | `/api/debug-sample`       | GET    | [`handlers::debug_sample`]     |
//!
//! Every other path falls through to the static front-end when one is
//! mounted. CORS is permissive on all routes.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use shelter_core::{Geocoder, ShelterContext};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod handlers;
pub mod payload;
pub mod static_files;

pub use static_files::{STATIC_DIR_CANDIDATES, StaticFiles};

/// Build the application router around a shared context.
pub fn router<G>(context: Arc<ShelterContext<G>>, static_files: Option<&StaticFiles>) -> Router
where
    G: Geocoder + Send + Sync + 'static,
{
    let api = Router::new()
        .route("/api/nearest", post(handlers::nearest::<G>))
        .route("/api/suggest-street", get(handlers::suggest_street::<G>))
        .route("/api/geocode-street", post(handlers::geocode_street::<G>))
        .route("/api/debug-sample", get(handlers::debug_sample::<G>))
        .with_state(context);
    let app = match static_files {
        Some(files) => files.mount(api),
        None => api,
    };
    app.layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
