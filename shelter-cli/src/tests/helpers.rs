//! Fixtures shared by the CLI and router tests.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use camino::{Utf8Path, Utf8PathBuf};
use geo::Coord;
use serde_json::Value;
use shelter_core::test_support::{StubGeocoder, shelter_north_of};
use shelter_core::{ShelterContext, ShelterRegistry, StreetEntry, StreetIndex};
use tempfile::TempDir;
use tower::ServiceExt;

pub(super) const USER: Coord<f64> = Coord {
    x: -118.1937,
    y: 33.7701,
};

pub(super) const SHELTERS_HEADER: &str = "Latitude,Longitude,Shelter_Name,Address,City\n";

pub(super) fn utf8_root(dir: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace")
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent directories");
    }
    std::fs::write(path, contents).expect("write fixture");
}

pub(super) fn registry() -> ShelterRegistry {
    ShelterRegistry::new(vec![
        shelter_north_of(USER, 5.0, "five"),
        shelter_north_of(USER, 1.0, "one"),
        shelter_north_of(USER, 10.0, "ten"),
    ])
    .expect("registry should build")
}

pub(super) fn streets() -> StreetIndex {
    StreetIndex::new(vec![
        StreetEntry::new("Black Cherry Ln", "Long Beach", "CA"),
        StreetEntry::new("Cherry Ave", "Long Beach", "CA"),
        StreetEntry::new("Pine Ave", "Long Beach", "CA"),
    ])
}

pub(super) fn context(stub: StubGeocoder) -> Arc<ShelterContext<StubGeocoder>> {
    Arc::new(ShelterContext::new(registry(), streets(), stub))
}

pub(super) fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request should build")
}

pub(super) fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_owned()))
        .expect("request should build")
}

pub(super) async fn send_raw(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    (status, bytes.to_vec())
}

pub(super) async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, bytes) = send_raw(app, request).await;
    let json = serde_json::from_slice(&bytes).expect("body should be JSON");
    (status, json)
}
