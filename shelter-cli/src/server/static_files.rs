//! Front-end discovery and static file serving.

use axum::Router;
use camino::{Utf8Path, Utf8PathBuf};
use shelter_data::fs::{dir_exists, find_file};
use tower_http::services::{ServeDir, ServeFile};
use tracing::{info, warn};

/// Directory names searched for the front-end, in order of preference.
pub const STATIC_DIR_CANDIDATES: [&str; 3] = ["front-end", "frontend", "front_end"];

const INDEX_FILE: &str = "index.html";

/// Location of the front-end assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticFiles {
    root: Utf8PathBuf,
    index: Option<Utf8PathBuf>,
}

impl StaticFiles {
    /// Serve `root`, answering `/` with `index` when given.
    pub fn new(root: impl Into<Utf8PathBuf>, index: Option<Utf8PathBuf>) -> Self {
        Self {
            root: root.into(),
            index,
        }
    }

    /// Find the front-end under `base`.
    ///
    /// The root is the first candidate directory holding an `index.html`
    /// anywhere below it, or else the first candidate that exists. Returns
    /// `None` when no candidate exists.
    pub fn discover(base: &Utf8Path) -> Option<Self> {
        let existing: Vec<Utf8PathBuf> = STATIC_DIR_CANDIDATES
            .into_iter()
            .map(|name| base.join(name))
            .filter(|dir| dir_exists(dir))
            .collect();
        for dir in &existing {
            match find_file(dir, INDEX_FILE) {
                Ok(Some(index)) => {
                    info!(root = %dir, index = %index, "serving front-end");
                    return Some(Self::new(dir.clone(), Some(index)));
                }
                Ok(None) => {}
                Err(err) => warn!(root = %dir, error = %err, "failed to search front-end"),
            }
        }
        let root = existing.into_iter().next()?;
        warn!(root = %root, "front-end has no {INDEX_FILE}");
        Some(Self::new(root, None))
    }

    /// Static root directory.
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Path of the index page, if one was found.
    pub fn index(&self) -> Option<&Utf8Path> {
        self.index.as_deref()
    }

    /// Mount the assets on `router`.
    ///
    /// `/` serves the index page. Other paths are served from the root and
    /// then from the directory holding the index page.
    pub fn mount(&self, router: Router) -> Router {
        let files = ServeDir::new(&self.root);
        match &self.index {
            Some(index) => {
                let index_dir = index
                    .parent()
                    .map_or_else(|| self.root.clone(), Utf8Path::to_owned);
                router
                    .route_service("/", ServeFile::new(index))
                    .fallback_service(files.fallback(ServeDir::new(index_dir)))
            }
            None => router.fallback_service(files),
        }
    }
}
