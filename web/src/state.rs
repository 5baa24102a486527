//! Application state for Axum handlers.
//!
//! The registration store is constructed once at startup and shared by
//! every handler through this state. Cloning is cheap (an `Arc` bump).

use checkin_core::RegistrationStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// # Examples
///
/// ```ignore
/// let store = SqliteRegistrationStore::connect("sqlite://db.sqlite").await?;
/// store.initialize().await?;
///
/// let app = build_router(AppState::new(store, "./static"));
/// ```
pub struct AppState<S> {
    store: Arc<S>,
    static_dir: Arc<PathBuf>,
}

impl<S: RegistrationStore> AppState<S> {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// - `store`: Registration store used by `/scan` and `/results`
    /// - `static_dir`: Directory holding `index.html`, `doc.html` and assets
    pub fn new(store: S, static_dir: impl Into<PathBuf>) -> Self {
        Self::from_shared(Arc::new(store), static_dir)
    }

    /// Create a state around a store the caller keeps a handle to.
    pub fn from_shared(store: Arc<S>, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            static_dir: Arc::new(static_dir.into()),
        }
    }
}

impl<S> AppState<S> {
    /// The registration store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Directory static pages are served from.
    #[must_use]
    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }
}

// Manual impl: `S` itself need not be `Clone`
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            static_dir: Arc::clone(&self.static_dir),
        }
    }
}
