//! Application state for the evaluation engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::{Arc, Mutex, PoisonError};

use crate::config::CatalogLoader;
use crate::store::InMemoryStore;

/// Shared application state.
///
/// Contains the loaded evaluation catalog and the record store shared
/// across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The loaded catalog configuration.
    catalog: Arc<CatalogLoader>,
    /// The evaluation record store.
    store: Arc<Mutex<InMemoryStore>>,
}

impl AppState {
    /// Creates a new application state with the given catalog loader and
    /// an empty record store.
    pub fn new(catalog: CatalogLoader) -> Self {
        Self {
            catalog: Arc::new(catalog),
            store: Arc::new(Mutex::new(InMemoryStore::new())),
        }
    }

    /// Returns a reference to the catalog loader.
    pub fn catalog(&self) -> &CatalogLoader {
        &self.catalog
    }

    /// Locks and returns the record store.
    pub fn store(&self) -> std::sync::MutexGuard<'_, InMemoryStore> {
        // A poisoned lock only means a handler panicked mid-request; the
        // store itself stays consistent because batches are atomic.
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
