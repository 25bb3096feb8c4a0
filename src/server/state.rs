//! Shared application state for the query service

use std::sync::Arc;

use crate::store::SnapshotStore;

/// State injected into handlers via Axum's `State` extractor.
///
/// The store is the only shared mutable resource; it synchronizes
/// internally, so handlers hold no locks of their own.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SnapshotStore>,
}

impl AppState {
    pub fn new(store: Arc<SnapshotStore>) -> Self {
        Self { store }
    }
}
