//! Loopback HTTP query service
//!
//! Serves the capability manifest, the snapshot JSON Schema, and the
//! snapshot query endpoint, all reading from the shared [`SnapshotStore`].
//! The service never writes to the store.
//!
//! [`SnapshotStore`]: crate::store::SnapshotStore

mod handlers;
mod router;
mod service;
mod state;

pub use router::build_router;
pub use service::{QueryService, ServerConfig};
pub use state::AppState;
