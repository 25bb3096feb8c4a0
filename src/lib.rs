//! h3advisor - Heroes III + HotA save watcher and game-state query server
//!
//! Watches a saves directory for `.gm1`..`.gm6` changes, extracts a snapshot
//! of player-visible game state, caches the latest snapshot with atomic
//! on-disk persistence, and serves it over a small loopback HTTP API for an
//! external advisory client.

pub mod advice;
pub mod app;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod parser;
pub mod server;
pub mod store;
pub mod watcher;

// Re-exports for convenience
pub use advice::{AdviceClient, DisconnectedAdviceClient};
pub use app::Advisor;
pub use config::Config;
pub use display::{StatusLevel, TerminalDisplay};
pub use error::{AdvisorError, AdvisorResult};
pub use models::GameState;
pub use parser::{ParseSave, SaveParser};
pub use server::{build_router, AppState, QueryService, ServerConfig};
pub use store::{CachedState, SnapshotStore};
pub use watcher::SaveWatcher;
