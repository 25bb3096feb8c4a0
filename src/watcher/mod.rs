//! Save-file watcher for continuous state extraction
//!
//! Watches the saves directory with:
//! - Per-path debouncing (1s default, configurable)
//! - Case-insensitive `.gm1`..`.gm6` extension filtering
//! - Graceful Ctrl+C shutdown via a shared running flag
//! - JSON-line output of every accepted snapshot for machine consumers

mod event;
mod watch;

pub use event::{Debouncer, SAVE_EXTENSIONS};
pub use watch::SaveWatcher;
