//! Event filtering and debounce state

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Recognized save-file extensions (single- through six-player slots)
pub const SAVE_EXTENSIONS: [&str; 6] = ["gm1", "gm2", "gm3", "gm4", "gm5", "gm6"];

/// Check whether a path carries a recognized save extension, case-insensitive
pub(crate) fn is_save_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let lower = ext.to_ascii_lowercase();
            SAVE_EXTENSIONS.contains(&lower.as_str())
        })
        .unwrap_or(false)
}

/// Discovery patterns for pre-existing saves: `*.gm1`, `*.GM1`, and the
/// HD-mod `autosave_*.gm1` convention
pub(crate) fn is_existing_save(name: &str) -> bool {
    name.ends_with(".gm1")
        || name.ends_with(".GM1")
        || (name.starts_with("autosave_") && name.ends_with(".gm1"))
}

/// Per-path debounce state
///
/// Tracks the last *accepted* event per exact path; a new event within the
/// window of that timestamp is discarded. State is ephemeral and dropped
/// with the watcher.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    last_accepted: HashMap<PathBuf, Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_accepted: HashMap::new(),
        }
    }

    /// Accept or discard an event for `path`, recording the timestamp on accept
    pub fn accept(&mut self, path: &Path) -> bool {
        let now = Instant::now();
        if let Some(last) = self.last_accepted.get(path) {
            if now.duration_since(*last) < self.window {
                return false;
            }
        }
        self.last_accepted.insert(path.to_path_buf(), now);
        true
    }
}
