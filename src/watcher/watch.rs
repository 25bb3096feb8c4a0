//! Watch loop and existing-save discovery

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, error, info};

use crate::error::{AdvisorError, AdvisorResult};
use crate::models::GameState;
use crate::parser::ParseSave;

use super::event::{is_existing_save, is_save_file, Debouncer};

/// Monitors a saves directory and turns qualifying file events into parsed
/// game states.
///
/// Lifecycle: construction validates the directory (Idle); [`watch`] registers
/// with the notification subsystem and loops (Watching) until the running
/// flag is cleared, then deregisters on exit (Stopped).
///
/// [`watch`]: SaveWatcher::watch
pub struct SaveWatcher {
    save_dir: PathBuf,
    parser: Arc<dyn ParseSave>,
    debounce: Duration,
}

impl SaveWatcher {
    /// Create a watcher for `save_dir`.
    ///
    /// A missing or non-directory path is a configuration error, raised here
    /// rather than at watch time.
    pub fn new(
        save_dir: impl Into<PathBuf>,
        parser: Arc<dyn ParseSave>,
        debounce: Duration,
    ) -> AdvisorResult<Self> {
        let save_dir = save_dir.into();
        if !save_dir.is_dir() {
            return Err(AdvisorError::DirectoryNotFound { path: save_dir });
        }

        info!(dir = %save_dir.display(), "initialized save watcher");
        Ok(Self {
            save_dir,
            parser,
            debounce,
        })
    }

    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }

    /// Watch for save-file changes (blocking).
    ///
    /// Blocks until `running` is cleared. Every accepted event is parsed and
    /// forwarded to `on_state`; parse failures are logged and dropped so the
    /// loop never dies on a bad file.
    pub fn watch(
        &self,
        running: Arc<AtomicBool>,
        on_state: &impl Fn(GameState),
    ) -> AdvisorResult<()> {
        let (tx, rx) = channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    for path in event.paths {
                        let _ = tx.send(path);
                    }
                }
            },
            Config::default(),
        )
        .map_err(|e| AdvisorError::Watch(e.to_string()))?;

        watcher
            .watch(&self.save_dir, RecursiveMode::NonRecursive)
            .map_err(|e| AdvisorError::Watch(e.to_string()))?;

        info!(dir = %self.save_dir.display(), "watching for save file changes");

        let mut debouncer = Debouncer::new(self.debounce);

        while running.load(Ordering::SeqCst) {
            // Check for file events (non-blocking with timeout) so the
            // running flag is re-read at a steady cadence
            if let Ok(path) = rx.recv_timeout(Duration::from_millis(50)) {
                self.handle_event(&path, &mut debouncer, on_state);
            }
        }

        // Dropping the watcher deregisters from the notification subsystem
        info!("stopped watching for save file changes");
        Ok(())
    }

    /// Filter, debounce, and parse a single modification event
    pub(crate) fn handle_event(
        &self,
        path: &Path,
        debouncer: &mut Debouncer,
        on_state: &impl Fn(GameState),
    ) {
        // Directories and already-removed files are not save events
        if !path.is_file() {
            return;
        }

        if !is_save_file(path) {
            return;
        }

        if !debouncer.accept(path) {
            debug!(path = %path.display(), "ignoring duplicate event");
            return;
        }

        info!(path = %path.display(), "save file modified");
        self.parse_and_forward(path, on_state);
    }

    /// Scan the directory for existing saves and process the most recent one
    /// exactly as a live event would, bypassing debounce.
    pub fn process_existing_saves(&self, on_state: &impl Fn(GameState)) {
        let entries = match std::fs::read_dir(&self.save_dir) {
            Ok(entries) => entries,
            Err(e) => {
                error!(dir = %self.save_dir.display(), error = %e, "failed to scan save directory");
                return;
            }
        };

        let mut latest: Option<(PathBuf, std::time::SystemTime)> = None;
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name,
                None => continue,
            };
            if !is_existing_save(name) {
                continue;
            }
            let modified = match entry.metadata().and_then(|m| m.modified()) {
                Ok(modified) => modified,
                Err(_) => continue,
            };
            let is_newer = match &latest {
                Some((_, newest)) => modified > *newest,
                None => true,
            };
            if is_newer {
                latest = Some((path, modified));
            }
        }

        let Some((path, _)) = latest else {
            info!("no existing save files found");
            return;
        };

        info!(path = %path.display(), "processing most recent save");
        self.parse_and_forward(&path, on_state);
    }

    fn parse_and_forward(&self, path: &Path, on_state: &impl Fn(GameState)) {
        match self.parser.parse(path) {
            Ok(state) => {
                // Machine-readable copy on stdout, one JSON document per line
                println!("{}", state.to_json());
                let _ = std::io::stdout().flush();
                on_state(state);
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to parse save file");
            }
        }
    }
}
