//! Application coordinator
//!
//! Wires the watcher's output into the snapshot store and the downstream
//! collaborators (advisory client, terminal display), and owns the
//! startup/shutdown lifecycle: query service up first, existing saves
//! processed once, then the blocking watch loop until the running flag is
//! cleared.

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::advice::{AdviceClient, DisconnectedAdviceClient};
use crate::config::Config;
use crate::display::{StatusLevel, TerminalDisplay};
use crate::error::AdvisorResult;
use crate::models::GameState;
use crate::parser::SaveParser;
use crate::server::{QueryService, ServerConfig};
use crate::store::SnapshotStore;
use crate::watcher::SaveWatcher;

/// Coordinates watcher, store, query service and collaborators
pub struct Advisor {
    watcher: SaveWatcher,
    store: Arc<SnapshotStore>,
    service: QueryService,
    advice: Arc<dyn AdviceClient>,
    display: TerminalDisplay,
}

impl Advisor {
    /// Wire up all components; fails fast on configuration errors
    pub fn new(save_dir: impl Into<PathBuf>, config: &Config) -> AdvisorResult<Self> {
        let store = Arc::new(SnapshotStore::new(config.resolved_cache_file()));
        let watcher = SaveWatcher::new(
            save_dir,
            Arc::new(SaveParser::new()),
            Duration::from_millis(config.debounce_ms),
        )?;
        let service = QueryService::new(
            ServerConfig {
                host: config.query_host.clone(),
                port: config.query_port,
            },
            store.clone(),
        );
        let advice = Arc::new(DisconnectedAdviceClient::new(
            config.advisor_endpoint.clone(),
        ));

        info!("advisor initialized");
        Ok(Self {
            watcher,
            store,
            service,
            advice,
            display: TerminalDisplay::new(),
        })
    }

    /// Read access to the store, mainly for inspection in tests
    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    /// Start everything and block on the watch loop until `running` clears.
    ///
    /// Shutdown runs regardless of how the watch loop ends: the watcher has
    /// already deregistered by the time the loop returns, then the query
    /// service is stopped, with failures logged rather than propagated.
    pub fn run(&mut self, running: Arc<AtomicBool>) -> AdvisorResult<()> {
        self.service.start()?;

        let store = self.store.clone();
        let advice = self.advice.clone();
        let display = self.display;
        let on_state = move |state: GameState| {
            info!(turn = state.turn, "game state updated");
            store.update(state.clone());

            match advice.get_advice(&state) {
                Some(text) => display.show_advice(&state, &text),
                None => display.show_status("Waiting for advisor connection...", StatusLevel::Warning),
            }
        };

        info!("checking for existing save files");
        self.watcher.process_existing_saves(&on_state);

        self.display.show_status(
            &format!(
                "Heroes III AI Assistant started\nWatching: {}",
                self.watcher.save_dir().display()
            ),
            StatusLevel::Success,
        );

        let result = self.watcher.watch(running, &on_state);
        self.shutdown();
        result
    }

    fn shutdown(&mut self) {
        info!("stopping components");

        // The watcher stopped with its loop; stop the query service too and
        // keep going on failure so shutdown always completes.
        if let Err(e) = self.service.stop() {
            error!(error = %e, "failed to stop query service");
        }

        self.display.show_status("AI Assistant stopped", StatusLevel::Info);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::GZIP_STUB;
    use std::sync::atomic::AtomicBool;
    use tempfile::tempdir;

    fn test_config(dir: &std::path::Path) -> Config {
        Config {
            query_port: 0, // ephemeral port, no conflicts between tests
            cache_file: Some(dir.join("cache.json")),
            ..Config::default()
        }
    }

    #[test]
    fn test_run_with_empty_directory_leaves_store_empty() {
        let dir = tempdir().unwrap();
        let saves = dir.path().join("saves");
        std::fs::create_dir(&saves).unwrap();

        let mut advisor = Advisor::new(&saves, &test_config(dir.path())).unwrap();
        let running = Arc::new(AtomicBool::new(false)); // exit immediately

        advisor.run(running).unwrap();
        assert!(advisor.store().get_latest().is_none());
    }

    #[test]
    fn test_run_processes_existing_save_into_store() {
        let dir = tempdir().unwrap();
        let saves = dir.path().join("saves");
        std::fs::create_dir(&saves).unwrap();
        std::fs::write(saves.join("slot1.gm1"), GZIP_STUB).unwrap();

        let mut advisor = Advisor::new(&saves, &test_config(dir.path())).unwrap();
        let running = Arc::new(AtomicBool::new(false));

        advisor.run(running).unwrap();

        let cached = advisor.store().get_latest().unwrap();
        assert_eq!(cached.state.turn, 28);
    }

    #[test]
    fn test_missing_save_directory_fails_construction() {
        let dir = tempdir().unwrap();
        let result = Advisor::new(dir.path().join("gone"), &test_config(dir.path()));
        assert!(result.is_err());
    }
}
