//! Query service lifecycle management
//!
//! The service owns a background thread running a single-threaded Tokio
//! runtime; the rest of the application stays synchronous. Binding happens
//! eagerly in [`QueryService::start`] so port conflicts surface as startup
//! errors instead of a dead background thread.

use std::net::SocketAddr;
use std::sync::Arc;
use std::thread::JoinHandle;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{error, info};

use crate::error::{AdvisorError, AdvisorResult};
use crate::server::router::build_router;
use crate::server::state::AppState;
use crate::store::SnapshotStore;

/// Configuration for the query service
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to; loopback by default
    pub host: String,
    /// TCP port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: crate::config::DEFAULT_QUERY_PORT,
        }
    }
}

/// HTTP query service over the snapshot store
pub struct QueryService {
    config: ServerConfig,
    state: Arc<AppState>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl QueryService {
    pub fn new(config: ServerConfig, store: Arc<SnapshotStore>) -> Self {
        Self {
            config,
            state: Arc::new(AppState::new(store)),
            shutdown: None,
            handle: None,
        }
    }

    /// Bind and start serving in the background.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError::Server`] if the address is invalid or the
    /// TCP listener cannot bind.
    pub fn start(&mut self) -> AdvisorResult<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|e| AdvisorError::Server(format!("invalid address: {e}")))?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| AdvisorError::Server(format!("runtime: {e}")))?;

        let listener = runtime
            .block_on(TcpListener::bind(addr))
            .map_err(|e| AdvisorError::Server(format!("bind failed on {addr}: {e}")))?;

        let router = build_router(self.state.clone());
        let (tx, rx) = oneshot::channel::<()>();

        let handle = std::thread::Builder::new()
            .name("query-service".to_string())
            .spawn(move || {
                runtime.block_on(async move {
                    info!(%addr, "query service listening");
                    let serve = axum::serve(listener, router).with_graceful_shutdown(async {
                        let _ = rx.await;
                    });
                    if let Err(e) = serve.await {
                        error!(error = %e, "query service terminated");
                    }
                });
            })
            .map_err(|e| AdvisorError::Server(format!("spawn failed: {e}")))?;

        self.shutdown = Some(tx);
        self.handle = Some(handle);
        Ok(())
    }

    /// Signal graceful shutdown and join the serving thread
    pub fn stop(&mut self) -> AdvisorResult<()> {
        if let Some(tx) = self.shutdown.take() {
            // Receiver gone means the server already exited
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| AdvisorError::Server("query service thread panicked".to_string()))?;
            info!("query service stopped");
        }
        Ok(())
    }
}

impl Drop for QueryService {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            error!(error = %e, "query service shutdown failed");
        }
    }
}
