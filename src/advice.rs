//! Advisory client collaborator
//!
//! The advisor asks an external client for strategic advice once per
//! accepted snapshot. Absence of advice means "not yet available", not an
//! error; the coordinator shows a waiting status instead.

use crate::models::GameState;

/// External advisory client queried once per accepted snapshot
pub trait AdviceClient: Send + Sync {
    /// Request advice for a snapshot; `None` when no advisor is reachable
    fn get_advice(&self, state: &GameState) -> Option<String>;
}

/// Placeholder client for running without a connected advisor.
///
/// Keeps the endpoint from configuration so a future connected client can
/// slot in without touching the coordinator.
#[derive(Debug, Clone)]
pub struct DisconnectedAdviceClient {
    endpoint: String,
}

impl DisconnectedAdviceClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl AdviceClient for DisconnectedAdviceClient {
    fn get_advice(&self, _state: &GameState) -> Option<String> {
        None
    }
}
