//! Endpoint handlers for the query service
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/manifest` | Capability descriptor |
//! | `GET`  | `/schema/snapshot.json` | JSON Schema for the snapshot |
//! | `POST` | `/query/snapshot` | Latest cached game state |
//!
//! "No snapshot yet" and "turn mismatch" are expected steady states and are
//! answered with 200 plus an `{error, message}` payload, never an HTTP error.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::server::state::AppState;

/// `GET /manifest` -- static capability descriptor
pub async fn manifest() -> Json<Value> {
    Json(json!({
        "schema_version": "v0.3",
        "name": "HeroesHotAState",
        "description": "Provides player-visible state from Heroes III HotA games",
        "context_sources": [
            {
                "id": "snapshot",
                "name": "Latest GameState JSON",
                "description": "Current visible map, heroes and towns for the human player",
                "schema": "/schema/snapshot.json",
                "query_endpoint": "/query/snapshot"
            }
        ]
    }))
}

/// `GET /schema/snapshot.json` -- static JSON Schema for [`GameState`]
///
/// [`GameState`]: crate::models::GameState
pub async fn schema() -> Json<Value> {
    Json(json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "title": "GameState",
        "description": "Heroes III game state visible to the current player",
        "type": "object",
        "required": ["turn", "currentPlayer", "visibleTiles", "heroes", "towns"],
        "properties": {
            "turn": {
                "type": "integer",
                "description": "Current game turn (day)",
                "minimum": 1
            },
            "currentPlayer": {
                "type": "integer",
                "description": "Current player ID (0-7)",
                "minimum": 0,
                "maximum": 7
            },
            "visibleTiles": {
                "type": "array",
                "description": "Map tiles visible to the player",
                "items": {
                    "type": "object",
                    "required": ["x", "y", "obj"],
                    "properties": {
                        "x": {"type": "integer"},
                        "y": {"type": "integer"},
                        "obj": {"type": "string"},
                        "owner": {
                            "type": ["integer", "null"],
                            "minimum": 0,
                            "maximum": 7
                        }
                    }
                }
            },
            "heroes": {
                "type": "array",
                "description": "Player's heroes",
                "items": {
                    "type": "object",
                    "required": ["name", "location", "army", "movementLeft", "primaryStats"],
                    "properties": {
                        "name": {"type": "string"},
                        "location": {
                            "type": "object",
                            "required": ["x", "y"],
                            "properties": {
                                "x": {"type": "integer"},
                                "y": {"type": "integer"}
                            }
                        },
                        "army": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "required": ["creatureId", "count"],
                                "properties": {
                                    "creatureId": {"type": "integer"},
                                    "count": {"type": "integer", "minimum": 1}
                                }
                            }
                        },
                        "movementLeft": {"type": "integer", "minimum": 0},
                        "primaryStats": {
                            "type": "object",
                            "required": ["attack", "defense", "spellPower", "knowledge"],
                            "properties": {
                                "attack": {"type": "integer", "minimum": 0},
                                "defense": {"type": "integer", "minimum": 0},
                                "spellPower": {"type": "integer", "minimum": 0},
                                "knowledge": {"type": "integer", "minimum": 0}
                            }
                        }
                    }
                }
            },
            "towns": {
                "type": "array",
                "description": "Player's towns",
                "items": {
                    "type": "object",
                    "required": ["name", "location", "owner", "type", "buildings", "garrison"],
                    "properties": {
                        "name": {"type": "string"},
                        "location": {
                            "type": "object",
                            "required": ["x", "y"],
                            "properties": {
                                "x": {"type": "integer"},
                                "y": {"type": "integer"}
                            }
                        },
                        "owner": {"type": "integer"},
                        "type": {"type": "string"},
                        "buildings": {
                            "type": "array",
                            "items": {"type": "integer"}
                        },
                        "garrison": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "required": ["creatureId", "count"],
                                "properties": {
                                    "creatureId": {"type": "integer"},
                                    "count": {"type": "integer"}
                                }
                            }
                        }
                    }
                }
            },
            "resources": {
                "type": "object",
                "description": "Player's resources",
                "properties": {
                    "gold": {"type": "integer", "minimum": 0},
                    "wood": {"type": "integer", "minimum": 0},
                    "ore": {"type": "integer", "minimum": 0},
                    "mercury": {"type": "integer", "minimum": 0},
                    "sulfur": {"type": "integer", "minimum": 0},
                    "crystal": {"type": "integer", "minimum": 0},
                    "gems": {"type": "integer", "minimum": 0}
                }
            }
        }
    }))
}

/// Body of a `POST /query/snapshot` request
#[derive(Debug, serde::Deserialize)]
pub struct QueryRequest {
    /// Requested turn; only the latest cached turn can be served
    pub turn: Option<u32>,
}

/// `POST /query/snapshot` -- serve the latest cached game state
pub async fn query(
    State(state): State<Arc<AppState>>,
    body: Result<Json<QueryRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Invalid JSON",
                    "message": rejection.body_text(),
                })),
            )
                .into_response();
        }
    };

    let Some(cached) = state.store.get_latest() else {
        return Json(json!({
            "error": "No game state available",
            "message": "Waiting for Heroes III save file to be detected",
        }))
        .into_response();
    };

    if let Some(requested) = request.turn {
        if requested != cached.state.turn {
            return Json(json!({
                "error": "Turn not available",
                "message": format!(
                    "Requested turn {requested}, but only turn {} is available",
                    cached.state.turn
                ),
            }))
            .into_response();
        }
    }

    Json(json!({
        "success": true,
        "data": cached.state,
        "metadata": {
            "cached_at": cached.cached_at,
            "version": env!("CARGO_PKG_VERSION"),
        }
    }))
    .into_response()
}

/// Fallback for unknown paths and methods
pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": "Not Found", "status": 404})),
    )
        .into_response()
}
