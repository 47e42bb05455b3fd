use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::GameEvent;
use crate::game::GameSession;

/// Message types for WebSocket communication
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    // Client -> Server
    Ping,
    /// Ask for the current game, e.g. after missing events
    Resync,

    // Server -> Client
    Pong,
    Snapshot,
    GameEvent,
    Error,
}

/// Metadata for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessageMeta {
    pub timestamp: DateTime<Utc>,
}

/// Base structure for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    #[serde(default)]
    pub payload: serde_json::Value,
    pub meta: Option<WebSocketMessageMeta>,
}

impl WebSocketMessage {
    pub fn new(message_type: MessageType, payload: serde_json::Value) -> Self {
        Self {
            message_type,
            payload,
            meta: Some(WebSocketMessageMeta {
                timestamp: Utc::now(),
            }),
        }
    }

    pub fn snapshot(game: &GameSession) -> Self {
        Self::new(
            MessageType::Snapshot,
            serde_json::json!({ "game": game }),
        )
    }

    pub fn game_event(event: &GameEvent) -> Self {
        Self::new(
            MessageType::GameEvent,
            serde_json::to_value(event).unwrap_or_default(),
        )
    }

    pub fn error(message: &str) -> Self {
        Self::new(MessageType::Error, serde_json::json!({ "error": message }))
    }

    pub fn pong() -> Self {
        Self::new(MessageType::Pong, serde_json::Value::Null)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
