use async_trait::async_trait;
use thiserror::Error;

use super::events::GameEvent;

/// Errors that can occur when handling game events
#[derive(Debug, Error)]
pub enum GameEventError {
    /// The receiving end is gone; the subscription stops
    #[error("Connection closed: {0}")]
    ConnectionClosed(String),

    #[error("Handler error: {0}")]
    HandlerError(String),
}

/// Trait for components that react to the events of one game
#[async_trait]
pub trait GameEventHandler: Send + Sync {
    async fn handle_game_event(&self, game_id: &str, event: GameEvent)
        -> Result<(), GameEventError>;

    /// Get a human-readable name for this handler (for logging/debugging)
    fn handler_name(&self) -> &'static str;
}
