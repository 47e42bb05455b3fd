use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

use super::messages::WebSocketMessage;
use crate::event::{GameEvent, GameEventError, GameEventHandler};

/// Forwards the events of one game to one socket connection
pub struct WebSocketGameSubscriber {
    outbound: mpsc::UnboundedSender<WebSocketMessage>,
}

impl WebSocketGameSubscriber {
    pub fn new(outbound: mpsc::UnboundedSender<WebSocketMessage>) -> Self {
        Self { outbound }
    }
}

#[async_trait]
impl GameEventHandler for WebSocketGameSubscriber {
    async fn handle_game_event(
        &self,
        game_id: &str,
        event: GameEvent,
    ) -> Result<(), GameEventError> {
        debug!(game_id = %game_id, event_type = event.event_type(), "Forwarding event to socket");
        self.outbound
            .send(WebSocketMessage::game_event(&event))
            .map_err(|_| GameEventError::ConnectionClosed("socket receiver dropped".to_string()))
    }

    fn handler_name(&self) -> &'static str {
        "WebSocketGameSubscriber"
    }
}
