use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::StreamExt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::messages::WebSocketMessage;

/// Text frames to and from one watching client
#[async_trait]
pub trait GameSocket: Send {
    async fn send_text(&mut self, text: String) -> Result<(), SocketError>;

    /// Next text frame, or `None` once the client has gone
    async fn next_text(&mut self) -> Result<Option<String>, SocketError>;

    async fn close(&mut self) -> Result<(), SocketError>;
}

/// Answers requests sent by a watching client
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle_message(&self, game_id: &str, message: WebSocketMessage) -> WebSocketMessage;
}

#[derive(Debug, Error)]
pub enum SocketError {
    #[error("send failed: {0}")]
    SendFailed(String),
    #[error("receive failed: {0}")]
    ReceiveFailed(String),
}

#[async_trait]
impl GameSocket for WebSocket {
    async fn send_text(&mut self, text: String) -> Result<(), SocketError> {
        self.send(Message::Text(text))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }

    async fn next_text(&mut self) -> Result<Option<String>, SocketError> {
        while let Some(frame) = self.next().await {
            match frame {
                Ok(Message::Text(text)) => return Ok(Some(text)),
                Ok(Message::Close(_)) => return Ok(None),
                // Control frames are answered by axum, binary is not part of the protocol
                Ok(_) => continue,
                Err(e) => return Err(SocketError::ReceiveFailed(e.to_string())),
            }
        }
        Ok(None)
    }

    async fn close(&mut self) -> Result<(), SocketError> {
        self.send(Message::Close(None))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }
}

/// One client watching one game.
///
/// Server messages arrive on `outbound` from the game subscription. The
/// connection ends when that channel closes or the client goes away.
pub struct Connection {
    pub game_id: String,
    socket: Box<dyn GameSocket>,
    outbound: mpsc::UnboundedReceiver<WebSocketMessage>,
    message_handler: Arc<dyn MessageHandler>,
}

impl Connection {
    pub fn new(
        game_id: String,
        socket: Box<dyn GameSocket>,
        outbound: mpsc::UnboundedReceiver<WebSocketMessage>,
        message_handler: Arc<dyn MessageHandler>,
    ) -> Self {
        Self {
            game_id,
            socket,
            outbound,
            message_handler,
        }
    }

    pub async fn run(mut self) -> Result<(), SocketError> {
        loop {
            tokio::select! {
                message = self.outbound.recv() => match message {
                    Some(message) => send(self.socket.as_mut(), &self.game_id, &message).await?,
                    // Subscription over: game finished, deleted or never live
                    None => break,
                },
                text = self.socket.next_text() => match text? {
                    Some(text) => {
                        let reply = match serde_json::from_str::<WebSocketMessage>(&text) {
                            Ok(request) => {
                                self.message_handler
                                    .handle_message(&self.game_id, request)
                                    .await
                            }
                            Err(e) => {
                                warn!(game_id = %self.game_id, error = %e, "Malformed client message");
                                WebSocketMessage::error("malformed message")
                            }
                        };
                        send(self.socket.as_mut(), &self.game_id, &reply).await?;
                    }
                    None => break,
                },
            }
        }

        debug!(game_id = %self.game_id, "Closing socket");
        let _ = self.socket.close().await;
        Ok(())
    }
}

async fn send(
    socket: &mut dyn GameSocket,
    game_id: &str,
    message: &WebSocketMessage,
) -> Result<(), SocketError> {
    match message.to_json() {
        Ok(text) => socket.send_text(text).await,
        Err(e) => {
            warn!(game_id = %game_id, error = %e, "Dropping unserializable message");
            Ok(())
        }
    }
}
