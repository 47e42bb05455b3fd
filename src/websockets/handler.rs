use async_trait::async_trait;
use axum::{
    extract::{Path, State, WebSocketUpgrade},
    response::Response,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{
    messages::{MessageType, WebSocketMessage},
    socket::{Connection, MessageHandler},
    subscriber::WebSocketGameSubscriber,
};
use crate::event::GameSubscription;
use crate::game::{GameRepository, GameState};
use crate::shared::{AppError, AppState};

/// Answers the few requests a watching client can make
pub struct WebsocketReceiveHandler {
    game_repository: Arc<dyn GameRepository>,
}

impl WebsocketReceiveHandler {
    pub fn new(game_repository: Arc<dyn GameRepository>) -> Self {
        Self { game_repository }
    }

    async fn snapshot(&self, game_id: &str) -> WebSocketMessage {
        match self.game_repository.get_game(game_id).await {
            Ok(Some(game)) => WebSocketMessage::snapshot(&game),
            Ok(None) => WebSocketMessage::error("game no longer exists"),
            Err(e) => WebSocketMessage::error(&e.to_string()),
        }
    }
}

#[async_trait]
impl MessageHandler for WebsocketReceiveHandler {
    async fn handle_message(&self, game_id: &str, message: WebSocketMessage) -> WebSocketMessage {
        match message.message_type {
            MessageType::Ping => WebSocketMessage::pong(),
            MessageType::Resync => self.snapshot(game_id).await,
            other => {
                debug!(message_type = ?other, "Unhandled message type");
                WebSocketMessage::error("unsupported message type")
            }
        }
    }
}

/// Subscribes to the game, then queues its current snapshot on `outbound`.
///
/// Subscribing first means nothing committed after the snapshot is missed;
/// buffered events the snapshot already covers are skipped by version.
/// Returns the forwarding task, or `None` when the stream ends with the
/// snapshot because the game is over or gone.
pub(crate) async fn open_game_stream(
    game_id: &str,
    state: &AppState,
    outbound: mpsc::UnboundedSender<WebSocketMessage>,
) -> Option<JoinHandle<()>> {
    let receiver = state.event_bus.subscribe_to_game(game_id).await;

    let game = match state.game_repository.get_game(game_id).await {
        Ok(Some(game)) => game,
        Ok(None) => {
            let _ = outbound.send(WebSocketMessage::error("game no longer exists"));
            return None;
        }
        Err(e) => {
            warn!(game_id = %game_id, error = %e, "Failed to load game for socket");
            let _ = outbound.send(WebSocketMessage::error(&e.to_string()));
            return None;
        }
    };

    let _ = outbound.send(WebSocketMessage::snapshot(&game));
    if game.state() == GameState::Finished {
        debug!(game_id = %game_id, "Game already finished, closing after snapshot");
        return None;
    }

    // The subscriber owns the only sender, so the connection ends when the
    // game channel closes
    let subscriber = Arc::new(WebSocketGameSubscriber::new(outbound));
    Some(
        GameSubscription::new(game_id.to_string(), subscriber, state.event_bus.clone())
            .after_version(game.version)
            .start_with(receiver),
    )
}

/// Streams a game's events to the client
///
/// GET /games/:id/ws
///
/// The first message is a snapshot of the game. For a finished game the
/// connection closes right after it.
pub async fn game_socket(
    ws: WebSocketUpgrade,
    Path(game_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    if state.game_repository.get_game(&game_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Game not found: {}", game_id)));
    }

    info!(game_id = %game_id, "WebSocket upgrade requested");

    Ok(ws.on_upgrade(move |socket| async move {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let subscription = open_game_stream(&game_id, &state, outbound_tx).await;

        let handler = Arc::new(WebsocketReceiveHandler::new(Arc::clone(
            &state.game_repository,
        )));
        let connection = Connection::new(game_id.clone(), Box::new(socket), outbound_rx, handler);

        if let Err(e) = connection.run().await {
            warn!(game_id = %game_id, error = %e, "WebSocket connection failed");
        }

        if let Some(subscription) = subscription {
            subscription.abort();
        }
        info!(game_id = %game_id, "WebSocket connection closed");
    }))
}
