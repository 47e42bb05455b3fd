use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{
    bus::EventBus,
    events::GameEvent,
    handler::{GameEventError, GameEventHandler},
};

/// Routes the events of one game to a handler on a background task
pub struct GameSubscription {
    game_id: String,
    handler: Arc<dyn GameEventHandler>,
    event_bus: EventBus,
    /// Events with an older snapshot than this are skipped
    min_version: u64,
}

impl GameSubscription {
    pub fn new(game_id: String, handler: Arc<dyn GameEventHandler>, event_bus: EventBus) -> Self {
        Self {
            game_id,
            handler,
            event_bus,
            min_version: 0,
        }
    }

    /// Skips events the observer already has, i.e. those whose snapshot is
    /// not newer than `version`
    pub fn after_version(mut self, version: u64) -> Self {
        self.min_version = version.saturating_add(1);
        self
    }

    /// Subscribes and spawns the listening task.
    ///
    /// The task ends when the game's channel is closed or the handler reports
    /// that its connection is gone. Abort the handle to unregister early.
    pub async fn start(self) -> JoinHandle<()> {
        let receiver = self.event_bus.subscribe_to_game(&self.game_id).await;
        self.start_with(receiver)
    }

    /// Spawns the listening task on a receiver taken earlier, so events
    /// committed between subscribing and reading a snapshot are not lost
    pub fn start_with(self, mut receiver: broadcast::Receiver<GameEvent>) -> JoinHandle<()> {
        let game_id = self.game_id.clone();
        let handler_name = self.handler.handler_name();
        let mut min_version = self.min_version;

        info!(
            game_id = %game_id,
            handler = handler_name,
            min_version,
            "Starting game subscription"
        );

        tokio::spawn(async move {
            loop {
                let event = match receiver.recv().await {
                    Ok(event) => event,
                    Err(RecvError::Lagged(skipped)) => {
                        // Every event carries a full snapshot, so the next one catches up
                        warn!(
                            game_id = %game_id,
                            handler = handler_name,
                            skipped,
                            "Subscriber lagged behind"
                        );
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };

                if let Some(version) = event.version() {
                    if version < min_version {
                        debug!(
                            game_id = %game_id,
                            handler = handler_name,
                            version,
                            min_version,
                            "Skipping outdated game event"
                        );
                        continue;
                    }
                    min_version = version;
                }

                debug!(
                    game_id = %game_id,
                    handler = handler_name,
                    event_type = event.event_type(),
                    "Received game event"
                );

                match self.handler.handle_game_event(&game_id, event).await {
                    Ok(()) => {}
                    Err(GameEventError::ConnectionClosed(reason)) => {
                        info!(game_id = %game_id, handler = handler_name, %reason, "Handler disconnected");
                        break;
                    }
                    Err(e) => {
                        warn!(
                            game_id = %game_id,
                            handler = handler_name,
                            error = %e,
                            "Game event handler failed"
                        );
                    }
                }
            }

            info!(
                game_id = %game_id,
                handler = handler_name,
                "Game subscription ended"
            );
        })
    }
}
