use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use super::events::GameEvent;

#[derive(Debug)]
struct GameChannel {
    sender: broadcast::Sender<GameEvent>,
    /// Highest snapshot version sent on this channel
    latest_version: u64,
}

#[derive(Debug, Default)]
struct Channels {
    open: HashMap<String, GameChannel>,
    /// Finished or deleted games. Their channels are never recreated.
    closed: HashSet<String>,
}

/// Per-game broadcast channels.
///
/// Channels are created lazily by the first emit or subscribe and removed by
/// `close_game`, which ends every subscription to that game.
///
/// Commits can finish their save in one order and publish in another. The bus
/// only forwards snapshots at least as new as the last one it sent, so the
/// final event every subscriber sees carries the stored game.
#[derive(Debug, Clone)]
pub struct EventBus {
    channels: Arc<RwLock<Channels>>,
    capacity: usize,
}

impl EventBus {
    /// Creates a bus whose channels buffer `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(Channels::default())),
            capacity: capacity.max(1),
        }
    }

    /// Emits an event to all subscribers of the event's game.
    ///
    /// Events older than the last snapshot sent, and events for closed games,
    /// are dropped.
    pub async fn emit_to_game(&self, event: GameEvent) {
        let game_id = event.game_id().to_string();
        let mut channels = self.channels.write().await;
        let channels = &mut *channels;

        if channels.closed.contains(&game_id) {
            debug!(game_id = %game_id, event_type = event.event_type(), "Dropping event for closed game");
            return;
        }

        let capacity = self.capacity;
        let channel = channels
            .open
            .entry(game_id.clone())
            .or_insert_with(|| GameChannel::new(&game_id, capacity));

        if let Some(version) = event.version() {
            if version < channel.latest_version {
                debug!(
                    game_id = %game_id,
                    version,
                    latest_version = channel.latest_version,
                    event_type = event.event_type(),
                    "Dropping stale game event"
                );
                return;
            }
            channel.latest_version = version;
        }

        match channel.sender.send(event) {
            Ok(receiver_count) => {
                debug!(
                    game_id = %game_id,
                    receivers = receiver_count,
                    "Game event emitted"
                );
            }
            Err(_) => {
                debug!(game_id = %game_id, "Game event emitted with no receivers");
            }
        }
    }

    /// Subscribe to events for a specific game.
    ///
    /// For a closed game the receiver reports `Closed` straight away.
    pub async fn subscribe_to_game(&self, game_id: &str) -> broadcast::Receiver<GameEvent> {
        {
            let channels = self.channels.read().await;
            if let Some(channel) = channels.open.get(game_id) {
                return channel.sender.subscribe();
            }
            if channels.closed.contains(game_id) {
                return closed_receiver();
            }
        }

        let mut channels = self.channels.write().await;
        if channels.closed.contains(game_id) {
            return closed_receiver();
        }
        let capacity = self.capacity;
        channels
            .open
            .entry(game_id.to_string())
            .or_insert_with(|| GameChannel::new(game_id, capacity))
            .sender
            .subscribe()
    }

    /// Drops the game's channel for good. Subscribers drain what is buffered and then stop.
    pub async fn close_game(&self, game_id: &str) {
        let mut channels = self.channels.write().await;
        if channels.open.remove(game_id).is_some() {
            debug!(game_id = %game_id, "Game channel closed");
        }
        channels.closed.insert(game_id.to_string());
    }

    pub async fn has_channel(&self, game_id: &str) -> bool {
        self.channels.read().await.open.contains_key(game_id)
    }

    pub async fn is_closed(&self, game_id: &str) -> bool {
        self.channels.read().await.closed.contains(game_id)
    }
}

impl GameChannel {
    fn new(game_id: &str, capacity: usize) -> Self {
        debug!(game_id = %game_id, "Creating game channel");
        Self {
            sender: broadcast::channel(capacity).0,
            latest_version: 0,
        }
    }
}

fn closed_receiver() -> broadcast::Receiver<GameEvent> {
    let (_, receiver) = broadcast::channel(1);
    receiver
}
