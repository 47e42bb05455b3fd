use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

use maksijatsi::{
    event::{GameEvent, GameEventError, GameEventHandler},
    game::{GameFilter, GamePage, GameRepository, GameSession, InMemoryGameRepository},
    AppError,
};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Records every event it is handed
#[derive(Default)]
pub struct RecordingHandler {
    events: Mutex<Vec<GameEvent>>,
}

#[allow(dead_code)]
impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn events(&self) -> Vec<GameEvent> {
        self.events.lock().await.clone()
    }

    pub async fn event_types(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .await
            .iter()
            .map(|e| e.event_type())
            .collect()
    }
}

#[async_trait]
impl GameEventHandler for RecordingHandler {
    async fn handle_game_event(
        &self,
        _game_id: &str,
        event: GameEvent,
    ) -> Result<(), GameEventError> {
        self.events.lock().await.push(event);
        Ok(())
    }

    fn handler_name(&self) -> &'static str {
        "RecordingHandler"
    }
}

/// In-memory repository where another writer sneaks in before the next
/// `pending` saves or deletes, so those writes lose the version race
pub struct ConflictingGameRepository {
    inner: InMemoryGameRepository,
    pending: AtomicU32,
}

#[allow(dead_code)]
impl ConflictingGameRepository {
    pub fn new() -> Self {
        Self {
            inner: InMemoryGameRepository::new(),
            pending: AtomicU32::new(0),
        }
    }

    pub fn inject_conflicts(&self, count: u32) {
        self.pending.store(count, Ordering::SeqCst);
    }

    pub fn remaining_conflicts(&self) -> u32 {
        self.pending.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GameRepository for ConflictingGameRepository {
    async fn create_game(&self, game: &GameSession) -> Result<GameSession, AppError> {
        self.inner.create_game(game).await
    }

    async fn get_game(&self, game_id: &str) -> Result<Option<GameSession>, AppError> {
        self.inner.get_game(game_id).await
    }

    async fn list_games(
        &self,
        filter: &GameFilter,
        limit: usize,
        next_token: Option<&str>,
    ) -> Result<GamePage, AppError> {
        self.inner.list_games(filter, limit, next_token).await
    }

    async fn save_game(
        &self,
        game: &GameSession,
        expected_version: u64,
    ) -> Result<GameSession, AppError> {
        self.interfere(&game.id).await?;
        self.inner.save_game(game, expected_version).await
    }

    async fn delete_game(&self, game_id: &str, expected_version: u64) -> Result<(), AppError> {
        self.interfere(game_id).await?;
        self.inner.delete_game(game_id, expected_version).await
    }
}

impl ConflictingGameRepository {
    async fn interfere(&self, game_id: &str) -> Result<(), AppError> {
        let inject = self
            .pending
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();

        if inject {
            // Rewrite the stored game unchanged, which still bumps its version
            if let Some(stored) = self.inner.get_game(game_id).await? {
                self.inner.save_game(&stored, stored.version).await?;
            }
        }
        Ok(())
    }
}

/// In-memory repository whose next save is stored at once but acknowledged
/// late, letting a later commit publish first
pub struct SlowAckGameRepository {
    inner: InMemoryGameRepository,
    delayed_ack: Mutex<Option<Duration>>,
}

#[allow(dead_code)]
impl SlowAckGameRepository {
    pub fn new() -> Self {
        Self {
            inner: InMemoryGameRepository::new(),
            delayed_ack: Mutex::new(None),
        }
    }

    pub async fn delay_next_save(&self, delay: Duration) {
        *self.delayed_ack.lock().await = Some(delay);
    }
}

#[async_trait]
impl GameRepository for SlowAckGameRepository {
    async fn create_game(&self, game: &GameSession) -> Result<GameSession, AppError> {
        self.inner.create_game(game).await
    }

    async fn get_game(&self, game_id: &str) -> Result<Option<GameSession>, AppError> {
        self.inner.get_game(game_id).await
    }

    async fn list_games(
        &self,
        filter: &GameFilter,
        limit: usize,
        next_token: Option<&str>,
    ) -> Result<GamePage, AppError> {
        self.inner.list_games(filter, limit, next_token).await
    }

    async fn save_game(
        &self,
        game: &GameSession,
        expected_version: u64,
    ) -> Result<GameSession, AppError> {
        let saved = self.inner.save_game(game, expected_version).await;
        let delay = self.delayed_ack.lock().await.take();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        saved
    }

    async fn delete_game(&self, game_id: &str, expected_version: u64) -> Result<(), AppError> {
        self.inner.delete_game(game_id, expected_version).await
    }
}
