use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use super::logic::GameSession;
use super::turn::GameState;
use crate::shared::AppError;

/// Lobby filter. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GameFilter {
    pub state: Option<GameState>,
    pub participant: Option<String>,
}

impl GameFilter {
    pub fn matches(&self, game: &GameSession) -> bool {
        self.state.map_or(true, |state| game.state() == state)
            && self
                .participant
                .as_deref()
                .map_or(true, |user_id| game.has_player(user_id))
    }
}

/// One page of a game listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GamePage {
    pub games: Vec<GameSession>,
    /// Pass back to fetch the next page; None on the last page
    pub next_token: Option<String>,
}

/// Trait for game repository operations
#[async_trait]
pub trait GameRepository: Send + Sync {
    async fn create_game(&self, game: &GameSession) -> Result<GameSession, AppError>;
    async fn get_game(&self, game_id: &str) -> Result<Option<GameSession>, AppError>;

    /// Games matching `filter`, oldest first
    async fn list_games(
        &self,
        filter: &GameFilter,
        limit: usize,
        next_token: Option<&str>,
    ) -> Result<GamePage, AppError>;

    /// Stores `game` only if the stored version still equals `expected_version`.
    ///
    /// Returns the stored game with its new version, or a StaleTurn conflict when
    /// another save got there first.
    async fn save_game(
        &self,
        game: &GameSession,
        expected_version: u64,
    ) -> Result<GameSession, AppError>;

    /// Deletes the game if it is still at `expected_version`
    async fn delete_game(&self, game_id: &str, expected_version: u64) -> Result<(), AppError>;
}

/// In-memory implementation of GameRepository for development and testing
pub struct InMemoryGameRepository {
    games: Arc<RwLock<HashMap<String, GameSession>>>,
}

impl Default for InMemoryGameRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryGameRepository {
    pub fn new() -> Self {
        Self {
            games: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl GameRepository for InMemoryGameRepository {
    #[instrument(skip(self, game), fields(game_id = %game.id))]
    async fn create_game(&self, game: &GameSession) -> Result<GameSession, AppError> {
        let mut games = self.games.write().await;
        if games.contains_key(&game.id) {
            warn!("Game already exists in memory");
            return Err(AppError::Conflict(format!("Game {} already exists", game.id)));
        }

        let mut stored = game.clone();
        stored.version = 1;
        games.insert(stored.id.clone(), stored.clone());

        debug!("Game created in memory");
        Ok(stored)
    }

    #[instrument(skip(self))]
    async fn get_game(&self, game_id: &str) -> Result<Option<GameSession>, AppError> {
        let games = self.games.read().await;
        Ok(games.get(game_id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_games(
        &self,
        filter: &GameFilter,
        limit: usize,
        next_token: Option<&str>,
    ) -> Result<GamePage, AppError> {
        let games = self.games.read().await;

        let mut matching: Vec<&GameSession> = games.values().filter(|g| filter.matches(g)).collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        // The token is the id of the last game on the previous page
        let start = match next_token {
            None => 0,
            Some(token) => {
                matching
                    .iter()
                    .position(|g| g.id == token)
                    .ok_or_else(|| AppError::Validation(format!("Unknown nextToken: {}", token)))?
                    + 1
            }
        };

        let page: Vec<GameSession> = matching
            .iter()
            .skip(start)
            .take(limit)
            .map(|g| (*g).clone())
            .collect();
        let next_token = if start + page.len() < matching.len() {
            page.last().map(|g| g.id.clone())
        } else {
            None
        };

        debug!(returned = page.len(), total = matching.len(), "Games listed");
        Ok(GamePage {
            games: page,
            next_token,
        })
    }

    #[instrument(skip(self, game), fields(game_id = %game.id))]
    async fn save_game(
        &self,
        game: &GameSession,
        expected_version: u64,
    ) -> Result<GameSession, AppError> {
        let mut games = self.games.write().await;

        let stored = games
            .get_mut(&game.id)
            .ok_or_else(|| AppError::NotFound(format!("Game not found: {}", game.id)))?;

        if stored.version != expected_version {
            info!(
                expected_version,
                stored_version = stored.version,
                "Rejecting stale game save"
            );
            return Err(AppError::stale_turn(&game.id));
        }

        let mut updated = game.clone();
        updated.version = expected_version + 1;
        *stored = updated.clone();

        debug!(version = updated.version, "Game saved");
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete_game(&self, game_id: &str, expected_version: u64) -> Result<(), AppError> {
        let mut games = self.games.write().await;

        match games.get(game_id) {
            None => Err(AppError::NotFound(format!("Game not found: {}", game_id))),
            Some(stored) if stored.version != expected_version => Err(AppError::stale_turn(game_id)),
            Some(_) => {
                games.remove(game_id);
                info!("Game deleted");
                Ok(())
            }
        }
    }
}
