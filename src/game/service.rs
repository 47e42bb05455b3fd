use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument, warn};

use super::{
    dice::{DiceProvider, DiceThrow},
    errors::GameError,
    logic::GameSession,
    repository::{GameFilter, GamePage, GameRepository},
    scoring::{compute_scores, validate_dice, Score, ScoreTable, ScoreType, DICE_COUNT},
    turn::GameState,
    types::{LeaveGameResponse, ListGamesQuery},
};
use crate::{
    config::{AppConfig, ScoringRules},
    event::{EventBus, GameEvent},
    shared::AppError,
    user::UserRepository,
};

const DEFAULT_PAGE_SIZE: usize = 10;
const MAX_PAGE_SIZE: usize = 100;

/// What a commit writes back
enum Write {
    Save,
    Delete,
}

/// Rolls at most once per request so a retried commit replays the same throw
struct RetainedThrow<'a> {
    inner: &'a dyn DiceProvider,
    rolled: Mutex<Option<DiceThrow>>,
}

impl<'a> RetainedThrow<'a> {
    fn new(inner: &'a dyn DiceProvider) -> Self {
        Self {
            inner,
            rolled: Mutex::new(None),
        }
    }
}

impl DiceProvider for RetainedThrow<'_> {
    fn throw(&self, number_of_dice: u8) -> DiceThrow {
        let Ok(mut rolled) = self.rolled.lock() else {
            return self.inner.throw(number_of_dice);
        };
        match rolled.as_ref() {
            Some(previous) if previous.values.len() == number_of_dice as usize => previous.clone(),
            _ => {
                let fresh = self.inner.throw(number_of_dice);
                *rolled = Some(fresh.clone());
                fresh
            }
        }
    }
}

/// Game use cases: read the game, apply one rule-checked mutation, save it
/// conditionally on the version read, then publish the new snapshot.
pub struct GameService {
    games: Arc<dyn GameRepository>,
    users: Arc<dyn UserRepository>,
    dice_provider: Arc<dyn DiceProvider>,
    event_bus: EventBus,
    rules: ScoringRules,
    conflict_retries: u32,
}

impl GameService {
    pub fn new(
        games: Arc<dyn GameRepository>,
        users: Arc<dyn UserRepository>,
        dice_provider: Arc<dyn DiceProvider>,
        event_bus: EventBus,
        config: &AppConfig,
    ) -> Self {
        Self {
            games,
            users,
            dice_provider,
            event_bus,
            rules: config.rules.clone(),
            conflict_retries: config.conflict_retries,
        }
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    /// Creates a joinable game with `host_id` as host and first player
    #[instrument(skip(self))]
    pub async fn create_game(
        &self,
        host_id: &str,
        name: Option<String>,
    ) -> Result<GameSession, AppError> {
        self.require_user(host_id).await?;

        let name = match name {
            Some(name) if !name.trim().is_empty() => name,
            _ => petname::Petnames::default().generate_one(2, " "),
        };

        let mut game = GameSession::new(&name, host_id)?;
        game.join(host_id)?;
        debug!(game_id = %game.id, "Generated game");

        let stored = self.games.create_game(&game).await?;
        self.users.set_current_game(host_id, Some(&stored.id)).await?;

        info!(game_id = %stored.id, name = %stored.name, "Game created");
        self.event_bus
            .emit_to_game(GameEvent::GameCreated {
                game: stored.clone(),
            })
            .await;
        Ok(stored)
    }

    #[instrument(skip(self))]
    pub async fn get_game(&self, game_id: &str) -> Result<GameSession, AppError> {
        self.games
            .get_game(game_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Game not found: {}", game_id)))
    }

    /// One lobby page, oldest games first
    #[instrument(skip(self))]
    pub async fn list_games(&self, query: ListGamesQuery) -> Result<GamePage, AppError> {
        let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);
        if limit == 0 || limit > MAX_PAGE_SIZE {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        let filter = GameFilter {
            state: query.state,
            participant: query.participant,
        };
        let page = self
            .games
            .list_games(&filter, limit, query.next_token.as_deref())
            .await?;

        info!(game_count = page.games.len(), "Games listed");
        Ok(page)
    }

    #[instrument(skip(self))]
    pub async fn join_game(&self, game_id: &str, user_id: &str) -> Result<GameSession, AppError> {
        self.require_user(user_id).await?;

        let (game, joined) = self.commit(game_id, |game| game.join(user_id)).await?;
        if !joined {
            debug!("Player was already in the game");
            return Ok(game);
        }

        self.users.set_current_game(user_id, Some(game_id)).await?;
        info!(player_count = game.users().len(), "Player joined game");
        self.event_bus
            .emit_to_game(GameEvent::PlayerJoined {
                user_id: user_id.to_string(),
                game: game.clone(),
            })
            .await;
        Ok(game)
    }

    /// Removes a player from a joinable game. The game is deleted once nobody is left.
    #[instrument(skip(self))]
    pub async fn leave_game(
        &self,
        game_id: &str,
        user_id: &str,
    ) -> Result<LeaveGameResponse, AppError> {
        let (remaining, ()) = self
            .commit_with(game_id, |game| {
                game.leave(user_id)?;
                let write = if game.users().is_empty() {
                    Write::Delete
                } else {
                    Write::Save
                };
                Ok(((), write))
            })
            .await?;
        let response = LeaveGameResponse {
            game_id: game_id.to_string(),
            deleted: remaining.is_none(),
            game: remaining,
        };

        self.clear_current_game(user_id, game_id).await?;

        match &response.game {
            Some(game) => {
                info!(player_count = game.users().len(), "Player left game");
                self.event_bus
                    .emit_to_game(GameEvent::PlayerLeft {
                        user_id: user_id.to_string(),
                        game: game.clone(),
                    })
                    .await;
            }
            None => {
                info!("Last player left, game deleted");
                self.event_bus
                    .emit_to_game(GameEvent::GameDeleted {
                        game_id: game_id.to_string(),
                    })
                    .await;
                self.event_bus.close_game(game_id).await;
            }
        }
        Ok(response)
    }

    #[instrument(skip(self))]
    pub async fn start_game(&self, game_id: &str, user_id: &str) -> Result<GameSession, AppError> {
        let (game, ()) = self.commit(game_id, |game| game.start(user_id)).await?;

        info!(players = ?game.users(), "Game started");
        self.event_bus
            .emit_to_game(GameEvent::GameStarted { game: game.clone() })
            .await;
        Ok(game)
    }

    /// Throws for the player in turn, keeping `hold` from the previous throw
    #[instrument(skip(self))]
    pub async fn throw_dice(
        &self,
        game_id: &str,
        user_id: &str,
        number_of_dice: i64,
        hold: Vec<u8>,
    ) -> Result<DiceThrow, AppError> {
        let provider = RetainedThrow::new(self.dice_provider.as_ref());
        let (game, dice_throw) = self
            .commit(game_id, |game| {
                game.throw_dice(user_id, number_of_dice, &hold, &provider)
            })
            .await?;

        info!(values = ?dice_throw.values, dice = ?game.dice(), "Dice thrown");
        self.event_bus
            .emit_to_game(GameEvent::DiceThrown {
                user_id: user_id.to_string(),
                dice_throw: dice_throw.clone(),
                game,
            })
            .await;
        Ok(dice_throw)
    }

    /// Scores the current dice in `score_type` and passes the turn. Returns the points.
    #[instrument(skip(self))]
    pub async fn end_turn(
        &self,
        game_id: &str,
        user_id: &str,
        score_type: ScoreType,
    ) -> Result<u32, AppError> {
        let rules = &self.rules;
        let (game, points) = self
            .commit(game_id, |game| game.end_turn(user_id, score_type, rules))
            .await?;

        info!(%score_type, points, next = ?game.whos_turn(), "Turn ended");
        self.event_bus
            .emit_to_game(GameEvent::TurnEnded {
                user_id: user_id.to_string(),
                score_type,
                points,
                game: game.clone(),
            })
            .await;

        if game.state() == GameState::Finished {
            self.publish_finished(game).await;
        }
        Ok(points)
    }

    /// Finishes a joinable or ongoing game early. Host only.
    #[instrument(skip(self))]
    pub async fn abandon_game(&self, game_id: &str, user_id: &str) -> Result<GameSession, AppError> {
        let (game, ()) = self.commit(game_id, |game| game.abandon(user_id)).await?;

        info!("Game abandoned");
        self.publish_finished(game.clone()).await;
        Ok(game)
    }

    /// Every score the user holds across the games they play in
    #[instrument(skip(self))]
    pub async fn scores_for_user(&self, user_id: &str) -> Result<Vec<Score>, AppError> {
        self.require_user(user_id).await?;

        let filter = GameFilter {
            state: None,
            participant: Some(user_id.to_string()),
        };
        let mut scores = vec![];
        let mut next_token: Option<String> = None;
        loop {
            let page = self
                .games
                .list_games(&filter, MAX_PAGE_SIZE, next_token.as_deref())
                .await?;
            for game in &page.games {
                if let Some(sheet) = game.sheet_for(user_id) {
                    scores.extend(sheet.scores().iter().cloned());
                }
            }
            match page.next_token {
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        debug!(score_count = scores.len(), "Collected user scores");
        Ok(scores)
    }

    /// Scores every category for the given dice without touching any game
    pub fn get_scores(&self, dice_values: &[i64]) -> Result<ScoreTable, AppError> {
        let dice = dice_values
            .iter()
            .map(|&value| {
                u8::try_from(value)
                    .map_err(|_| GameError::InvalidDice(format!("face {} is out of range", value)))
            })
            .collect::<Result<Vec<u8>, GameError>>()?;
        validate_dice(&dice)?;

        Ok(compute_scores(&dice, &self.rules)?)
    }

    /// A throw outside any game
    pub fn throw_free_dice(&self, number_of_dice: i64) -> Result<DiceThrow, AppError> {
        if number_of_dice < 1 || number_of_dice > DICE_COUNT as i64 {
            return Err(GameError::InvalidThrow(format!(
                "number of dice must be between 1 and {}, got {}",
                DICE_COUNT, number_of_dice
            ))
            .into());
        }

        let dice_throw = self.dice_provider.throw(number_of_dice as u8);
        validate_dice(&dice_throw.values)?;
        Ok(dice_throw)
    }

    /// Read → apply → conditional save, retried on a lost save race.
    async fn commit<T, F>(&self, game_id: &str, mut apply: F) -> Result<(GameSession, T), AppError>
    where
        F: FnMut(&mut GameSession) -> Result<T, GameError> + Send,
        T: Send,
    {
        let (saved, outcome) = self
            .commit_with(game_id, |game| apply(game).map(|outcome| (outcome, Write::Save)))
            .await?;
        let saved =
            saved.ok_or_else(|| AppError::NotFound(format!("Game not found: {}", game_id)))?;
        Ok((saved, outcome))
    }

    /// Read → apply → conditional save or delete, retried on a lost race.
    /// Returns the stored game, or `None` once it is deleted.
    ///
    /// `apply` runs against a fresh read on every attempt, so rule errors caused
    /// by the winning write (NotYourTurn and friends) come back unchanged.
    async fn commit_with<T, F>(
        &self,
        game_id: &str,
        mut apply: F,
    ) -> Result<(Option<GameSession>, T), AppError>
    where
        F: FnMut(&mut GameSession) -> Result<(T, Write), GameError> + Send,
        T: Send,
    {
        let mut attempt = 0;
        loop {
            let mut game = self.get_game(game_id).await?;
            let expected_version = game.version;
            let (outcome, write) = apply(&mut game)?;

            let written = match write {
                Write::Save => self.games.save_game(&game, expected_version).await.map(Some),
                Write::Delete => self
                    .games
                    .delete_game(game_id, expected_version)
                    .await
                    .map(|()| None),
            };

            match written {
                Ok(stored) => return Ok((stored, outcome)),
                Err(AppError::Conflict(reason)) if attempt < self.conflict_retries => {
                    attempt += 1;
                    debug!(game_id, attempt, %reason, "Retrying after conflict");
                }
                Err(AppError::Conflict(reason)) => {
                    warn!(game_id, attempt, "Giving up after repeated conflicts");
                    return Err(AppError::Conflict(reason));
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn publish_finished(&self, game: GameSession) {
        let standings = game.standings(&self.rules);
        let game_id = game.id.clone();
        info!(game_id = %game_id, ?standings, "Game finished");

        self.event_bus
            .emit_to_game(GameEvent::GameFinished { standings, game })
            .await;
        self.event_bus.close_game(&game_id).await;
    }

    async fn require_user(&self, user_id: &str) -> Result<(), AppError> {
        match self.users.get_user(user_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!("User not found: {}", user_id))),
        }
    }

    async fn clear_current_game(&self, user_id: &str, game_id: &str) -> Result<(), AppError> {
        if let Some(user) = self.users.get_user(user_id).await? {
            if user.game_id.as_deref() == Some(game_id) {
                self.users.set_current_game(user_id, None).await?;
            }
        }
        Ok(())
    }
}
