use serde::{Deserialize, Serialize};

use crate::game::{DiceThrow, GameSession, ScoreType, Standing};

/// Facts about a game that have already been committed.
///
/// Each event except `GameDeleted` carries the game as stored after the change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum GameEvent {
    GameCreated {
        game: GameSession,
    },

    PlayerJoined {
        user_id: String,
        game: GameSession,
    },

    PlayerLeft {
        user_id: String,
        game: GameSession,
    },

    GameStarted {
        game: GameSession,
    },

    DiceThrown {
        user_id: String,
        dice_throw: DiceThrow,
        game: GameSession,
    },

    TurnEnded {
        user_id: String,
        score_type: ScoreType,
        points: u32,
        game: GameSession,
    },

    /// Sent once when the game reaches `finished`, either by scoring or abandonment
    GameFinished {
        standings: Vec<Standing>,
        game: GameSession,
    },

    /// The last player left a joinable game and it was removed
    GameDeleted {
        game_id: String,
    },
}

impl GameEvent {
    pub fn game_id(&self) -> &str {
        match self {
            GameEvent::GameDeleted { game_id } => game_id,
            GameEvent::GameCreated { game }
            | GameEvent::PlayerJoined { game, .. }
            | GameEvent::PlayerLeft { game, .. }
            | GameEvent::GameStarted { game }
            | GameEvent::DiceThrown { game, .. }
            | GameEvent::TurnEnded { game, .. }
            | GameEvent::GameFinished { game, .. } => &game.id,
        }
    }

    /// The snapshot carried by the event, if any
    pub fn snapshot(&self) -> Option<&GameSession> {
        match self {
            GameEvent::GameDeleted { .. } => None,
            GameEvent::GameCreated { game }
            | GameEvent::PlayerJoined { game, .. }
            | GameEvent::PlayerLeft { game, .. }
            | GameEvent::GameStarted { game }
            | GameEvent::DiceThrown { game, .. }
            | GameEvent::TurnEnded { game, .. }
            | GameEvent::GameFinished { game, .. } => Some(game),
        }
    }

    /// Version of the carried snapshot. Observers keep the highest one seen.
    pub fn version(&self) -> Option<u64> {
        self.snapshot().map(|game| game.version)
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            GameEvent::GameCreated { .. } => "game_created",
            GameEvent::PlayerJoined { .. } => "player_joined",
            GameEvent::PlayerLeft { .. } => "player_left",
            GameEvent::GameStarted { .. } => "game_started",
            GameEvent::DiceThrown { .. } => "dice_thrown",
            GameEvent::TurnEnded { .. } => "turn_ended",
            GameEvent::GameFinished { .. } => "game_finished",
            GameEvent::GameDeleted { .. } => "game_deleted",
        }
    }
}
