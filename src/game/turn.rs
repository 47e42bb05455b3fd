use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use super::errors::GameError;

/// Game lifecycle. Only moves forward: joinable → ongoing → finished.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GameState {
    #[default]
    Joinable,
    Ongoing,
    Finished,
}

/// Which of the three throws in a turn was taken last
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TurnNumber {
    First,
    Second,
    Third,
}

impl TurnNumber {
    /// The throw that follows `current`, if any remain
    pub fn next(current: Option<TurnNumber>) -> Option<TurnNumber> {
        match current {
            None => Some(TurnNumber::First),
            Some(TurnNumber::First) => Some(TurnNumber::Second),
            Some(TurnNumber::Second) => Some(TurnNumber::Third),
            Some(TurnNumber::Third) => None,
        }
    }
}

/// Lifecycle, turn pointer and throw counter of a game.
///
/// The roster itself is owned by the game; methods that move the turn pointer
/// take it as an argument so the pointer always names a roster member.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnStateMachine {
    state: GameState,
    turn_number: Option<TurnNumber>,
    whos_turn_id: Option<String>,
}

impl TurnStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn turn_number(&self) -> Option<TurnNumber> {
        self.turn_number
    }

    pub fn whos_turn(&self) -> Option<&str> {
        self.whos_turn_id.as_deref()
    }

    pub fn ensure_not_finished(&self) -> Result<(), GameError> {
        if self.state == GameState::Finished {
            return Err(GameError::GameFinished);
        }
        Ok(())
    }

    pub fn ensure_joinable(&self) -> Result<(), GameError> {
        match self.state {
            GameState::Joinable => Ok(()),
            GameState::Ongoing => Err(GameError::GameNotJoinable),
            GameState::Finished => Err(GameError::GameFinished),
        }
    }

    /// Checks that the game is running and `player_id` holds the turn
    pub fn ensure_turn(&self, player_id: &str) -> Result<(), GameError> {
        match self.state {
            GameState::Joinable => return Err(GameError::GameNotStarted),
            GameState::Finished => return Err(GameError::GameFinished),
            GameState::Ongoing => {}
        }
        if self.whos_turn_id.as_deref() != Some(player_id) {
            return Err(GameError::NotYourTurn);
        }
        Ok(())
    }

    /// Checks that another throw is allowed without taking it
    pub fn peek_next_throw(&self) -> Result<TurnNumber, GameError> {
        TurnNumber::next(self.turn_number).ok_or(GameError::NoThrowsLeft)
    }

    pub fn start(&mut self, roster: &[String]) -> Result<(), GameError> {
        match self.state {
            GameState::Joinable => {}
            GameState::Ongoing => return Err(GameError::GameAlreadyStarted),
            GameState::Finished => return Err(GameError::GameFinished),
        }
        let first = roster.first().ok_or(GameError::EmptyRoster)?;

        self.state = GameState::Ongoing;
        self.whos_turn_id = Some(first.clone());
        self.turn_number = None;
        Ok(())
    }

    pub fn register_throw(&mut self) -> Result<TurnNumber, GameError> {
        let next = self.peek_next_throw()?;
        self.turn_number = Some(next);
        Ok(next)
    }

    /// Hands the turn to the next roster member, wrapping around
    pub fn advance(&mut self, roster: &[String]) {
        let next = self
            .whos_turn_id
            .as_ref()
            .and_then(|current| roster.iter().position(|p| p == current))
            .map(|index| (index + 1) % roster.len())
            .and_then(|index| roster.get(index))
            .or_else(|| roster.first());

        self.whos_turn_id = next.cloned();
        self.turn_number = None;
    }

    pub fn finish(&mut self) {
        self.state = GameState::Finished;
        self.whos_turn_id = None;
        self.turn_number = None;
    }
}
