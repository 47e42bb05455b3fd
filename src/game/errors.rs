use strum_macros::IntoStaticStr;
use thiserror::Error;

use super::scoring::ScoreType;

/// Errors raised by game rules. Nothing is mutated when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error, IntoStaticStr)]
pub enum GameError {
    // Malformed input
    #[error("Invalid dice: {0}")]
    InvalidDice(String),
    #[error("Invalid throw: {0}")]
    InvalidThrow(String),
    #[error("Invalid game name: {0}")]
    InvalidName(String),

    // Lifecycle and turn rules
    #[error("It is not your turn")]
    NotYourTurn,
    #[error("Game is not joinable")]
    GameNotJoinable,
    #[error("Game is finished")]
    GameFinished,
    #[error("Category already scored: {0}")]
    CategoryAlreadyScored(ScoreType),
    #[error("Game has already started")]
    GameAlreadyStarted,
    #[error("Game has not started")]
    GameNotStarted,
    #[error("Only the host can do that")]
    NotHost,
    #[error("Player is not in this game")]
    NotInGame,
    #[error("Cannot start a game without players")]
    EmptyRoster,
    #[error("No throws left this turn")]
    NoThrowsLeft,
    #[error("Dice must be thrown before ending the turn")]
    NoDiceThrown,
}

impl GameError {
    /// Input errors as opposed to rule violations against the current state
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            GameError::InvalidDice(_) | GameError::InvalidThrow(_) | GameError::InvalidName(_)
        )
    }

    /// Stable machine-readable code, the variant name
    pub fn code(&self) -> &'static str {
        self.into()
    }
}
