// Public API
pub use dice::{DiceProvider, DiceThrow, Die, FixedDiceProvider, Quaternion, RandomDiceProvider, Vector3};
pub use errors::GameError;
pub use handlers::{
    abandon_game, create_game, end_turn, get_game, get_scores, join_game, leave_game, list_games,
    start_game, throw_dice, throw_free_dice,
};
pub use logic::{GameSession, Standing};
pub use repository::{GameFilter, GamePage, GameRepository, InMemoryGameRepository};
pub use scoring::{compute_scores, Score, ScoreSheet, ScoreTable, ScoreType, DICE_COUNT};
pub use service::GameService;
pub use turn::{GameState, TurnNumber, TurnStateMachine};

// Internal modules
pub mod dice;
mod errors;
mod handlers;
mod logic;
mod repository;
pub mod scoring;
mod service;
mod turn;
pub mod types;
