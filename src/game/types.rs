use serde::{Deserialize, Serialize};

use super::scoring::ScoreType;
use super::turn::GameState;

/// Request payload for creating a game. A name is generated when none is given.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    #[serde(default)]
    pub name: Option<String>,
}

/// Lobby query string: `?state=joinable&participant=<userId>&limit=10&nextToken=<id>`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListGamesQuery {
    pub state: Option<GameState>,
    pub participant: Option<String>,
    pub limit: Option<usize>,
    pub next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThrowRequest {
    pub number_of_dice: i64,
    /// Faces kept from the previous throw of this turn
    #[serde(default)]
    pub hold: Vec<u8>,
}

/// A throw outside any game
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeThrowRequest {
    pub number_of_dice: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndTurnRequest {
    pub score_type: ScoreType,
}

/// Raw face values; range checking happens in the calculator
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetScoresRequest {
    pub dice_values: Vec<i64>,
}

/// Response of `POST /games/:id/leave`. `game` is None when the last player left
/// and the game was deleted.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveGameResponse {
    pub game_id: String,
    pub deleted: bool,
    pub game: Option<super::logic::GameSession>,
}
